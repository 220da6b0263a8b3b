//! PostgreSQL-backed relational storage.
//!
//! Rows live in a two-column table with a store-generated surrogate key
//! (`BIGSERIAL`): assigned once on insert, monotonic, never reassigned
//! after delete. Saving without an id inserts; saving with an id is a
//! full-row update that fails when the row no longer exists.

#[cfg(feature = "postgres")]
mod implementation {
    use crate::models::Todo;
    use crate::storage::TodoStorage;
    use crate::storage::mapping::TodoMapping;
    use crate::{Error, Result};
    use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
    use std::sync::Arc;
    use tokio::runtime::Runtime as TokioRuntime;
    use tokio_postgres::NoTls;

    /// Relational adapter over a PostgreSQL connection pool.
    pub struct PostgresTodoStorage {
        /// Connection pool.
        pool: Pool,
        /// Table and column layout.
        mapping: TodoMapping,
        /// Tokio runtime for blocking operations.
        runtime: Arc<TokioRuntime>,
    }

    impl PostgresTodoStorage {
        /// Creates a new PostgreSQL todo storage.
        ///
        /// Provisions the todo table on startup if it does not exist yet.
        ///
        /// # Errors
        ///
        /// Returns an error if the mapping is invalid, the pool cannot be
        /// created, or table provisioning fails.
        pub fn new(connection_url: &str, mapping: TodoMapping) -> Result<Self> {
            mapping.validate()?;

            let runtime = TokioRuntime::new().map_err(|e| Error::OperationFailed {
                operation: "create_tokio_runtime".to_string(),
                cause: e.to_string(),
            })?;

            let mut cfg = Config::new();
            cfg.url = Some(connection_url.to_string());
            cfg.manager = Some(ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            });

            let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls).map_err(|e| {
                Error::OperationFailed {
                    operation: "create_postgres_pool".to_string(),
                    cause: e.to_string(),
                }
            })?;

            let storage = Self {
                pool,
                mapping,
                runtime: Arc::new(runtime),
            };

            storage.ensure_schema()?;

            Ok(storage)
        }

        /// Creates a storage with default settings.
        ///
        /// # Errors
        ///
        /// Returns an error if the connection cannot be established.
        pub fn with_defaults() -> Result<Self> {
            Self::new("postgresql://localhost/todos", TodoMapping::relational())
        }

        /// Returns the table name.
        #[must_use]
        pub fn table_name(&self) -> &str {
            &self.mapping.namespace
        }

        /// Creates the todo table if it does not exist.
        fn ensure_schema(&self) -> Result<()> {
            let table = self.mapping.namespace.clone();
            let id_col = self.mapping.id_field.clone();
            let text_col = self.mapping.text_field.clone();

            self.runtime.block_on(async {
                let client = self.pool.get().await.map_err(|e| Error::OperationFailed {
                    operation: "get_postgres_connection".to_string(),
                    cause: e.to_string(),
                })?;

                let sql = format!(
                    "CREATE TABLE IF NOT EXISTS {table} \
                     ({id_col} BIGSERIAL PRIMARY KEY, {text_col} TEXT NOT NULL)"
                );

                client
                    .execute(&sql, &[])
                    .await
                    .map_err(|e| Error::OperationFailed {
                        operation: "ensure_todo_schema".to_string(),
                        cause: e.to_string(),
                    })?;

                Ok(())
            })?;

            tracing::info!(table = self.mapping.namespace.as_str(), "ensured todo table");

            Ok(())
        }
    }

    impl TodoStorage for PostgresTodoStorage {
        type Id = i64;

        fn save(&self, todo: &Todo<i64>) -> Result<Todo<i64>> {
            let table = self.mapping.namespace.clone();
            let id_col = self.mapping.id_field.clone();
            let text_col = self.mapping.text_field.clone();
            let text = todo.text.clone();

            match todo.id {
                Some(id) => self.runtime.block_on(async {
                    let client = self.pool.get().await.map_err(|e| Error::OperationFailed {
                        operation: "get_postgres_connection".to_string(),
                        cause: e.to_string(),
                    })?;

                    let query = format!("UPDATE {table} SET {text_col} = $2 WHERE {id_col} = $1");

                    let rows = client.execute(&query, &[&id, &text]).await.map_err(|e| {
                        Error::OperationFailed {
                            operation: "update_todo".to_string(),
                            cause: e.to_string(),
                        }
                    })?;

                    // An update presumes the row exists; ids are assigned
                    // exactly once, on insert.
                    if rows == 0 {
                        return Err(Error::NotFound { id: id.to_string() });
                    }

                    Ok(Todo::new(id, text))
                }),
                None => self.runtime.block_on(async {
                    let client = self.pool.get().await.map_err(|e| Error::OperationFailed {
                        operation: "get_postgres_connection".to_string(),
                        cause: e.to_string(),
                    })?;

                    let query =
                        format!("INSERT INTO {table} ({text_col}) VALUES ($1) RETURNING {id_col}");

                    let row = client.query_one(&query, &[&text]).await.map_err(|e| {
                        Error::OperationFailed {
                            operation: "insert_todo".to_string(),
                            cause: e.to_string(),
                        }
                    })?;

                    let id: i64 = row.get(0);
                    Ok(Todo::new(id, text))
                }),
            }
        }

        fn find_by_id(&self, id: &i64) -> Result<Option<Todo<i64>>> {
            let table = self.mapping.namespace.clone();
            let id_col = self.mapping.id_field.clone();
            let text_col = self.mapping.text_field.clone();
            let id = *id;

            self.runtime.block_on(async {
                let client = self.pool.get().await.map_err(|e| Error::OperationFailed {
                    operation: "get_postgres_connection".to_string(),
                    cause: e.to_string(),
                })?;

                let query =
                    format!("SELECT {id_col}, {text_col} FROM {table} WHERE {id_col} = $1");

                let row = client.query_opt(&query, &[&id]).await.map_err(|e| {
                    Error::OperationFailed {
                        operation: "get_todo".to_string(),
                        cause: e.to_string(),
                    }
                })?;

                Ok(row.map(|row| Todo::new(row.get::<_, i64>(0), row.get::<_, String>(1))))
            })
        }

        fn find_all(&self) -> Result<Vec<Todo<i64>>> {
            let table = self.mapping.namespace.clone();
            let id_col = self.mapping.id_field.clone();
            let text_col = self.mapping.text_field.clone();

            self.runtime.block_on(async {
                let client = self.pool.get().await.map_err(|e| Error::OperationFailed {
                    operation: "get_postgres_connection".to_string(),
                    cause: e.to_string(),
                })?;

                let query = format!("SELECT {id_col}, {text_col} FROM {table}");

                let rows =
                    client
                        .query(&query, &[])
                        .await
                        .map_err(|e| Error::OperationFailed {
                            operation: "list_todos".to_string(),
                            cause: e.to_string(),
                        })?;

                Ok(rows
                    .iter()
                    .map(|row| Todo::new(row.get::<_, i64>(0), row.get::<_, String>(1)))
                    .collect())
            })
        }

        fn delete_by_id(&self, id: &i64) -> Result<()> {
            let table = self.mapping.namespace.clone();
            let id_col = self.mapping.id_field.clone();
            let id = *id;

            self.runtime.block_on(async {
                let client = self.pool.get().await.map_err(|e| Error::OperationFailed {
                    operation: "get_postgres_connection".to_string(),
                    cause: e.to_string(),
                })?;

                let query = format!("DELETE FROM {table} WHERE {id_col} = $1");

                client
                    .execute(&query, &[&id])
                    .await
                    .map_err(|e| Error::OperationFailed {
                        operation: "delete_todo".to_string(),
                        cause: e.to_string(),
                    })?;

                Ok(())
            })
        }

        fn delete_all(&self) -> Result<()> {
            let table = self.mapping.namespace.clone();

            self.runtime.block_on(async {
                let client = self.pool.get().await.map_err(|e| Error::OperationFailed {
                    operation: "get_postgres_connection".to_string(),
                    cause: e.to_string(),
                })?;

                let query = format!("DELETE FROM {table}");

                let removed =
                    client
                        .execute(&query, &[])
                        .await
                        .map_err(|e| Error::OperationFailed {
                            operation: "delete_all_todos".to_string(),
                            cause: e.to_string(),
                        })?;
                tracing::debug!(removed, "cleared todo table");

                Ok(())
            })
        }
    }
}

#[cfg(feature = "postgres")]
pub use implementation::PostgresTodoStorage;

#[cfg(not(feature = "postgres"))]
mod stub {
    use crate::models::Todo;
    use crate::storage::TodoStorage;
    use crate::storage::mapping::TodoMapping;
    use crate::{Error, Result};

    /// Stub PostgreSQL todo storage when the feature is not enabled.
    pub struct PostgresTodoStorage {
        connection_url: String,
        mapping: TodoMapping,
    }

    impl PostgresTodoStorage {
        /// Creates a new PostgreSQL todo storage (stub).
        ///
        /// # Errors
        ///
        /// Returns an error if the mapping is invalid. Construction
        /// otherwise succeeds for API compatibility; operations fail.
        pub fn new(connection_url: impl Into<String>, mapping: TodoMapping) -> Result<Self> {
            mapping.validate()?;
            Ok(Self {
                connection_url: connection_url.into(),
                mapping,
            })
        }

        /// Creates a storage with default settings (stub).
        ///
        /// # Errors
        ///
        /// Returns an error if the default mapping is invalid.
        pub fn with_defaults() -> Result<Self> {
            Self::new("postgresql://localhost/todos", TodoMapping::relational())
        }

        /// Returns the table name.
        #[must_use]
        pub fn table_name(&self) -> &str {
            &self.mapping.namespace
        }

        /// Returns the connection URL.
        #[must_use]
        pub fn connection_url(&self) -> &str {
            &self.connection_url
        }
    }

    impl TodoStorage for PostgresTodoStorage {
        type Id = i64;

        fn save(&self, _todo: &Todo<i64>) -> Result<Todo<i64>> {
            Err(Error::FeatureNotEnabled("postgres".to_string()))
        }

        fn find_by_id(&self, _id: &i64) -> Result<Option<Todo<i64>>> {
            Err(Error::FeatureNotEnabled("postgres".to_string()))
        }

        fn find_all(&self) -> Result<Vec<Todo<i64>>> {
            Err(Error::FeatureNotEnabled("postgres".to_string()))
        }

        fn delete_by_id(&self, _id: &i64) -> Result<()> {
            Err(Error::FeatureNotEnabled("postgres".to_string()))
        }

        fn delete_all(&self) -> Result<()> {
            Err(Error::FeatureNotEnabled("postgres".to_string()))
        }
    }

}

#[cfg(not(feature = "postgres"))]
pub use stub::PostgresTodoStorage;
