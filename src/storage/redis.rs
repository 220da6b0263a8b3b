//! Redis-backed hash storage.
//!
//! Each record is a Redis hash at `{namespace}:{id}`. Saving writes the
//! key slot unconditionally, so re-saving an id overwrites the value in
//! place and never creates a duplicate entry; distinct ids each occupy
//! their own key. Lookup, write, and delete are all single key-indexed
//! commands.

#[cfg(feature = "redis")]
mod implementation {
    use crate::models::Todo;
    use crate::storage::TodoStorage;
    use crate::storage::mapping::TodoMapping;
    use crate::{Error, Result};
    use redis::{Client, Commands, Connection};
    use std::collections::HashMap;
    use std::time::Duration;

    /// Hash-backend adapter over a Redis connection.
    pub struct RedisTodoStorage {
        /// Redis client.
        client: Client,
        /// Field and key layout.
        mapping: TodoMapping,
        /// Optional entry TTL, passed through to the store on save.
        ttl: Option<Duration>,
    }

    impl RedisTodoStorage {
        /// Creates a new Redis todo storage.
        ///
        /// # Errors
        ///
        /// Returns an error if the mapping is invalid or the connection
        /// URL cannot be parsed.
        pub fn new(connection_url: &str, mapping: TodoMapping) -> Result<Self> {
            mapping.validate()?;

            let client = Client::open(connection_url).map_err(|e| Error::OperationFailed {
                operation: "redis_connect".to_string(),
                cause: e.to_string(),
            })?;

            Ok(Self {
                client,
                mapping,
                ttl: None,
            })
        }

        /// Creates a storage with default settings.
        ///
        /// # Errors
        ///
        /// Returns an error if the connection URL cannot be parsed.
        pub fn with_defaults() -> Result<Self> {
            Self::new("redis://localhost:6379", TodoMapping::hash())
        }

        /// Applies a time-to-live to every subsequently saved entry.
        ///
        /// The value is handed to the store as-is; no expiry logic lives in
        /// the adapter.
        #[must_use]
        pub const fn with_ttl(mut self, ttl: Duration) -> Self {
            self.ttl = Some(ttl);
            self
        }

        /// Gets a connection from the client.
        fn get_connection(&self) -> Result<Connection> {
            self.client
                .get_connection()
                .map_err(|e| Error::OperationFailed {
                    operation: "redis_get_connection".to_string(),
                    cause: e.to_string(),
                })
        }

        /// Deserializes a todo from hash fields; `None` when the id field
        /// is missing (e.g. the key expired between scan and read).
        fn parse_todo(&self, fields: &HashMap<String, String>) -> Option<Todo<String>> {
            let id = fields.get(self.mapping.id_field.as_str())?.clone();
            let text = fields
                .get(self.mapping.text_field.as_str())
                .cloned()
                .unwrap_or_default();
            Some(Todo::new(id, text))
        }

        /// Collects every live key in the namespace.
        fn scan_keys(&self, conn: &mut Connection) -> Result<Vec<String>> {
            let iter = conn
                .scan_match::<_, String>(self.mapping.key_pattern())
                .map_err(|e| Error::OperationFailed {
                    operation: "redis_scan_todos".to_string(),
                    cause: e.to_string(),
                })?;
            iter.collect::<std::result::Result<Vec<String>, _>>()
                .map_err(|e| Error::OperationFailed {
                    operation: "redis_scan_todos".to_string(),
                    cause: e.to_string(),
                })
        }
    }

    impl TodoStorage for RedisTodoStorage {
        type Id = String;

        fn save(&self, todo: &Todo<String>) -> Result<Todo<String>> {
            let id = match todo.id.as_deref() {
                Some(id) if !id.is_empty() => id,
                Some(_) => return Err(Error::InvalidInput("id must not be empty".to_string())),
                None => {
                    return Err(Error::InvalidInput(
                        "hash backend requires a caller-supplied id".to_string(),
                    ));
                },
            };

            let key = self.mapping.key_for(id);
            let mut conn = self.get_connection()?;

            let fields = [
                (self.mapping.id_field.as_str(), id),
                (self.mapping.text_field.as_str(), todo.text.as_str()),
            ];

            let _: () =
                conn.hset_multiple(&key, &fields)
                    .map_err(|e| Error::OperationFailed {
                        operation: "redis_save_todo".to_string(),
                        cause: e.to_string(),
                    })?;

            if let Some(ttl) = self.ttl {
                let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
                let _: () = conn
                    .expire(&key, secs)
                    .map_err(|e| Error::OperationFailed {
                        operation: "redis_expire_todo".to_string(),
                        cause: e.to_string(),
                    })?;
            }

            Ok(Todo::new(id, todo.text.clone()))
        }

        fn find_by_id(&self, id: &String) -> Result<Option<Todo<String>>> {
            if id.is_empty() {
                return Err(Error::InvalidInput("id must not be empty".to_string()));
            }

            let mut conn = self.get_connection()?;
            let key = self.mapping.key_for(id);

            let result: redis::RedisResult<HashMap<String, String>> = conn.hgetall(&key);

            match result {
                Ok(fields) if fields.is_empty() => Ok(None),
                Ok(fields) => Ok(self.parse_todo(&fields)),
                Err(e) => Err(Error::OperationFailed {
                    operation: "redis_get_todo".to_string(),
                    cause: e.to_string(),
                }),
            }
        }

        fn find_all(&self) -> Result<Vec<Todo<String>>> {
            let mut conn = self.get_connection()?;
            let keys = self.scan_keys(&mut conn)?;

            let mut todos = Vec::with_capacity(keys.len());
            for key in keys {
                let fields: HashMap<String, String> =
                    conn.hgetall(&key).map_err(|e| Error::OperationFailed {
                        operation: "redis_get_todo".to_string(),
                        cause: e.to_string(),
                    })?;
                if let Some(todo) = self.parse_todo(&fields) {
                    todos.push(todo);
                }
            }

            Ok(todos)
        }

        fn delete_by_id(&self, id: &String) -> Result<()> {
            if id.is_empty() {
                return Err(Error::InvalidInput("id must not be empty".to_string()));
            }

            let mut conn = self.get_connection()?;
            let key = self.mapping.key_for(id);

            let _: i32 = conn.del(&key).map_err(|e| Error::OperationFailed {
                operation: "redis_delete_todo".to_string(),
                cause: e.to_string(),
            })?;

            Ok(())
        }

        fn delete_all(&self) -> Result<()> {
            let mut conn = self.get_connection()?;
            let keys = self.scan_keys(&mut conn)?;

            if keys.is_empty() {
                return Ok(());
            }

            let removed: i32 = conn.del(&keys).map_err(|e| Error::OperationFailed {
                operation: "redis_delete_all_todos".to_string(),
                cause: e.to_string(),
            })?;
            tracing::debug!(removed, "cleared hash namespace");

            Ok(())
        }
    }

}

#[cfg(feature = "redis")]
pub use implementation::RedisTodoStorage;

#[cfg(not(feature = "redis"))]
mod stub {
    use crate::models::Todo;
    use crate::storage::TodoStorage;
    use crate::storage::mapping::TodoMapping;
    use crate::{Error, Result};
    use std::time::Duration;

    /// Stub Redis todo storage when the feature is not enabled.
    pub struct RedisTodoStorage;

    impl RedisTodoStorage {
        /// Creates a new Redis todo storage (stub).
        ///
        /// # Errors
        ///
        /// Always returns an error because the feature is not enabled.
        pub fn new(_connection_url: &str, _mapping: TodoMapping) -> Result<Self> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        /// Creates a storage with default settings (stub).
        ///
        /// # Errors
        ///
        /// Always returns an error because the feature is not enabled.
        pub fn with_defaults() -> Result<Self> {
            Self::new("redis://localhost:6379", TodoMapping::hash())
        }

        /// Applies a time-to-live (stub).
        #[must_use]
        pub const fn with_ttl(self, _ttl: Duration) -> Self {
            self
        }
    }

    impl TodoStorage for RedisTodoStorage {
        type Id = String;

        fn save(&self, _todo: &Todo<String>) -> Result<Todo<String>> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        fn find_by_id(&self, _id: &String) -> Result<Option<Todo<String>>> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        fn find_all(&self) -> Result<Vec<Todo<String>>> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        fn delete_by_id(&self, _id: &String) -> Result<()> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        fn delete_all(&self) -> Result<()> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }
    }

}

#[cfg(not(feature = "redis"))]
pub use stub::RedisTodoStorage;
