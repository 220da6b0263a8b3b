//! MongoDB-backed document storage.
//!
//! Records live in a schema-less collection keyed by the id field. Saving
//! with an id replaces the whole document at that id (upsert); saving
//! without one stores a fresh store-generated `ObjectId` in hex form. No
//! uniqueness enforcement exists beyond the collection's own primary-key
//! behavior.

#[cfg(feature = "mongodb")]
mod implementation {
    use crate::models::Todo;
    use crate::storage::TodoStorage;
    use crate::storage::mapping::TodoMapping;
    use crate::{Error, Result};
    use mongodb::bson::Document;
    use mongodb::bson::oid::ObjectId;
    use mongodb::{Client, Collection};
    use std::sync::Arc;
    use tokio::runtime::Runtime as TokioRuntime;

    /// Document adapter over a MongoDB collection.
    pub struct MongoTodoStorage {
        /// The todo collection.
        collection: Collection<Document>,
        /// Field and collection layout.
        mapping: TodoMapping,
        /// Tokio runtime for blocking operations.
        runtime: Arc<TokioRuntime>,
    }

    impl MongoTodoStorage {
        /// Creates a new MongoDB todo storage.
        ///
        /// # Errors
        ///
        /// Returns an error if the mapping is invalid or the connection
        /// URL cannot be parsed.
        pub fn new(connection_url: &str, database: &str, mapping: TodoMapping) -> Result<Self> {
            mapping.validate()?;

            let runtime = TokioRuntime::new().map_err(|e| Error::OperationFailed {
                operation: "create_tokio_runtime".to_string(),
                cause: e.to_string(),
            })?;

            let client = runtime
                .block_on(Client::with_uri_str(connection_url))
                .map_err(|e| Error::OperationFailed {
                    operation: "mongodb_connect".to_string(),
                    cause: e.to_string(),
                })?;

            let collection = client
                .database(database)
                .collection::<Document>(&mapping.namespace);

            Ok(Self {
                collection,
                mapping,
                runtime: Arc::new(runtime),
            })
        }

        /// Creates a storage with default settings.
        ///
        /// # Errors
        ///
        /// Returns an error if the connection URL cannot be parsed.
        pub fn with_defaults() -> Result<Self> {
            Self::new("mongodb://localhost:27017", "todos", TodoMapping::document())
        }

        /// Returns the collection name.
        #[must_use]
        pub fn collection_name(&self) -> &str {
            &self.mapping.namespace
        }

        /// Builds the point-lookup filter for an id.
        fn id_filter(&self, id: &str) -> Document {
            let mut filter = Document::new();
            filter.insert(self.mapping.id_field.clone(), id);
            filter
        }

        /// Deserializes a todo from a stored document; `None` when the id
        /// field is missing or not a string.
        fn parse_todo(&self, document: &Document) -> Option<Todo<String>> {
            let id = document.get_str(&self.mapping.id_field).ok()?.to_string();
            let text = document
                .get_str(&self.mapping.text_field)
                .unwrap_or_default()
                .to_string();
            Some(Todo::new(id, text))
        }
    }

    impl TodoStorage for MongoTodoStorage {
        type Id = String;

        fn save(&self, todo: &Todo<String>) -> Result<Todo<String>> {
            let id = match todo.id.as_deref() {
                Some(id) if !id.is_empty() => id.to_string(),
                Some(_) => return Err(Error::InvalidInput("id must not be empty".to_string())),
                None => ObjectId::new().to_hex(),
            };

            let mut document = Document::new();
            document.insert(self.mapping.id_field.clone(), id.clone());
            document.insert(self.mapping.text_field.clone(), todo.text.clone());

            self.runtime
                .block_on(async {
                    if todo.id.is_some() {
                        self.collection
                            .replace_one(self.id_filter(&id), document)
                            .upsert(true)
                            .await
                            .map(|_| ())
                    } else {
                        self.collection.insert_one(document).await.map(|_| ())
                    }
                })
                .map_err(|e| Error::OperationFailed {
                    operation: "mongodb_save_todo".to_string(),
                    cause: e.to_string(),
                })?;

            Ok(Todo::new(id, todo.text.clone()))
        }

        fn find_by_id(&self, id: &String) -> Result<Option<Todo<String>>> {
            if id.is_empty() {
                return Err(Error::InvalidInput("id must not be empty".to_string()));
            }

            let filter = self.id_filter(id);

            let found = self
                .runtime
                .block_on(async { self.collection.find_one(filter).await })
                .map_err(|e| Error::OperationFailed {
                    operation: "mongodb_get_todo".to_string(),
                    cause: e.to_string(),
                })?;

            Ok(found.as_ref().and_then(|document| self.parse_todo(document)))
        }

        fn find_all(&self) -> Result<Vec<Todo<String>>> {
            self.runtime.block_on(async {
                let mut cursor = self.collection.find(Document::new()).await.map_err(|e| {
                    Error::OperationFailed {
                        operation: "mongodb_list_todos".to_string(),
                        cause: e.to_string(),
                    }
                })?;

                let mut todos = Vec::new();
                while cursor.advance().await.map_err(|e| Error::OperationFailed {
                    operation: "mongodb_list_todos".to_string(),
                    cause: e.to_string(),
                })? {
                    let document =
                        cursor
                            .deserialize_current()
                            .map_err(|e| Error::OperationFailed {
                                operation: "mongodb_list_todos".to_string(),
                                cause: e.to_string(),
                            })?;
                    if let Some(todo) = self.parse_todo(&document) {
                        todos.push(todo);
                    }
                }

                Ok(todos)
            })
        }

        fn delete_by_id(&self, id: &String) -> Result<()> {
            if id.is_empty() {
                return Err(Error::InvalidInput("id must not be empty".to_string()));
            }

            let filter = self.id_filter(id);

            self.runtime
                .block_on(async { self.collection.delete_one(filter).await })
                .map_err(|e| Error::OperationFailed {
                    operation: "mongodb_delete_todo".to_string(),
                    cause: e.to_string(),
                })?;

            Ok(())
        }

        fn delete_all(&self) -> Result<()> {
            let result = self
                .runtime
                .block_on(async { self.collection.delete_many(Document::new()).await })
                .map_err(|e| Error::OperationFailed {
                    operation: "mongodb_delete_all_todos".to_string(),
                    cause: e.to_string(),
                })?;
            tracing::debug!(removed = result.deleted_count, "cleared todo collection");

            Ok(())
        }
    }
}

#[cfg(feature = "mongodb")]
pub use implementation::MongoTodoStorage;

#[cfg(not(feature = "mongodb"))]
mod stub {
    use crate::models::Todo;
    use crate::storage::TodoStorage;
    use crate::storage::mapping::TodoMapping;
    use crate::{Error, Result};

    /// Stub MongoDB todo storage when the feature is not enabled.
    pub struct MongoTodoStorage {
        connection_url: String,
        database: String,
        mapping: TodoMapping,
    }

    impl MongoTodoStorage {
        /// Creates a new MongoDB todo storage (stub).
        ///
        /// # Errors
        ///
        /// Returns an error if the mapping is invalid. Construction
        /// otherwise succeeds for API compatibility; operations fail.
        pub fn new(
            connection_url: impl Into<String>,
            database: impl Into<String>,
            mapping: TodoMapping,
        ) -> Result<Self> {
            mapping.validate()?;
            Ok(Self {
                connection_url: connection_url.into(),
                database: database.into(),
                mapping,
            })
        }

        /// Creates a storage with default settings (stub).
        ///
        /// # Errors
        ///
        /// Returns an error if the default mapping is invalid.
        pub fn with_defaults() -> Result<Self> {
            Self::new("mongodb://localhost:27017", "todos", TodoMapping::document())
        }

        /// Returns the collection name.
        #[must_use]
        pub fn collection_name(&self) -> &str {
            &self.mapping.namespace
        }

        /// Returns the database name.
        #[must_use]
        pub fn database_name(&self) -> &str {
            &self.database
        }

        /// Returns the connection URL.
        #[must_use]
        pub fn connection_url(&self) -> &str {
            &self.connection_url
        }
    }

    impl TodoStorage for MongoTodoStorage {
        type Id = String;

        fn save(&self, _todo: &Todo<String>) -> Result<Todo<String>> {
            Err(Error::FeatureNotEnabled("mongodb".to_string()))
        }

        fn find_by_id(&self, _id: &String) -> Result<Option<Todo<String>>> {
            Err(Error::FeatureNotEnabled("mongodb".to_string()))
        }

        fn find_all(&self) -> Result<Vec<Todo<String>>> {
            Err(Error::FeatureNotEnabled("mongodb".to_string()))
        }

        fn delete_by_id(&self, _id: &String) -> Result<()> {
            Err(Error::FeatureNotEnabled("mongodb".to_string()))
        }

        fn delete_all(&self) -> Result<()> {
            Err(Error::FeatureNotEnabled("mongodb".to_string()))
        }
    }

}

#[cfg(not(feature = "mongodb"))]
pub use stub::MongoTodoStorage;
