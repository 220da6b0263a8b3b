//! Storage backends for the todo record.
//!
//! One contract ([`TodoStorage`]), three parallel adapters selected by the
//! caller per use case:
//!
//! | Backend | Feature | Id semantics |
//! |---------|---------|--------------|
//! | `MongoDB` document collection | `mongodb` | string, caller- or store-assigned |
//! | Redis hash entries | `redis` | string, caller-assigned key |
//! | `PostgreSQL` table | `postgres` | `i64`, store-generated, never reused |
//!
//! The adapters share no code, only the contract: their id-generation and
//! delete semantics genuinely differ. Each one maps the record through an
//! explicit [`TodoMapping`] validated at construction.

mod mapping;
mod mongodb;
mod postgresql;
mod redis;
mod traits;

pub use mapping::{IdStrategy, TodoMapping};
pub use mongodb::MongoTodoStorage;
pub use postgresql::PostgresTodoStorage;
pub use redis::RedisTodoStorage;
pub use traits::TodoStorage;

use crate::config::StoreConfig;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// Default database name for the document backend.
const DEFAULT_DOCUMENT_DATABASE: &str = "todos";

/// Selector for the two string-keyed backends.
///
/// The relational backend is `i64`-keyed and constructed directly via
/// [`TodoStorageFactory::relational`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringKeyedBackend {
    /// `MongoDB` document collection.
    #[default]
    Document,
    /// Redis hash entries.
    Hash,
}

/// Factory wiring configuration into backend adapters.
pub struct TodoStorageFactory;

impl TodoStorageFactory {
    /// Creates the document-backend adapter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when no connection URL is
    /// configured, or any adapter construction error.
    pub fn document(config: &StoreConfig) -> Result<MongoTodoStorage> {
        let url = config.document.url.as_deref().ok_or_else(|| {
            Error::InvalidInput("connection URL required for document backend".to_string())
        })?;
        let database = config
            .document
            .database
            .as_deref()
            .unwrap_or(DEFAULT_DOCUMENT_DATABASE);

        MongoTodoStorage::new(url, database, TodoMapping::document())
    }

    /// Creates the hash-backend adapter, applying the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when no connection URL is
    /// configured, or any adapter construction error.
    pub fn hash(config: &StoreConfig) -> Result<RedisTodoStorage> {
        let url = config.hash.url.as_deref().ok_or_else(|| {
            Error::InvalidInput("connection URL required for hash backend".to_string())
        })?;

        let mut storage = RedisTodoStorage::new(url, TodoMapping::hash())?;
        if let Some(secs) = config.hash.ttl_secs {
            storage = storage.with_ttl(Duration::from_secs(secs));
        }

        Ok(storage)
    }

    /// Creates the relational-backend adapter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when no connection URL is
    /// configured, or any adapter construction error.
    pub fn relational(config: &StoreConfig) -> Result<PostgresTodoStorage> {
        let url = config.relational.url.as_deref().ok_or_else(|| {
            Error::InvalidInput("connection URL required for relational backend".to_string())
        })?;

        PostgresTodoStorage::new(url, TodoMapping::relational())
    }

    /// Creates one of the string-keyed backends behind the shared contract.
    ///
    /// # Errors
    ///
    /// Propagates the selected backend's construction error.
    pub fn string_keyed(
        backend: StringKeyedBackend,
        config: &StoreConfig,
    ) -> Result<Arc<dyn TodoStorage<Id = String>>> {
        match backend {
            StringKeyedBackend::Document => Ok(Arc::new(Self::document(config)?)),
            StringKeyedBackend::Hash => Ok(Arc::new(Self::hash(config)?)),
        }
    }
}
