//! # todo-store
//!
//! Todo persistence over interchangeable storage backends.
//!
//! A single logical record ([`Todo`]) is persisted through one repository
//! contract ([`TodoStorage`]) by three independent adapters:
//!
//! - **Document** (`MongoDB`): string ids, caller-assigned or store-generated
//! - **Hash** (Redis): caller-assigned string keys, save is a pure upsert
//! - **Relational** (`PostgreSQL`): store-generated numeric surrogate keys,
//!   never reused after delete
//!
//! The adapters share no code, only the contract — their id-generation and
//! delete semantics genuinely differ. Each backend is gated behind a Cargo
//! feature (`mongodb`, `redis`, `postgres`) and compiles to a stub that
//! fails with [`Error::FeatureNotEnabled`] when its feature is off.
//!
//! ## Example
//!
//! ```rust,ignore
//! use todo_store::{StoreConfig, Todo, TodoStorage, TodoStorageFactory};
//!
//! let config = StoreConfig::load_env();
//! let store = TodoStorageFactory::hash(&config)?;
//! let saved = store.save(&Todo::new("TODO1", "write the docs"))?;
//! assert_eq!(store.fetch(&"TODO1".to_string())?.text, "write the docs");
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod models;
pub mod storage;

// Re-exports for convenience
pub use config::StoreConfig;
pub use models::Todo;
pub use storage::{TodoMapping, TodoStorage, TodoStorageFactory};

/// Error type for todo-store operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed ids, missing required ids, invalid mapping names |
/// | `NotFound` | Strict fetch of an absent record, update of a missing row |
/// | `OperationFailed` | Backend connection or query failures |
/// | `FeatureNotEnabled` | Using a backend compiled without its feature flag |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A hash-backend save carries no id
    /// - An id fails shape validation (empty string)
    /// - A mapping name is not a valid identifier
    ///
    /// Always rejected before any backend call is attempted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No live record exists for the given id.
    ///
    /// Raised when:
    /// - A strict fetch targets an id with no live record (including a
    ///   just-deleted relational id)
    /// - An update presumes a row that does not exist
    ///
    /// Tolerant lookups signal absence with `Ok(None)` instead.
    #[error("todo not found: {id}")]
    NotFound {
        /// The id that had no live record.
        id: String,
    },

    /// An operation against a backend failed.
    ///
    /// Raised when:
    /// - The backend connection cannot be established
    /// - A query, command, or cursor operation fails
    ///
    /// Backend errors are propagated unmodified — never swallowed or
    /// retried at this layer. Retry policy belongs to the connection
    /// collaborator.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Feature not enabled (requires feature flag).
    ///
    /// Raised when a backend adapter is used without its Cargo feature
    /// compiled in.
    #[error("feature not enabled: {0} (compile with --features {0})")]
    FeatureNotEnabled(String),
}

/// Result type alias for todo-store operations.
pub type Result<T> = std::result::Result<T, Error>;
