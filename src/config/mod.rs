//! Configuration for backend connections.
//!
//! Connection management itself — pooling, authentication, retries — is
//! owned by the embedding process; this module only carries the knobs the
//! adapters need: a connection URL per backend, the document database
//! name, and the optional hash-entry TTL.

use serde::Deserialize;

/// Connection settings for the document backend.
#[derive(Debug, Clone, Default)]
pub struct DocumentConfig {
    /// Connection URL, e.g. `mongodb://localhost:27017`.
    pub url: Option<String>,
    /// Database name. Defaults to `todos` when unset.
    pub database: Option<String>,
}

/// Connection settings for the hash backend.
#[derive(Debug, Clone, Default)]
pub struct HashConfig {
    /// Connection URL, e.g. `redis://localhost:6379`.
    pub url: Option<String>,
    /// Optional time-to-live applied to each saved entry, in seconds.
    ///
    /// Passed through to the store as-is; the repository contract owns no
    /// expiry logic.
    pub ttl_secs: Option<u64>,
}

/// Connection settings for the relational backend.
#[derive(Debug, Clone, Default)]
pub struct RelationalConfig {
    /// Connection URL, e.g. `postgresql://localhost/todos`.
    pub url: Option<String>,
}

/// Top-level store configuration.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Document backend settings.
    pub document: DocumentConfig,
    /// Hash backend settings.
    pub hash: HashConfig,
    /// Relational backend settings.
    pub relational: RelationalConfig,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Document backend section.
    pub document: Option<ConfigFileDocument>,
    /// Hash backend section.
    pub hash: Option<ConfigFileHash>,
    /// Relational backend section.
    pub relational: Option<ConfigFileRelational>,
}

/// Document section in the config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileDocument {
    /// Connection URL.
    pub url: Option<String>,
    /// Database name.
    pub database: Option<String>,
}

/// Hash section in the config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileHash {
    /// Connection URL.
    pub url: Option<String>,
    /// Entry TTL in seconds.
    pub ttl_secs: Option<u64>,
}

/// Relational section in the config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileRelational {
    /// Connection URL.
    pub url: Option<String>,
}

impl StoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &std::path::Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: e.to_string(),
            })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Builds configuration from environment variables alone.
    ///
    /// Recognized variables: `TODO_STORE_MONGODB_URL`,
    /// `TODO_STORE_MONGODB_DATABASE`, `TODO_STORE_REDIS_URL`,
    /// `TODO_STORE_REDIS_TTL_SECS`, `TODO_STORE_POSTGRES_URL`.
    #[must_use]
    pub fn load_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies environment variable overrides on top of this configuration.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Converts a [`ConfigFile`] to a [`StoreConfig`].
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(document) = file.document {
            config.document.url = document.url;
            config.document.database = document.database;
        }
        if let Some(hash) = file.hash {
            config.hash.url = hash.url;
            config.hash.ttl_secs = hash.ttl_secs;
        }
        if let Some(relational) = file.relational {
            config.relational.url = relational.url;
        }

        config
    }

    /// Applies overrides read through `lookup` (injectable for tests).
    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("TODO_STORE_MONGODB_URL") {
            self.document.url = Some(url);
        }
        if let Some(database) = lookup("TODO_STORE_MONGODB_DATABASE") {
            self.document.database = Some(database);
        }
        if let Some(url) = lookup("TODO_STORE_REDIS_URL") {
            self.hash.url = Some(url);
        }
        if let Some(raw) = lookup("TODO_STORE_REDIS_TTL_SECS") {
            match raw.parse() {
                Ok(secs) => self.hash.ttl_secs = Some(secs),
                Err(_) => {
                    tracing::warn!(value = raw.as_str(), "ignoring unparseable TTL override");
                },
            }
        }
        if let Some(url) = lookup("TODO_STORE_POSTGRES_URL") {
            self.relational.url = Some(url);
        }
        self
    }

    /// Sets the document backend URL.
    #[must_use]
    pub fn with_document_url(mut self, url: impl Into<String>) -> Self {
        self.document.url = Some(url.into());
        self
    }

    /// Sets the document backend database name.
    #[must_use]
    pub fn with_document_database(mut self, database: impl Into<String>) -> Self {
        self.document.database = Some(database.into());
        self
    }

    /// Sets the hash backend URL.
    #[must_use]
    pub fn with_hash_url(mut self, url: impl Into<String>) -> Self {
        self.hash.url = Some(url.into());
        self
    }

    /// Sets the hash-entry TTL in seconds.
    #[must_use]
    pub const fn with_hash_ttl_secs(mut self, secs: u64) -> Self {
        self.hash.ttl_secs = Some(secs);
        self
    }

    /// Sets the relational backend URL.
    #[must_use]
    pub fn with_relational_url(mut self, url: impl Into<String>) -> Self {
        self.relational.url = Some(url.into());
        self
    }
}
