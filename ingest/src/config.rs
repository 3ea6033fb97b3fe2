use serde::Deserialize;
use thiserror::Error;

/// Default request-body ceiling in bytes. Sized generously above the largest
/// expected multi-entry payload (~7100 bytes), then doubled.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16384;

/// Default name of the collection adjustment records are inserted into.
pub const DEFAULT_COLLECTION: &str = "adjustments";

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Secret cannot be empty")]
    EmptySecret,

    #[error("Store URL cannot be empty")]
    EmptyStoreUrl,

    #[error("Store database cannot be empty")]
    EmptyDatabase,

    #[error("Store collection cannot be empty")]
    EmptyCollection,

    #[error("Body ceiling cannot be 0")]
    ZeroBodyCeiling,
}

/// Ingestion service configuration. Built once at startup and read-only
/// afterwards; the pipeline never consults ambient globals.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Main listener for adjustment submissions
    pub listener: Listener,
    /// Admin listener for liveness probes
    pub admin_listener: Listener,
    /// Shared secret submitted by clients in every request
    pub secret: String,
    /// Cumulative request-body ceiling in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Document store the records are appended to
    pub store: StoreConfig,
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Config {
    /// Validates the service configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.admin_listener.validate()?;

        if self.secret.is_empty() {
            return Err(ValidationError::EmptySecret);
        }
        if self.max_body_bytes == 0 {
            return Err(ValidationError::ZeroBodyCeiling);
        }
        self.store.validate()?;

        Ok(())
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

impl Listener {
    /// Validates the listener configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

/// Document store configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// MongoDB connection string (e.g., "mongodb://localhost:27017")
    pub url: String,
    /// Database holding the adjustments collection
    pub database: String,
    /// Collection name, defaults to "adjustments"
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl StoreConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::EmptyStoreUrl);
        }
        if self.database.is_empty() {
            return Err(ValidationError::EmptyDatabase);
        }
        if self.collection.is_empty() {
            return Err(ValidationError::EmptyCollection);
        }
        Ok(())
    }
}
