use ingest::config::Config as IngestConfig;
use serde::Deserialize;
use std::fs::File;

/// Environment variable overriding the configured shared secret.
pub const SECRET_ENV: &str = "POCKETAILOR_ADJUSTMENTS_SECRET";

/// Environment variable overriding the configured store connection string.
pub const STORE_URL_ENV: &str = "ADJUSTMENTS_MONGODB_URL";

#[derive(Deserialize)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Deserialize)]
pub struct LoggingConfig {
    pub sentry_dsn: String,
}

#[derive(Deserialize)]
pub struct Config {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
    #[serde(flatten)]
    pub ingest: IngestConfig,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    /// Resolve deployment-environment overrides once, before the listeners
    /// start.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(secret) = lookup(SECRET_ENV) {
            self.ingest.secret = secret;
        }
        if let Some(url) = lookup(STORE_URL_ENV) {
            self.ingest.store.url = url;
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}
