mod config;

use clap::Parser;
use config::{Config, MetricsConfig};
use ingest::store::MongoStore;
use metrics_exporter_statsd::StatsdBuilder;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "adjustd", about = "Pocketailor size-adjustment ingestion daemon")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, short)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    config.apply_env_overrides();
    if let Err(e) = config.ingest.validate() {
        eprintln!("invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    // The guard flushes buffered events on drop; keep it alive for the whole
    // process.
    let _sentry_guard = config.logging.as_ref().map(|logging| {
        sentry::init((
            logging.sentry_dsn.clone(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry::integrations::tracing::layer())
        .init();

    if let Some(metrics_config) = &config.metrics {
        if let Err(e) = install_statsd_recorder(metrics_config) {
            tracing::warn!("could not install statsd recorder: {e}");
        }
    }

    let store = Arc::new(MongoStore::new(&config.ingest.store));
    if let Err(e) = ingest::run(config.ingest, store).await {
        tracing::error!("server terminated: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn install_statsd_recorder(config: &MetricsConfig) -> Result<(), String> {
    let recorder = StatsdBuilder::from(config.statsd_host.as_str(), config.statsd_port)
        .build(Some("adjustd"))
        .map_err(|e| e.to_string())?;
    metrics::set_global_recorder(recorder).map_err(|e| e.to_string())?;
    Ok(())
}
