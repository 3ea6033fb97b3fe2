//! Ingestion endpoint for pocketailor size-adjustment events.
//!
//! A mobile client POSTs a form-encoded body carrying a shared secret and a
//! JSON-encoded [`record::AdjustmentRecord`]; valid submissions are appended
//! to a MongoDB collection. See [`service`] for the pipeline.

pub mod admin;
pub mod body;
pub mod config;
pub mod errors;
pub mod form;
pub mod metrics_defs;
pub mod record;
pub mod service;
pub mod store;

use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use std::sync::Arc;
use tokio::net::TcpListener;

use admin::AdminService;
use config::Config;
use errors::IngestError;
use service::IngestService;
use store::AdjustmentStore;

/// Bind both listeners and serve until either accept loop fails.
pub async fn run(config: Config, store: Arc<dyn AdjustmentStore>) -> Result<(), IngestError> {
    let listener =
        TcpListener::bind(format!("{}:{}", config.listener.host, config.listener.port)).await?;
    let admin_listener = TcpListener::bind(format!(
        "{}:{}",
        config.admin_listener.host, config.admin_listener.port
    ))
    .await?;

    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        "ingest listener started"
    );
    tracing::info!(
        host = %config.admin_listener.host,
        port = config.admin_listener.port,
        "admin listener started"
    );

    let service = IngestService::new(&config, store);
    tokio::try_join!(
        serve_ingest(listener, service),
        serve_admin(admin_listener, AdminService)
    )?;
    Ok(())
}

/// Accept loop for the ingestion listener. Each connection gets its own
/// pipeline service carrying the peer address for failure reporting.
pub async fn serve_ingest(listener: TcpListener, service: IngestService) -> Result<(), IngestError> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let _ = stream.set_nodelay(true);
        let io = TokioIo::new(stream);
        let svc = service.for_connection(peer_addr);

        // Hand the connection to hyper; auto-detect h1/h2 on this socket.
        // Service errors (the silent non-POST drop) surface here and are
        // discarded with the connection.
        tokio::spawn(async move {
            let _ = Builder::new(TokioExecutor::new())
                .serve_connection(io, svc)
                .await;
        });
    }
}

/// Accept loop for the admin listener.
pub async fn serve_admin(listener: TcpListener, service: AdminService) -> Result<(), IngestError> {
    loop {
        let (stream, _peer_addr) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let svc = service.clone();

        tokio::spawn(async move {
            let _ = Builder::new(TokioExecutor::new())
                .serve_connection(io, svc)
                .await;
        });
    }
}
