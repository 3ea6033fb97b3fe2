//! The request-validation-and-persistence pipeline.
//!
//! Every POST request walks the same sequence: transport-security check,
//! bounded body read, form decode, field presence, secret equality, payload
//! decode, single insert. The first failure short-circuits into a rejection.
//! Exactly one of {success response, logged rejection, silent drop} happens
//! per request.

use http_body_util::Empty;
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode, header};
use crate::counter;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::pin::Pin;
use std::sync::Arc;

use crate::body;
use crate::config::Config;
use crate::errors::{IngestError, Rejection};
use crate::form;
use crate::metrics_defs::{REQUESTS_ACCEPTED, REQUESTS_DROPPED, REQUESTS_REJECTED};
use crate::record::AdjustmentRecord;
use crate::store::AdjustmentStore;

/// Header set by the fronting proxy to declare the original scheme.
const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";
const SECURE_SCHEME: &str = "https";

struct Inner {
    secret: String,
    max_body_bytes: usize,
    store: Arc<dyn AdjustmentStore>,
}

/// Factory for per-connection pipeline services.
#[derive(Clone)]
pub struct IngestService {
    inner: Arc<Inner>,
}

impl IngestService {
    pub fn new(config: &Config, store: Arc<dyn AdjustmentStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                secret: config.secret.clone(),
                max_body_bytes: config.max_body_bytes,
                store,
            }),
        }
    }

    /// Bind the shared pipeline state to one connection's peer address.
    pub fn for_connection(&self, peer: SocketAddr) -> ConnectionService {
        ConnectionService {
            inner: self.inner.clone(),
            remote_ip: peer.ip(),
        }
    }
}

/// Pipeline service for a single accepted connection.
pub struct ConnectionService {
    inner: Arc<Inner>,
    remote_ip: IpAddr,
}

impl Service<Request<Incoming>> for ConnectionService {
    type Response = Response<Empty<Bytes>>;
    type Error = IngestError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let inner = self.inner.clone();
        let remote_ip = self.remote_ip;
        Box::pin(async move { handle(inner, remote_ip, req).await })
    }
}

async fn handle(
    inner: Arc<Inner>,
    remote_ip: IpAddr,
    req: Request<Incoming>,
) -> Result<Response<Empty<Bytes>>, IngestError> {
    if req.method() != Method::POST {
        // Browsers (e.g. Chrome) often follow up a POST with a GET. Those are
        // dropped without a response and without a log entry; the service
        // error makes hyper abort the connection.
        counter!(REQUESTS_DROPPED).increment(1);
        return Err(IngestError::MethodNotAllowed);
    }

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    match run_pipeline(&inner, req).await {
        Ok(()) => {
            counter!(REQUESTS_ACCEPTED).increment(1);
            Ok(empty_response(StatusCode::OK)?)
        }
        Err(rejection) => {
            report_rejection(&rejection, &user_agent, remote_ip);
            Ok(empty_response(StatusCode::NOT_FOUND)?)
        }
    }
}

/// Emit the single failure line and rejection counter for one request. The
/// caller only ever sees the generic failure status, never the reason.
fn report_rejection(rejection: &Rejection, user_agent: &str, remote_ip: IpAddr) {
    tracing::warn!("{rejection} | user-agent:{user_agent} | ip:{remote_ip}");
    counter!(REQUESTS_REJECTED, "reason" => rejection.reason_tag()).increment(1);
}

async fn run_pipeline(inner: &Inner, req: Request<Incoming>) -> Result<(), Rejection> {
    // The deployment terminates TLS at a proxy that sets this header when
    // used; absence is treated as secure.
    if let Some(proto) = req.headers().get(FORWARDED_PROTO_HEADER)
        && proto.as_bytes() != SECURE_SCHEME.as_bytes()
    {
        return Err(Rejection::NonSecure);
    }

    let body = body::read_bounded(req.into_body(), inner.max_body_bytes).await?;
    let fields = form::parse(&body)?;

    let secret = fields
        .get(form::SECRET_FIELD)
        .ok_or(Rejection::MissingField(form::SECRET_FIELD))?;
    let adjustment = fields
        .get(form::ADJUSTMENT_FIELD)
        .ok_or(Rejection::MissingField(form::ADJUSTMENT_FIELD))?;

    if *secret != inner.secret {
        return Err(Rejection::SecretMismatch);
    }

    let record: AdjustmentRecord =
        serde_json::from_str(adjustment).map_err(|_| Rejection::PayloadDecode)?;
    record.validate()?;

    inner
        .store
        .insert(&record)
        .await
        .map_err(|e| Rejection::Insert(e.to_string()))?;

    Ok(())
}

fn empty_response(status: StatusCode) -> Result<Response<Empty<Bytes>>, http::Error> {
    Response::builder().status(status).body(Empty::new())
}
