use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use std::future::Future;
use std::pin::Pin;

use crate::errors::IngestError;

/// Liveness endpoint for deployment probes, served on the admin listener.
#[derive(Clone)]
pub struct AdminService;

impl Service<Request<Incoming>> for AdminService {
    type Response = Response<Full<Bytes>>;
    type Error = IngestError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        Box::pin(async move {
            let response = match (req.method(), req.uri().path()) {
                (&Method::GET, "/health") => Response::new(Full::new(Bytes::from("ok\n"))),
                _ => Response::builder()
                    .status(StatusCode::NOT_FOUND)
                    .body(Full::new(Bytes::new()))?,
            };
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::{BodyExt, Empty};
    use hyper_util::client::legacy::Client;
    use hyper_util::client::legacy::connect::HttpConnector;
    use hyper_util::rt::TokioExecutor;
    use tokio::net::TcpListener;

    async fn start_admin_server() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(crate::serve_admin(listener, AdminService));
        port
    }

    async fn get(port: u16, path: &str) -> Response<Incoming> {
        let client: Client<HttpConnector, Empty<Bytes>> =
            Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        let request = Request::builder()
            .method(Method::GET)
            .uri(format!("http://127.0.0.1:{port}{path}"))
            .body(Empty::new())
            .unwrap();
        client.request(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let port = start_admin_server().await;
        let response = get(port, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"ok\n");
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let port = start_admin_server().await;
        let response = get(port, "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
