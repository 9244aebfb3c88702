// src/server.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Minimal HTTP/1 front end: `GET <metrics-path>` triggers one scrape, `GET /`
// serves a landing page, anything else is a 404.

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::collector::Exporter;
use crate::metrics::render;

/// Shared state handed to every connection.
pub struct AppState {
    pub exporter: Exporter,
    pub metrics_path: String,
}

fn landing_page(metrics_path: &str) -> String {
    format!(
        "<html>\n\
         <head><title>AWS S3 Exporter</title></head>\n\
         <body>\n\
         <h1>AWS S3 Exporter</h1>\n\
         <p><a href='{}'>Metrics</a></p>\n\
         </body>\n\
         </html>\n",
        metrics_path
    )
}

fn respond(status: StatusCode, content_type: &str, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(body.into()));
    *resp.status_mut() = status;
    let value = HeaderValue::from_str(content_type).unwrap_or(HeaderValue::from_static("text/plain"));
    resp.headers_mut().insert(CONTENT_TYPE, value);
    resp
}

/// Route one request by method and path; request bodies are never read.
pub async fn route(method: &Method, path: &str, state: &AppState) -> Response<Full<Bytes>> {
    if path == state.metrics_path {
        if method != Method::GET && method != Method::HEAD {
            return respond(StatusCode::METHOD_NOT_ALLOWED, "text/plain", "method not allowed\n");
        }
        let samples = state.exporter.collect().await;
        return match render(state.exporter.schema(), &samples) {
            Ok(rendered) => respond(StatusCode::OK, &rendered.content_type, rendered.body),
            Err(e) => {
                error!(error = %e, "failed to encode metrics");
                respond(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "text/plain",
                    format!("error encoding metrics: {}\n", e),
                )
            }
        };
    }

    if path == "/" {
        return respond(StatusCode::OK, "text/html; charset=utf-8", landing_page(&state.metrics_path));
    }

    respond(StatusCode::NOT_FOUND, "text/plain", "not found\n")
}

pub async fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to listen on {}", addr))
}

/// Accept connections until `shutdown` resolves. Each connection is served on
/// its own task; connection errors are logged and never stop the server.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let local = listener.local_addr().context("listener has no local address")?;
    info!("Listening on {}", local);

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!(error = %e, "accept failed");
                        continue;
                    }
                };
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let svc = service_fn(move |req: Request<hyper::body::Incoming>| {
                        let state = Arc::clone(&state);
                        let method = req.method().clone();
                        let path = req.uri().path().to_string();
                        async move { Ok::<_, Infallible>(route(&method, &path, &state).await) }
                    });
                    if let Err(e) = http1::Builder::new().serve_connection(TokioIo::new(stream), svc).await {
                        debug!(%peer, error = %e, "connection closed with error");
                    }
                });
            }
            _ = &mut shutdown => {
                info!("shutting down");
                return Ok(());
            }
        }
    }
}
