//! Trigger endpoint: a minimal HTTP server that starts a scan on request.
//!
//! `GET /` answers with a liveness string. `POST /trigger-scan` with a form
//! field `key` matching the shared secret launches a background scan and
//! returns immediately. Known routes answer 405 to other methods.

mod launcher;

pub use launcher::{BackgroundScanLauncher, ScanLauncher};

use crate::config::ServerConfig;
use crate::error::{Result, SentinelError};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes, Incoming};
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::json;
use std::convert::Infallible;
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

pub const LIVENESS_MESSAGE: &str = "Scanner endpoint is running.";

/// Largest trigger form body that is read.
pub const MAX_FORM_BYTES: usize = 4 * 1024;

/// What every request handler needs: the secret and a way to start scans.
pub struct TriggerState {
    secret_key: String,
    launcher: Arc<dyn ScanLauncher>,
}

impl TriggerState {
    pub fn new(secret_key: &str, launcher: Arc<dyn ScanLauncher>) -> Self {
        Self { secret_key: secret_key.to_string(), launcher }
    }

    fn is_authorized(&self, key: Option<&str>) -> bool {
        key.is_some_and(|k| k == self.secret_key)
    }
}

/// Binds the configured address and serves until the process exits.
pub async fn serve(config: &ServerConfig, launcher: Arc<dyn ScanLauncher>) -> Result<()> {
    if config.secret_key.trim().is_empty() {
        return Err(SentinelError::Config(
            "server.secret_key must be set before the trigger endpoint can start".to_string(),
        ));
    }

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(address = %listener.local_addr()?, "Starting scanner endpoint.");

    let state = Arc::new(TriggerState::new(&config.secret_key, launcher));
    serve_listener(listener, state).await
}

/// Accept loop, one task per connection.
pub async fn serve_listener(listener: TcpListener, state: Arc<TriggerState>) -> Result<()> {
    loop {
        let (stream, remote_addr) = listener.accept().await?;
        let state = Arc::clone(&state);
        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let state = Arc::clone(&state);
                async move { handle_request(req, remote_addr, &state).await }
            });

            if let Err(e) = hyper::server::conn::http1::Builder::new()
                .serve_connection(io, service)
                .await
            {
                debug!(remote = %remote_addr, error = %e, "Connection error.");
            }
        });
    }
}

/// Routes a single request.
pub async fn handle_request<B>(
    req: Request<B>,
    remote_addr: SocketAddr,
    state: &TriggerState,
) -> std::result::Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    debug!(method = %req.method(), path = req.uri().path(), remote = %remote_addr, "Request received.");

    let response = match (req.method(), req.uri().path()) {
        (&Method::GET, "/") => text_response(StatusCode::OK, LIVENESS_MESSAGE),
        (&Method::POST, "/trigger-scan") => trigger_scan(req, remote_addr, state).await,
        (_, "/") => method_not_allowed("GET"),
        (_, "/trigger-scan") => method_not_allowed("POST"),
        _ => json_response(StatusCode::NOT_FOUND, "error", "Not found"),
    };
    Ok(response)
}

async fn trigger_scan<B>(req: Request<B>, remote_addr: SocketAddr, state: &TriggerState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let body = match Limited::new(req.into_body(), MAX_FORM_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            warn!(remote = %remote_addr, limit = MAX_FORM_BYTES, "Trigger request body too large.");
            return json_response(StatusCode::PAYLOAD_TOO_LARGE, "error", "Request body too large");
        }
        Err(e) => {
            warn!(remote = %remote_addr, error = %e, "Failed to read trigger request body.");
            return json_response(StatusCode::BAD_REQUEST, "error", "Unreadable request body");
        }
    };

    let key = form_field(&body, "key");
    if !state.is_authorized(key.as_deref()) {
        warn!(remote = %remote_addr, "Unauthorized scan trigger attempt.");
        return json_response(StatusCode::FORBIDDEN, "error", "Unauthorized");
    }

    match state.launcher.launch() {
        Ok(()) => {
            info!(remote = %remote_addr, "Security scanner triggered successfully.");
            json_response(StatusCode::OK, "success", "Security scan started")
        }
        Err(e) => {
            error!(error = %e, "Failed to trigger scanner.");
            json_response(StatusCode::INTERNAL_SERVER_ERROR, "error", "Failed to start scan")
        }
    }
}

/// Extracts the first value of `name` from an urlencoded form body.
fn form_field(body: &[u8], name: &str) -> Option<String> {
    url::form_urlencoded::parse(body)
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn json_response(status: StatusCode, outcome: &str, message: &str) -> Response<Full<Bytes>> {
    let body = json!({ "status": outcome, "message": message }).to_string();
    build_response(status, "application/json", body)
}

fn method_not_allowed(allow: &'static str) -> Response<Full<Bytes>> {
    let mut response = json_response(StatusCode::METHOD_NOT_ALLOWED, "error", "Method not allowed");
    response.headers_mut().insert(ALLOW, HeaderValue::from_static(allow));
    response
}

fn text_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    build_response(status, "text/plain; charset=utf-8", message.to_string())
}

fn build_response(status: StatusCode, content_type: &'static str, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
