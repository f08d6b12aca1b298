//! HTTP surface: application state, router assembly, and the upstream relay.

use crate::bootstrap;
use crate::config::Config;
use crate::dispatch::{ApiClient, Envelope};
use crate::gate;
use crate::middleware::logging::request_logging;
use crate::session::{logout, CredentialStore, SessionContext};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::warn;

/// Largest request body the relay will buffer.
const MAX_RELAY_BODY: usize = 10 * 1024 * 1024;

/// Request headers worth carrying through to the console upstream.
const RELAYED_HEADERS: [&str; 4] = ["cookie", "authorization", "content-type", "accept"];

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<SessionContext>,
    pub api: Arc<ApiClient>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let store = CredentialStore::new(&config.credentials_db_path)
            .context("Failed to open credential store")?;
        let api = ApiClient::new(
            &config.api_base_url,
            Duration::from_secs(config.api_timeout_secs),
        )?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .context("Failed to build relay HTTP client")?;

        Ok(Self {
            config: Arc::new(config),
            session: Arc::new(SessionContext::new(store)),
            api: Arc::new(api),
            http,
        })
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(bootstrap::bootstrap))
        .route("/auth/logout", get(logout::logout).post(logout::logout))
        .fallback(forward_to_console)
        .layer(axum::middleware::from_fn(gate::route_gate))
        .layer(axum::middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<Envelope<serde_json::Value>> {
    Json(Envelope::ok(json!({ "status": "ok", "service": "guichet" })))
}

/// Relay a gate-admitted navigation to the console upstream, preserving
/// method, path, query, and body. Rendering is the upstream's concern.
async fn forward_to_console(State(state): State<AppState>, req: Request) -> Response {
    let mut target = format!(
        "{}{}",
        state.config.upstream_url.trim_end_matches('/'),
        req.uri().path()
    );
    if let Some(query) = req.uri().query() {
        target.push('?');
        target.push_str(query);
    }

    let method = match reqwest::Method::from_bytes(req.method().as_str().as_bytes()) {
        Ok(m) => m,
        Err(_) => return StatusCode::METHOD_NOT_ALLOWED.into_response(),
    };

    let mut relayed_headers = Vec::new();
    for name in RELAYED_HEADERS {
        if let Some(value) = req.headers().get(name).and_then(|v| v.to_str().ok()) {
            relayed_headers.push((name, value.to_string()));
        }
    }

    let body = match axum::body::to_bytes(req.into_body(), MAX_RELAY_BODY).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(Envelope::<()>::fail("Request body too large")),
            )
                .into_response()
        }
    };

    let mut upstream = state.http.request(method, &target);
    for (name, value) in relayed_headers {
        upstream = upstream.header(name, value);
    }
    if !body.is_empty() {
        upstream = upstream.body(body.to_vec());
    }

    match upstream.send().await {
        Ok(resp) => {
            let status = StatusCode::from_u16(resp.status().as_u16())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            let content_type = resp
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            match resp.bytes().await {
                Ok(bytes) => {
                    let mut builder = Response::builder().status(status);
                    if let Some(ct) = content_type {
                        builder = builder.header(header::CONTENT_TYPE, ct);
                    }
                    builder
                        .body(Body::from(bytes))
                        .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response())
                }
                Err(e) => (
                    StatusCode::BAD_GATEWAY,
                    Json(Envelope::<()>::fail(format!("Upstream read failed: {e}"))),
                )
                    .into_response(),
            }
        }
        Err(e) => {
            warn!(target, "Console upstream unreachable: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Json(Envelope::<()>::fail(format!(
                    "Console upstream unreachable: {e}"
                ))),
            )
                .into_response()
        }
    }
}
