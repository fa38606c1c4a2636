//! HTTP API handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Uri};
use axum::response::IntoResponse;
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::ApiError;
use crate::runtime::{self, MemoryUsage};
use crate::utils::iso_timestamp;

/// Greeting returned by `/`.
pub const GREETING: &str = "Hello from Rust on ECS!";

/// Message returned by `/api/echo`.
pub const ECHO_MESSAGE: &str = "Echo endpoint";

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration resolved at startup.
    pub config: Arc<Config>,
    /// When the process started serving.
    pub started_at: Instant,
    /// Prometheus render handle, when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Seconds since the state was created.
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "healthy".
    pub status: &'static str,
    /// Current time, ISO-8601.
    pub timestamp: String,
    /// Seconds since startup.
    pub uptime: f64,
}

/// Secret response.
#[derive(Debug, Serialize)]
pub struct SecretResponse {
    /// Configured secret, `null` when unset.
    pub secret: Option<String>,
}

/// Root greeting response.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub app: String,
    pub environment: String,
    pub version: &'static str,
}

/// Process and environment info response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub app: String,
    pub environment: String,
    pub port: u16,
    /// Runtime identification; the field name is kept for existing consumers.
    pub node_version: String,
    pub platform: &'static str,
    pub memory: MemoryResponse,
}

/// Memory figures in info response.
#[derive(Debug, Serialize)]
pub struct MemoryResponse {
    /// Resident size, e.g. "12MB".
    pub used: String,
    /// Virtual size, e.g. "800MB".
    pub total: String,
}

/// Echo response.
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub message: &'static str,
    pub received: Value,
    pub timestamp: String,
}

/// Health check handler - always returns 200 while the process can answer.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "healthy",
        timestamp: iso_timestamp()?,
        uptime: state.uptime_secs(),
    }))
}

/// Secret handler - returns the configured secret without any access control.
pub async fn secret(State(state): State<AppState>) -> Json<SecretResponse> {
    Json(SecretResponse {
        secret: state.config.app_secret.clone(),
    })
}

/// Root handler - greeting and application identity.
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: GREETING,
        app: state.config.app_name.clone(),
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Info handler - configuration and process runtime figures.
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    let memory = MemoryUsage::current();

    Json(InfoResponse {
        app: state.config.app_name.clone(),
        environment: state.config.environment.clone(),
        port: state.config.port,
        node_version: runtime::runtime_version(),
        platform: runtime::platform(),
        memory: MemoryResponse {
            used: memory.used_display(),
            total: memory.total_display(),
        },
    })
}

/// Echo handler - returns the parsed JSON body unchanged.
///
/// Only bodies typed `application/json` are parsed. An empty body or one of
/// another type echoes as `{}`; a JSON-typed body that fails to parse is a 400.
pub async fn echo(headers: HeaderMap, body: Bytes) -> Result<Json<EchoResponse>, ApiError> {
    let received = if body.is_empty() || !is_json_content_type(&headers) {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(&body)?
    };

    Ok(Json(EchoResponse {
        message: ECHO_MESSAGE,
        received,
        timestamp: iso_timestamp()?,
    }))
}

/// Whether the request declares a JSON body, ignoring parameters like charset.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Metrics handler - Prometheus text exposition.
pub async fn render_metrics(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<impl IntoResponse, ApiError> {
    let handle = state.metrics.as_ref().ok_or_else(|| ApiError::NotFound {
        method,
        path: uri.path().to_string(),
    })?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}

/// Fallback handler for unmatched routes.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound {
        method,
        path: uri.path().to_string(),
    }
}
