//! HTTP wire protocol
//!
//! `POST /<queue>?v=<payload>` enqueues, `GET /<queue>[?timeout=<secs>]`
//! dequeues. Every other method answers 405.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::{get, MethodRouter},
    Json, Router,
};
use qbroker_core::Broker;
use qbroker_types::{Error, Result};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::debug;
use utoipa::{OpenApi, ToSchema};

// ==================== App State ====================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub broker: Arc<Broker>,
}

impl AppState {
    pub fn new(broker: Arc<Broker>) -> Self {
        Self { broker }
    }
}

// ==================== Request/Response Types ====================

/// Decoded query string as ordered key/value pairs; repeated keys are kept
type QueryPairs = std::result::Result<Query<Vec<(String, String)>>, QueryRejection>;

/// API Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorBody {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
}

// ==================== Error Handling ====================

/// Wrapper for broker errors to implement IntoResponse
pub struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::NoMessage(_) => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        };

        let body = Json(ApiErrorBody {
            error: self.0.to_string(),
            code: self.0.code().to_string(),
        });

        (status, body).into_response()
    }
}

// ==================== Request Parsing ====================

/// Queue name from the request path, leading slash already stripped by routing
fn queue_name(path: Option<Path<String>>) -> Result<String> {
    match path {
        Some(Path(name)) if !name.is_empty() => Ok(name),
        _ => Err(Error::InvalidRequest("Queue name is required".to_string())),
    }
}

/// First value for `key`; later repeats of the same key are ignored
fn first_param(query: QueryPairs, key: &str) -> Result<Option<String>> {
    let Query(pairs) =
        query.map_err(|e| Error::InvalidRequest(format!("Malformed query string: {}", e)))?;
    Ok(pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v))
}

/// Whole seconds to wait; absent or empty means do not wait
fn parse_timeout(raw: Option<&str>) -> Result<Duration> {
    match raw {
        None | Some("") => Ok(Duration::ZERO),
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| Error::InvalidRequest("Invalid timeout parameter".to_string())),
    }
}

// ==================== OpenAPI Documentation ====================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "qbroker API",
        version = "0.1.0",
        description = "In-memory HTTP message broker",
        license(name = "MIT OR Apache-2.0")
    ),
    paths(enqueue, dequeue),
    components(schemas(ApiErrorBody)),
    tags(
        (name = "messages", description = "Queue operations")
    )
)]
pub struct ApiDoc;

// ==================== Handlers ====================

/// Append a payload to a queue
#[utoipa::path(
    post,
    path = "/{queue}",
    tag = "messages",
    params(
        ("queue" = String, Path, description = "Queue name"),
        ("v" = String, Query, description = "Payload to enqueue")
    ),
    responses(
        (status = 200, description = "Payload enqueued"),
        (status = 400, description = "Missing queue name or payload", body = ApiErrorBody)
    )
)]
async fn enqueue(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    query: QueryPairs,
) -> std::result::Result<StatusCode, AppError> {
    let name = queue_name(path)?;
    let payload = match first_param(query, "v")? {
        Some(v) if !v.is_empty() => v,
        _ => return Err(Error::InvalidRequest("No value provided".to_string()).into()),
    };

    state.broker.enqueue(&name, payload);
    debug!(queue = %name, "Enqueued");

    Ok(StatusCode::OK)
}

/// Remove the oldest payload from a queue, optionally waiting for one
#[utoipa::path(
    get,
    path = "/{queue}",
    tag = "messages",
    params(
        ("queue" = String, Path, description = "Queue name"),
        ("timeout" = Option<u64>, Query, description = "Seconds to wait when the queue is empty")
    ),
    responses(
        (status = 200, description = "Payload dequeued", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing queue name or bad timeout", body = ApiErrorBody),
        (status = 404, description = "No messages available", body = ApiErrorBody)
    )
)]
async fn dequeue(
    method: Method,
    State(state): State<AppState>,
    path: Option<Path<String>>,
    query: QueryPairs,
) -> std::result::Result<String, AppError> {
    // GET routes also answer HEAD; a HEAD must never consume a payload.
    if method == Method::HEAD {
        return Err(Error::MethodNotAllowed(method.to_string()).into());
    }

    let name = queue_name(path)?;
    let timeout = parse_timeout(first_param(query, "timeout")?.as_deref())?;

    match state.broker.dequeue(&name, timeout).await {
        Some(payload) => {
            debug!(queue = %name, "Dequeued");
            Ok(payload)
        }
        None => Err(Error::NoMessage(name).into()),
    }
}

async fn method_not_allowed(method: Method) -> AppError {
    AppError(Error::MethodNotAllowed(method.to_string()))
}

// ==================== Router ====================

fn queue_routes() -> MethodRouter<AppState> {
    get(dequeue).post(enqueue).fallback(method_not_allowed)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", queue_routes())
        .route("/*queue", queue_routes())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
