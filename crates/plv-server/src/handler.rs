use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use plv_sdk::{Dispatcher, EntityKind, ErrorKind, Operation, PlvError};

/// Body of `POST /v1/invoke` and `POST /v1/query`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Error body: `{"kind": "...", "message": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind: ErrorKind::Internal.as_str(),
            message: message.into(),
        }
    }
}

impl From<PlvError> for ApiError {
    fn from(e: PlvError) -> Self {
        let kind = e.kind();
        Self {
            status: status_for(kind),
            kind: kind.as_str(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "kind": self.kind, "message": self.message }));
        (self.status, body).into_response()
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Argument | ErrorKind::Decode | ErrorKind::ReservedId => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::DuplicateId | ErrorKind::LiveData => StatusCode::CONFLICT,
        ErrorKind::UnknownOwner => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::UninitializedIndex => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Encode
        | ErrorKind::StorageRead
        | ErrorKind::StorageWrite
        | ErrorKind::Config
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler(State(dispatcher): State<Dispatcher>) -> Json<serde_json::Value> {
    let config = dispatcher.plv().config();
    let indexes: serde_json::Map<String, serde_json::Value> = EntityKind::ALL
        .into_iter()
        .map(|kind| (kind.to_string(), json!(config.indexes.key(kind))))
        .collect();
    let operations: Vec<_> = Operation::ALL
        .into_iter()
        .map(|op| json!({ "name": op.name(), "mutation": op.is_mutation() }))
        .collect();
    Json(json!({
        "name": "plv-server",
        "version": env!("CARGO_PKG_VERSION"),
        "indexes": indexes,
        "index_write_mode": config.index_write_mode,
        "validate_image_owner": config.validate_image_owner,
        "operations": operations,
    }))
}

pub async fn invoke_handler(
    State(dispatcher): State<Dispatcher>,
    Json(request): Json<CallRequest>,
) -> Result<Response, ApiError> {
    call(dispatcher, request, false).await
}

pub async fn query_handler(
    State(dispatcher): State<Dispatcher>,
    Json(request): Json<CallRequest>,
) -> Result<Response, ApiError> {
    call(dispatcher, request, true).await
}

async fn call(
    dispatcher: Dispatcher,
    request: CallRequest,
    read_only: bool,
) -> Result<Response, ApiError> {
    let function = request.function.clone();
    // Ledger backends block on I/O.
    let outcome = tokio::task::spawn_blocking(move || {
        if read_only {
            dispatcher.query(&request.function, &request.args)
        } else {
            dispatcher.invoke(&request.function, &request.args)
        }
    })
    .await
    .map_err(|e| ApiError::internal(e.to_string()))?;

    match outcome {
        Ok(payload) if payload.is_empty() => {
            debug!(function = %function, "call completed");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        Ok(payload) => {
            debug!(function = %function, bytes = payload.len(), "call completed");
            Ok(([(header::CONTENT_TYPE, "application/json")], payload).into_response())
        }
        Err(e) => {
            warn!(function = %function, kind = %e.kind(), error = %e, "call failed");
            Err(e.into())
        }
    }
}
