use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::invoker::Fault;

/// Web layer errors. Only infrastructure faults reach this type; business
/// outcomes travel as data inside 200-OK response bodies.
#[derive(Debug)]
pub enum WebError {
    Fault(Fault),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::Fault(Fault::Timeout) => (
                StatusCode::GATEWAY_TIMEOUT,
                Json(json!({
                    "error": "Request timed out"
                })),
            )
                .into_response(),
            Self::Fault(fault) => {
                tracing::error!(error = %fault, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "An internal error occurred"
                    })),
                )
                    .into_response()
            }
        }
    }
}

impl From<Fault> for WebError {
    fn from(fault: Fault) -> Self {
        Self::Fault(fault)
    }
}

pub type WebResult<T> = Result<T, WebError>;
