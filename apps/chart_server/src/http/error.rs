//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use natal_chart::ChartError;
use serde::{Deserialize, Serialize};

/// Error body returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[derive(Debug)]
pub enum AppError {
    /// Rejected before any computation
    BadRequest(String),
    MethodNotAllowed,
    Chart(ChartError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new(msg)),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ApiError::new("Method Not Allowed"),
            ),
            AppError::Chart(ChartError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, ApiError::new(msg))
            }
            AppError::Chart(e) => {
                error!("Chart request failed (retryable: {}): {:?}", e.is_retryable(), e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("Internal Server Error").with_error(e.to_string()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChartError> for AppError {
    fn from(err: ChartError) -> Self {
        AppError::Chart(err)
    }
}
