use axum::{Json, http::StatusCode};
use serde::Serialize;
use std::fmt::Display;
use tracing::error;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// Error responses carry `T::default()` as `data`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// Payload of error responses; serializes as `null`.
#[derive(Debug, Serialize, Default)]
pub struct Empty;

/// The error half of every handler result.
pub type Failure = (StatusCode, Json<ApiResponse<Empty>>);

pub fn failure(status: StatusCode, message: impl Into<String>) -> Failure {
    (status, Json(ApiResponse::error(message)))
}

/// Logs `err` and answers 500 without leaking details.
pub fn internal(err: impl Display) -> Failure {
    error!(error = %err, "request failed");
    failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
