// HTTP error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;

/// Application error with HTTP status code
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    /// Extra diagnostic detail surfaced to operators (e.g. transcoder log path)
    pub details: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {}

/// Error response JSON structure
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
            details: self.details,
        });

        (self.status, body).into_response()
    }
}

/// Convert livegate_core errors to HTTP errors
impl From<livegate_core::Error> for AppError {
    fn from(err: livegate_core::Error) -> Self {
        use livegate_core::Error;

        match err {
            Error::InvalidInput(msg) => Self::bad_request(msg),
            Error::NotFound(msg) => Self::not_found(msg),
            Error::LaunchFailure { log_path } => {
                Self::internal_server_error("Transcoder failed on startup. Check logs.")
                    .with_details(format!("Log file at {}", log_path.display()))
            }
            Error::ReadinessTimeout { log_path } => Self::internal_server_error(
                "Failed to start stream (timeout). Check the source URL or backend logs.",
            )
            .with_details(format!("Log file at {}", log_path.display())),
            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                Self::internal_server_error("Storage error")
            }
            Error::Serialization(e) => {
                tracing::error!("Serialization error: {}", e);
                Self::internal_server_error("Data processing error")
            }
            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_launch_failure_maps_to_500_with_log_details() {
        let err: AppError = livegate_core::Error::LaunchFailure {
            log_path: PathBuf::from("/tmp/ffmpeg_x.log"),
        }
        .into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.details.expect("details").contains("/tmp/ffmpeg_x.log"));
    }

    #[test]
    fn test_invalid_input_maps_to_400() {
        let err: AppError = livegate_core::Error::InvalidInput("missing url".to_string()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.details.is_none());
    }
}
