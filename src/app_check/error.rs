use thiserror::Error;

use crate::core::ApiFailure;
use crate::errors::{connection_message, ExceptionConverter};

#[derive(Error, Debug)]
pub enum AppCheckError {
    #[error("{0}")]
    ApiConnectionFailed(String),
    #[error("{message}")]
    PermissionDenied { status: u16, message: String },
    #[error("{message}")]
    Api { status: Option<u16>, message: String },
    #[error("Invalid App Check token: {0}")]
    InvalidAppCheckToken(String),
    #[error("Failed to verify App Check token: {0}")]
    FailedToVerifyAppCheckToken(String),
    #[error("Invalid App Check token options: {0}")]
    InvalidAppCheckTokenOptions(String),
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error("Unable to use App Check: {0}")]
    Configuration(String),
}

impl AppCheckError {
    pub fn status(&self) -> Option<u16> {
        match self {
            AppCheckError::PermissionDenied { status, .. } => Some(*status),
            AppCheckError::Api { status, .. } => *status,
            _ => None,
        }
    }
}

/// Converts failed App Check calls, by HTTP status.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppCheckApiExceptionConverter;

impl ExceptionConverter for AppCheckApiExceptionConverter {
    type Error = AppCheckError;

    fn convert(&self, failure: ApiFailure) -> AppCheckError {
        let message = failure.reason();

        match failure {
            ApiFailure::Connection(_) => AppCheckError::ApiConnectionFailed(connection_message(&message)),
            ApiFailure::Response {
                status: status @ (401 | 403),
                ..
            } => AppCheckError::PermissionDenied { status, message },
            other => AppCheckError::Api {
                status: other.status(),
                message,
            },
        }
    }
}
