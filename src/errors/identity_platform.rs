use thiserror::Error;

use super::{connection_message, match_reason, ExceptionConverter};
use crate::core::ApiFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    ConfigurationExists,
    ConfigurationNotFound,
}

const IDENTITY_PLATFORM_ERROR_REASONS: &[(&str, Kind)] = &[
    ("configuration_exists", Kind::ConfigurationExists),
    ("configuration_not_found", Kind::ConfigurationNotFound),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityPlatformError {
    #[error("{0}")]
    ApiConnectionFailed(String),
    #[error("The configuration already exists.")]
    ConfigurationExists { status: Option<u16> },
    #[error("The configuration is not found.")]
    ConfigurationNotFound { status: Option<u16> },
    #[error("{message}")]
    Other { status: Option<u16>, message: String },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPlatformApiExceptionConverter;

impl ExceptionConverter for IdentityPlatformApiExceptionConverter {
    type Error = IdentityPlatformError;

    fn convert(&self, failure: ApiFailure) -> IdentityPlatformError {
        let status = failure.status();
        let message = failure.reason();

        if let ApiFailure::Connection(_) = failure {
            return IdentityPlatformError::ApiConnectionFailed(connection_message(&message));
        }

        match match_reason(IDENTITY_PLATFORM_ERROR_REASONS, &message) {
            Some(Kind::ConfigurationExists) => IdentityPlatformError::ConfigurationExists { status },
            Some(Kind::ConfigurationNotFound) => IdentityPlatformError::ConfigurationNotFound { status },
            None => IdentityPlatformError::Other { status, message },
        }
    }
}
