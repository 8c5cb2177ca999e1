use thiserror::Error;

use super::{connection_message, match_reason, ExceptionConverter};
use crate::core::ApiFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteConfigErrorKind {
    PermissionDenied,
    OperationAborted,
    VersionMismatch,
    ValidationFailed,
}

const REMOTE_CONFIG_ERROR_REASONS: &[(&str, RemoteConfigErrorKind)] = &[
    ("permission_denied", RemoteConfigErrorKind::PermissionDenied),
    ("aborted", RemoteConfigErrorKind::OperationAborted),
    ("version_mismatch", RemoteConfigErrorKind::VersionMismatch),
    ("validation_error", RemoteConfigErrorKind::ValidationFailed),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteConfigError {
    #[error("{0}")]
    ApiConnectionFailed(String),
    #[error("{message}")]
    Api {
        kind: RemoteConfigErrorKind,
        status: Option<u16>,
        message: String,
    },
    #[error("{message}")]
    Other { status: Option<u16>, message: String },
}

impl RemoteConfigError {
    pub fn kind(&self) -> Option<RemoteConfigErrorKind> {
        match self {
            RemoteConfigError::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteConfigApiExceptionConverter;

impl ExceptionConverter for RemoteConfigApiExceptionConverter {
    type Error = RemoteConfigError;

    fn convert(&self, failure: ApiFailure) -> RemoteConfigError {
        let status = failure.status();
        let message = failure.reason();

        if let ApiFailure::Connection(_) = failure {
            return RemoteConfigError::ApiConnectionFailed(connection_message(&message));
        }

        match match_reason(REMOTE_CONFIG_ERROR_REASONS, &message) {
            Some(kind) => RemoteConfigError::Api { kind, status, message },
            None => RemoteConfigError::Other { status, message },
        }
    }
}
