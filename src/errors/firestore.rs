use thiserror::Error;

use super::{connection_message, ExceptionConverter};
use crate::core::ApiFailure;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FirestoreError {
    #[error("{0}")]
    ApiConnectionFailed(String),
    #[error("{message}")]
    Other { status: Option<u16>, message: String },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FirestoreApiExceptionConverter;

impl ExceptionConverter for FirestoreApiExceptionConverter {
    type Error = FirestoreError;

    fn convert(&self, failure: ApiFailure) -> FirestoreError {
        match failure {
            ApiFailure::Connection(message) => FirestoreError::ApiConnectionFailed(connection_message(&message)),
            failure => FirestoreError::Other {
                status: failure.status(),
                message: failure.reason(),
            },
        }
    }
}
