use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use thiserror::Error;

use super::{connection_message, ExceptionConverter};
use crate::core::clock::{Clock, SystemClock};
use crate::core::ApiFailure;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessagingError {
    #[error("{0}")]
    ApiConnectionFailed(String),
    #[error("{0}")]
    InvalidMessage(String),
    #[error("{message}")]
    AuthenticationError { status: u16, message: String },
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    QuotaExceeded {
        message: String,
        retry_after: Option<DateTime<Utc>>,
    },
    #[error("{0}")]
    ServerError(String),
    #[error("{message}")]
    ServerUnavailable {
        message: String,
        retry_after: Option<DateTime<Utc>>,
    },
    #[error("{message}")]
    Other { status: Option<u16>, message: String },
}

impl MessagingError {
    /// When the request may be retried, for throttled or unavailable responses.
    pub fn retry_after(&self) -> Option<DateTime<Utc>> {
        match self {
            MessagingError::QuotaExceeded { retry_after, .. }
            | MessagingError::ServerUnavailable { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessagingApiExceptionConverter {
    clock: Arc<dyn Clock>,
}

impl Default for MessagingApiExceptionConverter {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl MessagingApiExceptionConverter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Resolves a `Retry-After` header given either as delta-seconds or as an
    /// HTTP date.
    fn retry_after(&self, value: Option<&str>) -> Option<DateTime<Utc>> {
        let value = value?.trim();

        // Out-of-range delays are dropped like any other unusable value.
        if let Ok(seconds) = value.parse::<i64>() {
            return TimeDelta::try_seconds(seconds).and_then(|delay| self.clock.now().checked_add_signed(delay));
        }

        DateTime::parse_from_rfc2822(value)
            .ok()
            .map(|date| date.with_timezone(&Utc))
    }
}

impl ExceptionConverter for MessagingApiExceptionConverter {
    type Error = MessagingError;

    fn convert(&self, failure: ApiFailure) -> MessagingError {
        let message = failure.reason();

        match failure {
            ApiFailure::Connection(_) => MessagingError::ApiConnectionFailed(connection_message(&message)),
            ApiFailure::Other(_) => MessagingError::Other { status: None, message },
            ApiFailure::Response {
                status, retry_after, ..
            } => match status {
                400 => MessagingError::InvalidMessage(message),
                401 | 403 => MessagingError::AuthenticationError { status, message },
                404 => MessagingError::NotFound(message),
                429 => MessagingError::QuotaExceeded {
                    message,
                    retry_after: self.retry_after(retry_after.as_deref()),
                },
                500 => MessagingError::ServerError(message),
                503 => MessagingError::ServerUnavailable {
                    message,
                    retry_after: self.retry_after(retry_after.as_deref()),
                },
                _ => MessagingError::Other {
                    status: Some(status),
                    message,
                },
            },
        }
    }
}
