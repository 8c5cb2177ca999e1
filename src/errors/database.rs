use thiserror::Error;
use url::Url;

use super::{connection_message, ExceptionConverter};
use crate::core::ApiFailure;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    #[error("{0}")]
    ApiConnectionFailed(String),
    #[error("{message}")]
    PermissionDenied { status: u16, message: String },
    #[error("{message}")]
    PreconditionFailed { status: u16, message: String },
    #[error("The database at {url} could not be found. Databases created after September 2020 carry the '-default-rtdb' suffix, e.g. {suggested_url}")]
    DatabaseNotFound { url: String, suggested_url: String },
    #[error("{message}")]
    Other { status: Option<u16>, message: String },
}

impl DatabaseError {
    pub fn status(&self) -> Option<u16> {
        match self {
            DatabaseError::PermissionDenied { status, .. } | DatabaseError::PreconditionFailed { status, .. } => {
                Some(*status)
            }
            DatabaseError::DatabaseNotFound { .. } => Some(404),
            DatabaseError::Other { status, .. } => *status,
            DatabaseError::ApiConnectionFailed(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseApiExceptionConverter;

impl ExceptionConverter for DatabaseApiExceptionConverter {
    type Error = DatabaseError;

    fn convert(&self, failure: ApiFailure) -> DatabaseError {
        let message = failure.reason();

        match failure {
            ApiFailure::Connection(_) => DatabaseError::ApiConnectionFailed(connection_message(&message)),
            ApiFailure::Other(_) => DatabaseError::Other { status: None, message },
            ApiFailure::Response { status, url, .. } => match status {
                401 | 403 => DatabaseError::PermissionDenied { status, message },
                412 => DatabaseError::PreconditionFailed { status, message },
                404 => database_not_found(&url),
                _ => DatabaseError::Other {
                    status: Some(status),
                    message,
                },
            },
        }
    }
}

fn database_not_found(request_url: &str) -> DatabaseError {
    let (url, name) = match Url::parse(request_url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default().to_string();
            let name = host.split('.').next().unwrap_or_default().to_string();
            (format!("{}://{}", parsed.scheme(), host), name)
        }
        Err(_) => (request_url.to_string(), String::new()),
    };

    let suggested_url = if name.is_empty() {
        url.clone()
    } else {
        url.replacen(&name, &format!("{}-default-rtdb", name), 1)
    };

    DatabaseError::DatabaseNotFound { url, suggested_url }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> ApiFailure {
        ApiFailure::Response {
            status,
            url: "https://my-project.firebaseio.com/users.json".to_string(),
            body: r#"{"error":"Permission denied"}"#.to_string(),
            retry_after: None,
        }
    }

    #[test]
    fn test_status_mapping() {
        let converter = DatabaseApiExceptionConverter;

        for status in [401, 403] {
            assert_eq!(
                converter.convert(response(status)),
                DatabaseError::PermissionDenied {
                    status,
                    message: "Permission denied".to_string()
                }
            );
        }
        assert!(matches!(
            converter.convert(response(412)),
            DatabaseError::PreconditionFailed { status: 412, .. }
        ));
        assert!(matches!(
            converter.convert(response(500)),
            DatabaseError::Other { status: Some(500), .. }
        ));
    }

    #[test]
    fn test_not_found_suggests_default_rtdb_name() {
        let error = DatabaseApiExceptionConverter.convert(response(404));
        assert_eq!(
            error,
            DatabaseError::DatabaseNotFound {
                url: "https://my-project.firebaseio.com".to_string(),
                suggested_url: "https://my-project-default-rtdb.firebaseio.com".to_string(),
            }
        );
    }

    #[test]
    fn test_connection_failure() {
        let error = DatabaseApiExceptionConverter.convert(ApiFailure::Connection("timed out".to_string()));
        assert_eq!(
            error,
            DatabaseError::ApiConnectionFailed("Unable to connect to the API: timed out".to_string())
        );
    }
}
