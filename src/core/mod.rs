//! Plumbing shared by every service client: request dispatch, capture of
//! failed calls, error body parsing, clocks and public key sets.

pub mod clock;
pub mod keys;
pub mod middleware;

use reqwest_middleware::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// A failed API call, captured before it is classified by a service specific
/// [`ExceptionConverter`](crate::errors::ExceptionConverter).
///
/// Transport errors from `reqwest` are folded into this type at the client
/// boundary so that they never surface in public error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// No response was received (DNS, connect, timeout, ...).
    Connection(String),
    /// The API answered with a non-success status code.
    Response {
        status: u16,
        url: String,
        body: String,
        retry_after: Option<String>,
    },
    /// Anything else: credential middleware failures, unreadable bodies.
    Other(String),
}

impl ApiFailure {
    /// Returns the HTTP status code, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiFailure::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the normalized error reason of the failure.
    ///
    /// For responses this is the reason extracted by [`error_reason`], for
    /// everything else it is the captured message.
    pub fn reason(&self) -> String {
        match self {
            ApiFailure::Connection(message) | ApiFailure::Other(message) => message.clone(),
            ApiFailure::Response { body, .. } => error_reason(body),
        }
    }

    pub(crate) fn from_middleware(error: reqwest_middleware::Error) -> Self {
        match error {
            reqwest_middleware::Error::Reqwest(e) => Self::from_reqwest(e),
            #[allow(unreachable_patterns)]
            other => ApiFailure::Other(other.to_string()),
        }
    }

    pub(crate) fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() || error.is_request() {
            ApiFailure::Connection(error.to_string())
        } else {
            ApiFailure::Other(error.to_string())
        }
    }

    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.text().await.unwrap_or_default();

        ApiFailure::Response {
            status,
            url,
            body,
            retry_after,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::Response { status, .. } => write!(f, "{} (code: {})", self.reason(), status),
            _ => f.write_str(&self.reason()),
        }
    }
}

/// Extracts the error reason from a Google API error body.
///
/// Google APIs answer with `{"error": {"message": "..."}}`, the Realtime
/// Database with `{"error": "..."}`. Bodies in neither shape are returned
/// unchanged.
pub fn error_reason(body: &str) -> String {
    let Ok(data) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    match data.get("error") {
        Some(Value::String(reason)) => reason.clone(),
        Some(error) => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        None => body.to_string(),
    }
}

/// Sends a request once and captures non-success responses as [`ApiFailure`].
pub(crate) async fn send(request: RequestBuilder) -> Result<reqwest::Response, ApiFailure> {
    let response = request.send().await.map_err(ApiFailure::from_middleware)?;

    if response.status().is_success() {
        return Ok(response);
    }

    let failure = ApiFailure::from_response(response).await;
    debug!(status = ?failure.status(), reason = %failure.reason(), "API request failed");

    Err(failure)
}

/// Like [`send`], and decodes the JSON body of a successful response.
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiFailure> {
    let response = send(request).await?;

    response
        .json::<T>()
        .await
        .map_err(|e| ApiFailure::Other(format!("Unable to parse the response data: {}", e)))
}
