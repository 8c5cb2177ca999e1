//! Classification of failed API calls into per-service error types.
//!
//! Every service has its own converter. Converters are pure: the same
//! [`ApiFailure`] always yields the same error kind.

pub mod database;
pub mod firestore;
pub mod identity_platform;
pub mod messaging;
pub mod remote_config;

pub use database::{DatabaseApiExceptionConverter, DatabaseError};
pub use firestore::{FirestoreApiExceptionConverter, FirestoreError};
pub use identity_platform::{IdentityPlatformApiExceptionConverter, IdentityPlatformError};
pub use messaging::{MessagingApiExceptionConverter, MessagingError};
pub use remote_config::{RemoteConfigApiExceptionConverter, RemoteConfigError};

use crate::core::ApiFailure;

/// Maps a failed API call to a typed error.
pub trait ExceptionConverter {
    type Error;

    fn convert(&self, failure: ApiFailure) -> Self::Error;
}

/// Returns the kind of the first table entry whose pattern occurs in
/// `reason`, ignoring case.
pub(crate) fn match_reason<K: Copy>(table: &[(&str, K)], reason: &str) -> Option<K> {
    let reason = reason.to_lowercase();

    table
        .iter()
        .find(|(pattern, _)| reason.contains(pattern))
        .map(|(_, kind)| *kind)
}

pub(crate) fn connection_message(message: &str) -> String {
    format!("Unable to connect to the API: {}", message)
}
