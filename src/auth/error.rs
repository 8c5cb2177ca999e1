use thiserror::Error;

use crate::auth::verifier::TokenVerificationError;
use crate::core::ApiFailure;
use crate::errors::{connection_message, match_reason, ExceptionConverter};

/// The error kinds reported by the Identity Toolkit API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    CredentialsMismatch,
    EmailExists,
    EmailNotFound,
    InvalidCustomToken,
    InvalidPassword,
    MissingPassword,
    OperationNotAllowed,
    UserDisabled,
    UserNotFound,
    WeakPassword,
    PhoneNumberExists,
    ExpiredOobCode,
    InvalidOobCode,
    TenantNotFound,
    PermissionDenied,
}

impl AuthErrorKind {
    pub fn default_message(&self) -> &'static str {
        match self {
            AuthErrorKind::CredentialsMismatch => {
                "Invalid custom token: The custom token corresponds to a different Firebase project."
            }
            AuthErrorKind::EmailExists => "The email address is already in use by another account.",
            AuthErrorKind::EmailNotFound | AuthErrorKind::UserNotFound => {
                "There is no user record corresponding to this identifier. The user may have been deleted."
            }
            AuthErrorKind::InvalidCustomToken => {
                "Invalid custom token: The custom token format is incorrect or the token is invalid for some reason (e.g. expired, invalid signature, etc.)"
            }
            AuthErrorKind::InvalidPassword => "The password is invalid or the user does not have a password.",
            AuthErrorKind::MissingPassword => "Missing Password",
            AuthErrorKind::OperationNotAllowed => "Operation not allowed.",
            AuthErrorKind::UserDisabled => "The user account has been disabled by an administrator.",
            AuthErrorKind::WeakPassword => "The password must be 6 characters long or more.",
            AuthErrorKind::PhoneNumberExists => "The phone number is already in use by another account.",
            AuthErrorKind::ExpiredOobCode => "The action code has expired.",
            AuthErrorKind::InvalidOobCode => {
                "The action code is invalid. This can happen if the code is malformed, expired, or has already been used."
            }
            AuthErrorKind::TenantNotFound => "There is no tenant corresponding to the provided identifier.",
            AuthErrorKind::PermissionDenied => "The caller does not have permission to perform this operation.",
        }
    }
}

/// Substrings of Identity Toolkit error reasons, in match order.
pub(crate) const AUTH_ERROR_REASONS: &[(&str, AuthErrorKind)] = &[
    ("credentials_mismatch", AuthErrorKind::CredentialsMismatch),
    ("email_exists", AuthErrorKind::EmailExists),
    ("email_not_found", AuthErrorKind::EmailNotFound),
    ("invalid_custom_token", AuthErrorKind::InvalidCustomToken),
    ("invalid_password", AuthErrorKind::InvalidPassword),
    ("missing_password", AuthErrorKind::MissingPassword),
    ("operation_not_allowed", AuthErrorKind::OperationNotAllowed),
    ("user_disabled", AuthErrorKind::UserDisabled),
    ("user_not_found", AuthErrorKind::UserNotFound),
    ("weak_password", AuthErrorKind::WeakPassword),
    ("phone_number_exists", AuthErrorKind::PhoneNumberExists),
    ("expired_oob_code", AuthErrorKind::ExpiredOobCode),
    ("invalid_oob_code", AuthErrorKind::InvalidOobCode),
    ("tenant_not_found", AuthErrorKind::TenantNotFound),
    ("permission_denied", AuthErrorKind::PermissionDenied),
];

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    ApiConnectionFailed(String),
    #[error("{message}")]
    Api {
        kind: AuthErrorKind,
        status: Option<u16>,
        message: String,
    },
    #[error("{message}")]
    Other { status: Option<u16>, message: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("The ID token is invalid: {0}")]
    FailedToVerifyToken(#[source] TokenVerificationError),
    #[error("The session cookie is invalid: {0}")]
    FailedToVerifySessionCookie(#[source] TokenVerificationError),
    #[error("The Firebase ID token has been revoked.")]
    RevokedIdToken,
    #[error("The Firebase session cookie has been revoked.")]
    RevokedSessionCookie,
    #[error("Failed to create session cookie: {0}")]
    FailedToCreateSessionCookie(String),
    #[error("Failed to create action link: {0}")]
    FailedToCreateActionLink(String),
    #[error("Failed to send action link: {0}")]
    FailedToSendActionLink(String),
    #[error("Failed to sign in: {0}")]
    FailedToSignIn(String),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AuthError {
    /// The classified API error kind, if this error came from the API.
    pub fn kind(&self) -> Option<AuthErrorKind> {
        match self {
            AuthError::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Api { status, .. } | AuthError::Other { status, .. } => *status,
            _ => None,
        }
    }

    pub(crate) fn user_not_found(identifier: &str) -> Self {
        AuthError::Api {
            kind: AuthErrorKind::UserNotFound,
            status: None,
            message: format!("No user with identifier '{}' was found.", identifier),
        }
    }

    pub(crate) fn other(message: impl Into<String>) -> Self {
        AuthError::Other {
            status: None,
            message: message.into(),
        }
    }
}

/// Converts failed Identity Toolkit calls into [`AuthError`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthApiExceptionConverter;

impl ExceptionConverter for AuthApiExceptionConverter {
    type Error = AuthError;

    fn convert(&self, failure: ApiFailure) -> AuthError {
        let status = failure.status();
        let reason = failure.reason();

        if let ApiFailure::Connection(_) = failure {
            return AuthError::ApiConnectionFailed(connection_message(&reason));
        }

        match match_reason(AUTH_ERROR_REASONS, &reason) {
            Some(kind) => AuthError::Api {
                kind,
                status,
                message: kind.default_message().to_string(),
            },
            None => AuthError::Other { status, message: reason },
        }
    }
}
