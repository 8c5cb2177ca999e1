use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::auth::claims::FirebaseTokenClaims;
use crate::core::clock::{Clock, SystemClock};
use crate::core::keys::{KeyFetchError, PublicKeyManager, ID_TOKEN_KEYS_URL, SESSION_COOKIE_KEYS_URL};
use crate::jwt::{self, CompactToken, JwtError, ALG_RS256};

const REQUIRED_CLAIMS: [&str; 5] = ["exp", "iat", "iss", "aud", "sub"];

#[derive(Error, Debug)]
pub enum TokenVerificationError {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("missing claim {0}")]
    MissingClaim(&'static str),
    #[error("the subject must be a non-empty string")]
    InvalidSubject,
    #[error("expired")]
    Expired,
    #[error("issued in the future")]
    IssuedInTheFuture,
    #[error("authenticated in the future")]
    AuthenticatedInTheFuture,
    #[error("invalid issuer '{0}'")]
    InvalidIssuer(String),
    #[error("invalid audience '{0}'")]
    InvalidAudience(String),
    #[error("unsupported algorithm '{0}'")]
    UnsupportedAlgorithm(String),
    #[error("missing key ID")]
    MissingKeyId,
    #[error("unknown key ID '{0}'")]
    UnknownKey(String),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("tenant ID mismatch, expected {expected:?}, found {actual:?}")]
    TenantMismatch {
        expected: Option<String>,
        actual: Option<String>,
    },
    #[error("unable to fetch public keys: {0}")]
    KeyFetch(#[from] KeyFetchError),
    #[error("error while getting the token's user: {0}")]
    UserLookupFailed(String),
}

impl From<JwtError> for TokenVerificationError {
    fn from(error: JwtError) -> Self {
        TokenVerificationError::Malformed(error.to_string())
    }
}

/// Which kind of Firebase token a verifier accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    IdToken,
    SessionCookie,
}

impl TokenKind {
    pub fn issuer(&self, project_id: &str) -> String {
        match self {
            TokenKind::IdToken => format!("https://securetoken.google.com/{}", project_id),
            TokenKind::SessionCookie => format!("https://session.firebase.google.com/{}", project_id),
        }
    }

    fn keys_url(&self) -> &'static str {
        match self {
            TokenKind::IdToken => ID_TOKEN_KEYS_URL,
            TokenKind::SessionCookie => SESSION_COOKIE_KEYS_URL,
        }
    }
}

/// Verifies Firebase ID tokens or session cookies for one project.
///
/// Checks run in a fixed order: structure, required claims, expiry,
/// issued-at, authentication time, issuer, audience, signature. The first
/// failing check decides the error.
#[derive(Clone)]
pub struct IdTokenVerifier {
    project_id: String,
    kind: TokenKind,
    tenant_id: Option<String>,
    keys: PublicKeyManager,
    clock: Arc<dyn Clock>,
    skip_signature: bool,
}

impl IdTokenVerifier {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::for_kind(project_id, TokenKind::IdToken)
    }

    pub fn for_session_cookies(project_id: impl Into<String>) -> Self {
        Self::for_kind(project_id, TokenKind::SessionCookie)
    }

    fn for_kind(project_id: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            project_id: project_id.into(),
            kind,
            tenant_id: None,
            keys: PublicKeyManager::new(kind.keys_url()),
            clock: Arc::new(SystemClock),
            skip_signature: false,
        }
    }

    pub fn with_key_manager(mut self, keys: PublicKeyManager) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Requires `firebase.tenant` of every token to equal `tenant_id`.
    pub fn with_tenant_id(mut self, tenant_id: Option<String>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    /// Accepts the unsigned tokens issued by the Auth emulator.
    pub fn for_emulator(mut self) -> Self {
        self.skip_signature = true;
        self
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub async fn verify_token(
        &self,
        token: &str,
        leeway_secs: i64,
    ) -> Result<FirebaseTokenClaims, TokenVerificationError> {
        let result = self.verify(token, leeway_secs).await;

        if let Err(error) = &result {
            debug!(kind = ?self.kind, reason = %error, "token verification failed");
        }

        result
    }

    async fn verify(&self, token: &str, leeway_secs: i64) -> Result<FirebaseTokenClaims, TokenVerificationError> {
        let token = CompactToken::parse(token)?;
        let header = token.header()?;
        let raw: Map<String, Value> = token.claims()?;

        for name in REQUIRED_CLAIMS {
            if raw.get(name).map_or(true, Value::is_null) {
                return Err(TokenVerificationError::MissingClaim(name));
            }
        }

        let claims: FirebaseTokenClaims = serde_json::from_value(Value::Object(raw))
            .map_err(|e| TokenVerificationError::Malformed(e.to_string()))?;

        if claims.sub.is_empty() {
            return Err(TokenVerificationError::InvalidSubject);
        }

        let now = self.clock.now().timestamp();
        let latest = now.saturating_add(leeway_secs);

        if claims.exp.saturating_add(leeway_secs) < now {
            return Err(TokenVerificationError::Expired);
        }
        if claims.iat > latest {
            return Err(TokenVerificationError::IssuedInTheFuture);
        }
        if let Some(auth_time) = claims.auth_time {
            if auth_time > latest {
                return Err(TokenVerificationError::AuthenticatedInTheFuture);
            }
        }

        if claims.iss != self.kind.issuer(&self.project_id) {
            return Err(TokenVerificationError::InvalidIssuer(claims.iss));
        }
        if claims.aud != self.project_id {
            return Err(TokenVerificationError::InvalidAudience(claims.aud));
        }

        if !self.skip_signature {
            if header.alg != ALG_RS256 {
                return Err(TokenVerificationError::UnsupportedAlgorithm(header.alg));
            }

            let kid = header.kid.ok_or(TokenVerificationError::MissingKeyId)?;
            let key = self.keys.get_key(&kid).await?;
            let key = key.ok_or(TokenVerificationError::UnknownKey(kid))?;

            if !jwt::verify(&token, &key) {
                return Err(TokenVerificationError::InvalidSignature);
            }
        }

        if self.tenant_id.is_some() && claims.tenant_id() != self.tenant_id.as_deref() {
            return Err(TokenVerificationError::TenantMismatch {
                expected: self.tenant_id.clone(),
                actual: claims.tenant_id().map(str::to_string),
            });
        }

        Ok(claims)
    }
}
