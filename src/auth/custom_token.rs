use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::auth::claims::CustomTokenClaims;
use crate::auth::error::AuthError;
use crate::auth::signer::BlobSigner;
use crate::core::clock::Clock;
use crate::jwt::{self, CompactToken, JwtHeader};

pub const CUSTOM_TOKEN_AUDIENCE: &str =
    "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit";

/// Default and maximum lifetime of a custom token, in seconds.
pub const DEFAULT_CUSTOM_TOKEN_TTL: i64 = 3600;
pub const MAX_CUSTOM_TOKEN_TTL: i64 = 3600;

const MAX_UID_LENGTH: usize = 128;

/// Claim names that developer claims may not use.
pub const RESERVED_CLAIMS: &[&str] = &[
    "acr", "amr", "at_hash", "aud", "auth_time", "azp", "cnf", "c_hash", "exp", "firebase", "iat", "iss", "jti",
    "nbf", "nonce", "sub", "uid", "tenant_id",
];

/// Mints custom tokens for the service account identified by `client_email`.
#[derive(Clone)]
pub struct CustomTokenGenerator {
    client_email: String,
    signer: Arc<dyn BlobSigner>,
    tenant_id: Option<String>,
    clock: Arc<dyn Clock>,
}

impl CustomTokenGenerator {
    pub fn new(client_email: impl Into<String>, signer: Arc<dyn BlobSigner>, clock: Arc<dyn Clock>) -> Self {
        Self {
            client_email: client_email.into(),
            signer,
            tenant_id: None,
            clock,
        }
    }

    pub fn with_tenant_id(mut self, tenant_id: Option<String>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    /// Creates a token for `uid` that expires at `expires_at`, or one hour
    /// from now.
    pub async fn create_custom_token(
        &self,
        uid: &str,
        claims: Map<String, Value>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<CompactToken, AuthError> {
        let now = self.clock.now();
        let expires_at = expires_at.unwrap_or(now + Duration::seconds(DEFAULT_CUSTOM_TOKEN_TTL));

        self.build(uid, claims, now, expires_at).await
    }

    /// Creates a token for `uid` that is valid for `ttl_secs` seconds.
    pub async fn create_custom_token_with_ttl(
        &self,
        uid: &str,
        claims: Map<String, Value>,
        ttl_secs: i64,
    ) -> Result<CompactToken, AuthError> {
        if ttl_secs <= 0 || ttl_secs > MAX_CUSTOM_TOKEN_TTL {
            return Err(AuthError::InvalidArgument(format!(
                "The expiration time must be between 1 and {} seconds, {} given",
                MAX_CUSTOM_TOKEN_TTL, ttl_secs
            )));
        }

        let now = self.clock.now();
        self.build(uid, claims, now, now + Duration::seconds(ttl_secs)).await
    }

    async fn build(
        &self,
        uid: &str,
        claims: Map<String, Value>,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<CompactToken, AuthError> {
        validate_uid(uid)?;
        validate_claims(&claims)?;

        let iat = now.timestamp();
        let exp = expires_at.timestamp();
        if exp <= iat {
            return Err(AuthError::InvalidArgument(
                "The expiration time must be in the future".to_string(),
            ));
        }

        let payload = CustomTokenClaims {
            iss: self.client_email.clone(),
            sub: self.client_email.clone(),
            aud: CUSTOM_TOKEN_AUDIENCE.to_string(),
            iat,
            exp,
            uid: uid.to_string(),
            tenant_id: self.tenant_id.clone(),
            claims,
        };

        let header = JwtHeader {
            alg: self.signer.algorithm().to_string(),
            ..JwtHeader::rs256()
        };
        let header = jwt::encode_segment(&header).map_err(|e| AuthError::other(e.to_string()))?;
        let payload = jwt::encode_segment(&payload).map_err(|e| AuthError::other(e.to_string()))?;

        let signature = self
            .signer
            .sign_blob(format!("{}.{}", header, payload).as_bytes())
            .await?;

        Ok(CompactToken::from_parts(
            &header,
            &payload,
            &URL_SAFE_NO_PAD.encode(signature),
        ))
    }
}

pub(crate) fn validate_uid(uid: &str) -> Result<(), AuthError> {
    if uid.trim().is_empty() {
        return Err(AuthError::InvalidArgument("The uid must not be empty".to_string()));
    }
    if uid.chars().count() > MAX_UID_LENGTH {
        return Err(AuthError::InvalidArgument(format!(
            "The uid must not be longer than {} characters",
            MAX_UID_LENGTH
        )));
    }

    Ok(())
}

fn validate_claims(claims: &Map<String, Value>) -> Result<(), AuthError> {
    let reserved: Vec<&str> = claims
        .keys()
        .map(String::as_str)
        .filter(|key| RESERVED_CLAIMS.contains(key))
        .collect();

    if reserved.is_empty() {
        Ok(())
    } else {
        Err(AuthError::InvalidArgument(format!(
            "Developer claims must not contain reserved names: {}",
            reserved.join(", ")
        )))
    }
}
