use rsa::pkcs1v15::SigningKey;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;

use crate::app_check::error::AppCheckError;
use crate::core::clock::Clock;
use crate::jwt::{self, CompactToken, JwtHeader};

pub const APP_CHECK_AUDIENCE: &str =
    "https://firebaseappcheck.googleapis.com/google.firebase.appcheck.v1.TokenExchangeService";

/// Lifetime of the custom token itself. It is exchanged right away.
const CUSTOM_TOKEN_LIFETIME_SECS: i64 = 300;

pub const MIN_APP_CHECK_TTL: i64 = 30 * 60;
pub const MAX_APP_CHECK_TTL: i64 = 7 * 24 * 60 * 60;

/// Options for the App Check token returned by the exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppCheckTokenOptions {
    ttl: Option<i64>,
}

impl AppCheckTokenOptions {
    /// `ttl_secs` must lie between 30 minutes and 7 days.
    pub fn new(ttl_secs: Option<i64>) -> Result<Self, AppCheckError> {
        if let Some(ttl) = ttl_secs {
            if !(MIN_APP_CHECK_TTL..=MAX_APP_CHECK_TTL).contains(&ttl) {
                return Err(AppCheckError::InvalidAppCheckTokenOptions(format!(
                    "The ttl must be between {} and {} seconds, {} given",
                    MIN_APP_CHECK_TTL, MAX_APP_CHECK_TTL, ttl
                )));
            }
        }

        Ok(Self { ttl: ttl_secs })
    }

    pub fn ttl(&self) -> Option<i64> {
        self.ttl
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCheckCustomTokenClaims {
    pub iss: String,
    pub sub: String,
    pub app_id: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
}

#[derive(Clone)]
pub struct AppCheckTokenGenerator {
    client_email: String,
    key: SigningKey<Sha256>,
    clock: Arc<dyn Clock>,
}

impl AppCheckTokenGenerator {
    pub fn new(client_email: impl Into<String>, private_key_pem: &str, clock: Arc<dyn Clock>) -> Result<Self, AppCheckError> {
        let key = jwt::signing_key_from_pem(private_key_pem).map_err(|e| AppCheckError::InvalidPrivateKey(e.to_string()))?;

        Ok(Self {
            client_email: client_email.into(),
            key,
            clock,
        })
    }

    pub fn create_custom_token(
        &self,
        app_id: &str,
        options: Option<&AppCheckTokenOptions>,
    ) -> Result<String, AppCheckError> {
        if app_id.trim().is_empty() {
            return Err(AppCheckError::InvalidAppCheckTokenOptions(
                "The app ID must not be empty".to_string(),
            ));
        }

        let now = self.clock.now().timestamp();
        let claims = AppCheckCustomTokenClaims {
            iss: self.client_email.clone(),
            sub: self.client_email.clone(),
            app_id: app_id.to_string(),
            aud: APP_CHECK_AUDIENCE.to_string(),
            iat: now,
            exp: now + CUSTOM_TOKEN_LIFETIME_SECS,
            ttl: options.and_then(AppCheckTokenOptions::ttl).map(|ttl| format!("{}s", ttl)),
        };

        let header = jwt::encode_segment(&JwtHeader::rs256()).map_err(|e| AppCheckError::Configuration(e.to_string()))?;
        let payload = jwt::encode_segment(&claims).map_err(|e| AppCheckError::Configuration(e.to_string()))?;
        let signature = jwt::sign(&header, &payload, &self.key);

        Ok(CompactToken::from_parts(&header, &payload, &signature).into_string())
    }
}
