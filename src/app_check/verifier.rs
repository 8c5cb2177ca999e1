use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::app_check::error::AppCheckError;
use crate::core::clock::{Clock, SystemClock};
use crate::core::keys::{PublicKeyManager, APP_CHECK_KEYS_URL};
use crate::jwt::{self, CompactToken, ALG_RS256};

pub const APP_CHECK_ISSUER_PREFIX: &str = "https://firebaseappcheck.googleapis.com/";

/// The verified claims of an App Check token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedAppCheckToken {
    pub iss: String,
    pub sub: String,
    #[serde(deserialize_with = "one_or_many")]
    pub aud: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl DecodedAppCheckToken {
    /// The app the token was issued to.
    pub fn app_id(&self) -> &str {
        &self.sub
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(aud) => vec![aud],
        OneOrMany::Many(aud) => aud,
    })
}

#[derive(Clone)]
pub struct AppCheckTokenVerifier {
    project_id: String,
    keys: PublicKeyManager,
    clock: Arc<dyn Clock>,
}

impl AppCheckTokenVerifier {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            keys: PublicKeyManager::new(APP_CHECK_KEYS_URL),
            clock: Arc::new(SystemClock),
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

    /// Tokens that cannot be decoded fail with `InvalidAppCheckToken`, any
    /// other problem with `FailedToVerifyAppCheckToken`.
    pub async fn verify_token(&self, token: &str) -> Result<DecodedAppCheckToken, AppCheckError> {
        let result = self.verify(token).await;
        if let Err(error) = &result {
            debug!(reason = %error, "App Check token verification failed");
        }
        result
    }

    async fn verify(&self, token: &str) -> Result<DecodedAppCheckToken, AppCheckError> {
        let token = CompactToken::parse(token).map_err(|e| AppCheckError::InvalidAppCheckToken(e.to_string()))?;
        let header = token
            .header()
            .map_err(|e| AppCheckError::InvalidAppCheckToken(e.to_string()))?;
        let decoded: DecodedAppCheckToken = token
            .claims()
            .map_err(|e| AppCheckError::InvalidAppCheckToken(e.to_string()))?;

        if header.alg != ALG_RS256 {
            return Err(AppCheckError::InvalidAppCheckToken(format!(
                "Unsupported algorithm \"{}\"",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AppCheckError::InvalidAppCheckToken("The token has no \"kid\" header".to_string()))?;

        let key = self
            .keys
            .get_key(&kid)
            .await
            .map_err(|e| AppCheckError::FailedToVerifyAppCheckToken(e.to_string()))?;
        let key = key.ok_or_else(|| {
            AppCheckError::FailedToVerifyAppCheckToken(format!("No public key found for \"kid\" {}", kid))
        })?;

        if !jwt::verify(&token, &key) {
            return Err(AppCheckError::FailedToVerifyAppCheckToken(
                "Invalid signature".to_string(),
            ));
        }

        if decoded.exp <= self.clock.now().timestamp() {
            return Err(AppCheckError::FailedToVerifyAppCheckToken("The token is expired".to_string()));
        }

        let scoped_project = format!("projects/{}", self.project_id);
        if !decoded
            .aud
            .iter()
            .any(|aud| *aud == scoped_project || *aud == self.project_id)
        {
            return Err(AppCheckError::FailedToVerifyAppCheckToken(
                "The \"aud\" claim must include the project ID".to_string(),
            ));
        }

        if !decoded.iss.starts_with(APP_CHECK_ISSUER_PREFIX) {
            return Err(AppCheckError::FailedToVerifyAppCheckToken(
                "The token has an incorrect \"iss\" (issuer) claim".to_string(),
            ));
        }

        if decoded.sub.is_empty() {
            return Err(AppCheckError::FailedToVerifyAppCheckToken(
                "The \"sub\" claim must be a non-empty string".to_string(),
            ));
        }

        Ok(decoded)
    }
}
