use base64::Engine;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use reqwest::Client;
use rsa::{BigUint, RsaPublicKey};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::jwt::URL_SAFE_LENIENT;

/// Public keys for Firebase ID tokens.
pub const ID_TOKEN_KEYS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Public keys for Firebase session cookies.
pub const SESSION_COOKIE_KEYS_URL: &str =
    "https://identitytoolkit.googleapis.com/v1/sessionCookiePublicKeys";

/// Public keys for App Check tokens.
pub const APP_CHECK_KEYS_URL: &str = "https://firebaseappcheck.googleapis.com/v1/jwks";

const DEFAULT_MAX_AGE_SECS: u64 = 3600;

#[derive(Error, Debug)]
pub enum KeyFetchError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("The key endpoint answered with status {0}")]
    UnexpectedStatus(u16),
    #[error("Failed to parse keys: {0}")]
    ParseError(String),
}

struct CachedKeys {
    keys: HashMap<String, RsaPublicKey>,
    expires_at: Instant,
}

/// A lazily fetched, cached JSON Web Key Set.
///
/// Keys are kept until the `max-age` of the response expires. A lookup for an
/// unknown `kid` triggers a single refresh. Refreshes are serialized, so
/// concurrent misses cause at most one fetch each while the cache itself is
/// only ever replaced as a whole.
#[derive(Clone)]
pub struct PublicKeyManager {
    client: Client,
    url: String,
    cache: Arc<RwLock<Option<CachedKeys>>>,
    refresh: Arc<Mutex<()>>,
}

impl PublicKeyManager {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            cache: Arc::new(RwLock::new(None)),
            refresh: Arc::new(Mutex::new(())),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the key with the given ID, or `None` if the freshly fetched set
    /// does not contain it either.
    pub async fn get_key(&self, kid: &str) -> Result<Option<RsaPublicKey>, KeyFetchError> {
        if let Some(key) = self.cached(kid).await {
            return Ok(Some(key));
        }

        let _guard = self.refresh.lock().await;

        // A concurrent caller may have refreshed while we were waiting.
        if let Some(key) = self.cached(kid).await {
            return Ok(Some(key));
        }

        self.refresh_keys().await?;

        Ok(self.cached(kid).await)
    }

    async fn cached(&self, kid: &str) -> Option<RsaPublicKey> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|cached| Instant::now() < cached.expires_at)
            .and_then(|cached| cached.keys.get(kid).cloned())
    }

    async fn refresh_keys(&self) -> Result<(), KeyFetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| KeyFetchError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(KeyFetchError::UnexpectedStatus(response.status().as_u16()));
        }

        let max_age = response
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_max_age)
            .unwrap_or(DEFAULT_MAX_AGE_SECS);

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| KeyFetchError::ParseError(e.to_string()))?;

        let keys: HashMap<String, RsaPublicKey> = set.keys.iter().filter_map(rsa_key_from_jwk).collect();

        if keys.is_empty() {
            warn!(url = %self.url, "key set contains no usable RSA keys");
        }
        debug!(url = %self.url, count = keys.len(), max_age, "refreshed public keys");

        let mut cache = self.cache.write().await;
        *cache = Some(CachedKeys {
            keys,
            expires_at: Instant::now() + Duration::from_secs(max_age),
        });

        Ok(())
    }
}

fn parse_max_age(cache_control: &str) -> Option<u64> {
    cache_control.split(',').find_map(|part| {
        part.trim()
            .strip_prefix("max-age=")
            .and_then(|value| value.parse::<u64>().ok())
    })
}

fn rsa_key_from_jwk(jwk: &Jwk) -> Option<(String, RsaPublicKey)> {
    let kid = jwk.common.key_id.clone()?;
    let AlgorithmParameters::RSA(params) = &jwk.algorithm else {
        return None;
    };

    let n = URL_SAFE_LENIENT.decode(&params.n).ok()?;
    let e = URL_SAFE_LENIENT.decode(&params.e).ok()?;
    let key = RsaPublicKey::new(BigUint::from_bytes_be(&n), BigUint::from_bytes_be(&e)).ok()?;

    Some((kid, key))
}
