//! Strategies for producing the RS256 signature of a custom token.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest_middleware::ClientWithMiddleware;
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use tracing::debug;

use crate::auth::error::{AuthApiExceptionConverter, AuthError};
use crate::core;
use crate::errors::ExceptionConverter;
use crate::jwt::{self, ALG_NONE, ALG_RS256};

const IAM_BASE_URL: &str = "https://iam.googleapis.com";

/// Signs raw bytes with RSA-SHA256 on behalf of a service account.
#[async_trait]
pub trait BlobSigner: Send + Sync {
    async fn sign_blob(&self, bytes: &[u8]) -> Result<Vec<u8>, AuthError>;

    /// The `alg` header value of tokens signed by this signer.
    fn algorithm(&self) -> &'static str {
        ALG_RS256
    }
}

/// Signs locally with the service account's private key.
#[derive(Clone)]
pub struct LocalKeySigner {
    key: SigningKey<Sha256>,
}

impl LocalKeySigner {
    /// Parses a PKCS#8 or PKCS#1 PEM private key.
    pub fn from_pem(pem: &str) -> Result<Self, AuthError> {
        let key = jwt::signing_key_from_pem(pem).map_err(|e| AuthError::InvalidArgument(e.to_string()))?;

        Ok(Self { key })
    }

    pub fn new(key: RsaPrivateKey) -> Self {
        Self {
            key: SigningKey::new(key),
        }
    }
}

#[async_trait]
impl BlobSigner for LocalKeySigner {
    async fn sign_blob(&self, bytes: &[u8]) -> Result<Vec<u8>, AuthError> {
        Ok(self.key.sign(bytes).to_vec())
    }
}

#[derive(Deserialize)]
struct SignBlobResponse {
    signature: Option<String>,
}

/// Delegates signing to the IAM Credentials `signBlob` endpoint.
///
/// The client must not retry: a failed call is reported after one attempt.
#[derive(Clone)]
pub struct RemoteIamSigner {
    client: ClientWithMiddleware,
    client_email: String,
    base_url: String,
}

impl RemoteIamSigner {
    pub fn new(client: ClientWithMiddleware, client_email: impl Into<String>) -> Self {
        Self::with_base_url(client, client_email, IAM_BASE_URL)
    }

    pub(crate) fn with_base_url(
        client: ClientWithMiddleware,
        client_email: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            client_email: client_email.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl BlobSigner for RemoteIamSigner {
    async fn sign_blob(&self, bytes: &[u8]) -> Result<Vec<u8>, AuthError> {
        let url = format!(
            "{}/v1/projects/-/serviceAccounts/{}:signBlob",
            self.base_url, self.client_email
        );
        debug!(client_email = %self.client_email, "signing blob via IAM");

        let request = self
            .client
            .post(&url)
            .json(&json!({ "bytesToSign": STANDARD.encode(bytes) }));

        let response: SignBlobResponse = core::send_json(request)
            .await
            .map_err(|failure| AuthApiExceptionConverter.convert(failure))?;

        let signature = response
            .signature
            .ok_or_else(|| AuthError::other("Unable to create custom token"))?;

        STANDARD
            .decode(signature)
            .map_err(|_| AuthError::other("Unable to create custom token"))
    }
}

/// A signer that always fails, for apps that cannot sign tokens at all.
#[derive(Debug, Clone)]
pub struct DisabledSigner {
    reason: String,
}

impl DisabledSigner {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl BlobSigner for DisabledSigner {
    async fn sign_blob(&self, _bytes: &[u8]) -> Result<Vec<u8>, AuthError> {
        Err(AuthError::other(self.reason.clone()))
    }
}

/// Produces unsigned tokens, accepted only by the Auth emulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmulatorSigner;

#[async_trait]
impl BlobSigner for EmulatorSigner {
    async fn sign_blob(&self, _bytes: &[u8]) -> Result<Vec<u8>, AuthError> {
        Ok(Vec::new())
    }

    fn algorithm(&self) -> &'static str {
        ALG_NONE
    }
}
