//! Firebase App Check: minting App Check tokens for apps and verifying the
//! tokens that apps present.

pub mod error;
pub mod generator;
pub mod verifier;


pub use error::{AppCheckApiExceptionConverter, AppCheckError};
pub use generator::{AppCheckTokenGenerator, AppCheckTokenOptions};
pub use verifier::{AppCheckTokenVerifier, DecodedAppCheckToken};

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::core::{self, clock::Clock, middleware::AuthMiddleware};
use crate::errors::ExceptionConverter;

const APP_CHECK_V1_API: &str = "https://firebaseappcheck.googleapis.com/v1";

/// An App Check token and its lifetime, e.g. `"3600s"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppCheckToken {
    pub token: String,
    pub ttl: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyAppCheckTokenResponse {
    pub app_id: String,
    pub token: DecodedAppCheckToken,
}

#[derive(Clone)]
pub struct FirebaseAppCheck {
    client: ClientWithMiddleware,
    base_url: String,
    generator: AppCheckTokenGenerator,
    verifier: AppCheckTokenVerifier,
}

impl FirebaseAppCheck {
    /// Fails when the service account names no project or carries no usable
    /// private key.
    pub fn new(middleware: AuthMiddleware, clock: Arc<dyn Clock>) -> Result<Self, AppCheckError> {
        let project_id = middleware.project_id();
        if project_id.is_empty() {
            return Err(AppCheckError::Configuration(
                "the service account key has no project ID".to_string(),
            ));
        }

        let generator =
            AppCheckTokenGenerator::new(middleware.client_email(), &middleware.key.private_key, clock.clone())?;
        let verifier = AppCheckTokenVerifier::new(project_id.clone()).with_clock(clock);

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .with(middleware)
            .build();

        Ok(Self {
            client,
            base_url: format!("{}/projects/{}", APP_CHECK_V1_API, project_id),
            generator,
            verifier,
        })
    }

    #[cfg(test)]
    pub(crate) fn new_with_client(
        client: ClientWithMiddleware,
        base_url: String,
        generator: AppCheckTokenGenerator,
        verifier: AppCheckTokenVerifier,
    ) -> Self {
        Self {
            client,
            base_url,
            generator,
            verifier,
        }
    }

    /// Mints an App Check token for `app_id`.
    pub async fn create_token(
        &self,
        app_id: &str,
        options: Option<AppCheckTokenOptions>,
    ) -> Result<AppCheckToken, AppCheckError> {
        let custom_token = self.generator.create_custom_token(app_id, options.as_ref())?;

        let url = format!("{}/apps/{}:exchangeCustomToken", self.base_url, app_id);
        let request = self.client.post(url).json(&json!({ "customToken": custom_token }));

        core::send_json(request)
            .await
            .map_err(|failure| AppCheckApiExceptionConverter.convert(failure))
    }

    /// Like [`create_token`](Self::create_token), with the token lifetime
    /// given in seconds. Invalid lifetimes fail before any request is made.
    pub async fn create_token_with_ttl(&self, app_id: &str, ttl_secs: i64) -> Result<AppCheckToken, AppCheckError> {
        let options = AppCheckTokenOptions::new(Some(ttl_secs))?;
        self.create_token(app_id, Some(options)).await
    }

    pub async fn verify_token(&self, app_check_token: &str) -> Result<VerifyAppCheckTokenResponse, AppCheckError> {
        let token = self.verifier.verify_token(app_check_token).await?;

        Ok(VerifyAppCheckTokenResponse {
            app_id: token.app_id().to_string(),
            token,
        })
    }
}
