//! Firebase Authentication: custom tokens, ID token and session cookie
//! verification, user management, email action links and sign-in flows.

mod api_client;
pub mod claims;
pub mod config;
pub mod custom_token;
pub mod error;
pub mod models;
pub mod sign_in;
pub mod signer;
pub mod urls;
pub mod verifier;

#[cfg(test)]
mod tests;

pub use claims::{CustomTokenClaims, FirebaseTokenClaims};
pub use config::{AuthConfig, AuthEmulatorConfig};
pub use custom_token::CustomTokenGenerator;
pub use error::{AuthApiExceptionConverter, AuthError, AuthErrorKind};
pub use sign_in::{IdpCredentials, SignIn, SignInResult};
pub use signer::{BlobSigner, DisabledSigner, LocalKeySigner, RemoteIamSigner};
pub use verifier::{IdTokenVerifier, TokenKind, TokenVerificationError};

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::api_client::ApiClient;
use crate::auth::custom_token::validate_uid;
use crate::auth::models::{
    ActionCodeSettings, CreateUserRequest, DeleteUsersRequest, DeleteUsersResult, EmailActionType,
    GetAccountInfoRequest, ListUsersResponse, UpdateUserRequest, UserRecord,
};
use crate::auth::signer::EmulatorSigner;
use crate::auth::urls::ResourceUrls;
use crate::core::clock::Clock;
use crate::core::middleware::{AuthMiddleware, EmulatorMiddleware};
use crate::jwt::CompactToken;

/// Bounds of a session cookie lifetime, in seconds.
pub const MIN_SESSION_COOKIE_TTL: i64 = 5 * 60;
pub const MAX_SESSION_COOKIE_TTL: i64 = 14 * 24 * 60 * 60;

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Clone)]
pub struct FirebaseAuth {
    client: ApiClient,
    token_generator: CustomTokenGenerator,
    id_token_verifier: IdTokenVerifier,
    session_cookie_verifier: IdTokenVerifier,
}

impl FirebaseAuth {
    /// Creates the client for the project in `config`.
    ///
    /// Custom tokens are signed locally when the service account carries a
    /// usable private key, and through the IAM `signBlob` API otherwise.
    /// Against the emulator, tokens are unsigned and every request carries
    /// the emulator owner token.
    pub fn new(middleware: AuthMiddleware, config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let client_email = middleware.client_email().to_string();

        let (client, signer): (ClientWithMiddleware, Arc<dyn BlobSigner>) = if config.emulator.is_enabled() {
            debug!(host = ?config.emulator.host, "using the Auth emulator");
            (
                ClientBuilder::new(Client::new()).with(EmulatorMiddleware).build(),
                Arc::new(EmulatorSigner),
            )
        } else {
            let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
            let client = ClientBuilder::new(Client::new())
                .with(RetryTransientMiddleware::new_with_policy(retry_policy))
                .with(middleware.clone())
                .build();

            (client, Self::select_signer(&middleware))
        };

        let mut auth = Self::from_parts(client, ResourceUrls::new(&config), client_email, signer, clock);
        if config.emulator.is_enabled() {
            auth.id_token_verifier = auth.id_token_verifier.for_emulator();
            auth.session_cookie_verifier = auth.session_cookie_verifier.for_emulator();
        }
        match &config.tenant_id {
            Some(tenant_id) => auth.for_tenant(tenant_id),
            None => auth,
        }
    }

    fn select_signer(middleware: &AuthMiddleware) -> Arc<dyn BlobSigner> {
        let key = &middleware.key;

        if key.client_email.is_empty() {
            warn!("service account has no client email, custom tokens cannot be created");
            return Arc::new(DisabledSigner::new(
                "Custom tokens cannot be created without a service account client email",
            ));
        }

        match LocalKeySigner::from_pem(&key.private_key) {
            Ok(signer) => {
                debug!(client_email = %key.client_email, "signing custom tokens with the service account key");
                Arc::new(signer)
            }
            Err(e) => {
                warn!(client_email = %key.client_email, error = %e, "private key unusable, signing custom tokens via IAM");
                let client = ClientBuilder::new(Client::new()).with(middleware.clone()).build();
                Arc::new(RemoteIamSigner::new(client, key.client_email.clone()))
            }
        }
    }

    fn from_parts(
        client: ClientWithMiddleware,
        urls: ResourceUrls,
        client_email: String,
        signer: Arc<dyn BlobSigner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let project_id = urls.project_id().to_string();

        Self {
            token_generator: CustomTokenGenerator::new(client_email, signer, clock.clone()),
            id_token_verifier: IdTokenVerifier::new(project_id.clone()).with_clock(clock.clone()),
            session_cookie_verifier: IdTokenVerifier::for_session_cookies(project_id).with_clock(clock.clone()),
            client: ApiClient::new(client, urls, clock),
        }
    }

    /// Creates a client whose API calls all go to `base_url`.
    #[cfg(test)]
    pub(crate) fn new_with_client(
        client: ClientWithMiddleware,
        config: &AuthConfig,
        base_url: &str,
        client_email: &str,
        signer: Arc<dyn BlobSigner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::from_parts(
            client,
            ResourceUrls::with_base(config, base_url),
            client_email.to_string(),
            signer,
            clock,
        )
    }

    #[cfg(test)]
    pub(crate) fn with_key_managers(
        mut self,
        id_tokens: crate::core::keys::PublicKeyManager,
        session_cookies: crate::core::keys::PublicKeyManager,
    ) -> Self {
        self.id_token_verifier = self.id_token_verifier.with_key_manager(id_tokens);
        self.session_cookie_verifier = self.session_cookie_verifier.with_key_manager(session_cookies);
        self
    }

    /// A client scoped to `tenant_id`: URLs, custom tokens and token
    /// verification all name the tenant.
    pub fn for_tenant(&self, tenant_id: &str) -> Self {
        let tenant = Some(tenant_id.to_string());

        Self {
            client: self.client.for_tenant(tenant_id),
            token_generator: self.token_generator.clone().with_tenant_id(tenant.clone()),
            id_token_verifier: self.id_token_verifier.clone().with_tenant_id(tenant.clone()),
            session_cookie_verifier: self.session_cookie_verifier.clone().with_tenant_id(tenant),
        }
    }

    pub fn project_id(&self) -> &str {
        self.client.urls().project_id()
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.client.urls().tenant_id()
    }

    // Users

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserRecord, AuthError> {
        let response = self.client.create_user(&request).await?;
        self.user_from_response(&response).await
    }

    pub async fn create_user_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        validate_email(email)?;
        validate_password(password)?;

        self.create_user(CreateUserRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            ..Default::default()
        })
        .await
    }

    pub async fn create_anonymous_user(&self) -> Result<UserRecord, AuthError> {
        self.create_user(CreateUserRequest::default()).await
    }

    pub async fn update_user(&self, request: UpdateUserRequest) -> Result<UserRecord, AuthError> {
        validate_uid(&request.local_id)?;

        let response = self.client.update_user(&request).await?;
        self.user_from_response(&response).await
    }

    pub async fn get_user(&self, uid: &str) -> Result<UserRecord, AuthError> {
        validate_uid(uid)?;

        let request = GetAccountInfoRequest {
            local_id: Some(vec![uid.to_string()]),
            ..Default::default()
        };
        self.get_account_info(request, uid).await
    }

    /// Looks up several users at once. Unknown uids map to `None`.
    pub async fn get_users(&self, uids: &[&str]) -> Result<HashMap<String, Option<UserRecord>>, AuthError> {
        for uid in uids {
            validate_uid(uid)?;
        }

        let mut users: HashMap<String, Option<UserRecord>> = uids.iter().map(|uid| (uid.to_string(), None)).collect();

        let request = GetAccountInfoRequest {
            local_id: Some(uids.iter().map(|uid| uid.to_string()).collect()),
            ..Default::default()
        };
        let response = self.client.get_account_info(&request).await?;

        for user in response.users.unwrap_or_default() {
            users.insert(user.local_id.clone(), Some(user));
        }

        Ok(users)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<UserRecord, AuthError> {
        validate_email(email)?;

        let request = GetAccountInfoRequest {
            email: Some(vec![email.to_string()]),
            ..Default::default()
        };
        self.get_account_info(request, email).await
    }

    pub async fn get_user_by_phone_number(&self, phone: &str) -> Result<UserRecord, AuthError> {
        let request = GetAccountInfoRequest {
            phone_number: Some(vec![phone.to_string()]),
            ..Default::default()
        };
        self.get_account_info(request, phone).await
    }

    async fn get_account_info(&self, request: GetAccountInfoRequest, identifier: &str) -> Result<UserRecord, AuthError> {
        let response = self.client.get_account_info(&request).await?;

        response
            .users
            .and_then(|mut users| users.pop())
            .ok_or_else(|| AuthError::user_not_found(identifier))
    }

    /// Fetches one page of users.
    pub async fn list_users(&self, max_results: u32, page_token: Option<&str>) -> Result<ListUsersResponse, AuthError> {
        self.client.download_account(max_results, page_token).await
    }

    pub async fn delete_user(&self, uid: &str) -> Result<(), AuthError> {
        validate_uid(uid)?;

        match self.client.delete_user(uid).await {
            Err(e) if e.kind() == Some(AuthErrorKind::UserNotFound) => Err(AuthError::user_not_found(uid)),
            Err(e) => Err(e),
            Ok(_) => Ok(()),
        }
    }

    /// Deletes up to 1000 users. Users that are still enabled are only
    /// deleted when `force_delete_enabled_users` is set; the others are
    /// reported in the result instead of failing the call.
    pub async fn delete_users(
        &self,
        uids: &[&str],
        force_delete_enabled_users: bool,
    ) -> Result<DeleteUsersResult, AuthError> {
        let request = DeleteUsersRequest::new(uids.iter().copied(), force_delete_enabled_users)?;
        let response = self.client.delete_users(&request).await?;

        Ok(DeleteUsersResult::from_request_and_response(&request, response))
    }

    /// Replaces the custom claims of a user. `None` removes all of them.
    pub async fn set_custom_user_claims(&self, uid: &str, claims: Option<Map<String, Value>>) -> Result<(), AuthError> {
        validate_uid(uid)?;

        self.client
            .set_custom_user_claims(uid, &claims.unwrap_or_default())
            .await?;
        Ok(())
    }

    pub async fn enable_user(&self, uid: &str) -> Result<UserRecord, AuthError> {
        self.update_user(UpdateUserRequest {
            disable_user: Some(false),
            ..UpdateUserRequest::new(uid)
        })
        .await
    }

    pub async fn disable_user(&self, uid: &str) -> Result<UserRecord, AuthError> {
        self.update_user(UpdateUserRequest {
            disable_user: Some(true),
            ..UpdateUserRequest::new(uid)
        })
        .await
    }

    pub async fn change_user_password(&self, uid: &str, new_password: &str) -> Result<UserRecord, AuthError> {
        validate_password(new_password)?;

        self.update_user(UpdateUserRequest {
            password: Some(new_password.to_string()),
            ..UpdateUserRequest::new(uid)
        })
        .await
    }

    pub async fn change_user_email(&self, uid: &str, new_email: &str) -> Result<UserRecord, AuthError> {
        validate_email(new_email)?;

        self.update_user(UpdateUserRequest {
            email: Some(new_email.to_string()),
            ..UpdateUserRequest::new(uid)
        })
        .await
    }

    pub async fn unlink_provider(&self, uid: &str, providers: &[&str]) -> Result<UserRecord, AuthError> {
        validate_uid(uid)?;

        let providers: Vec<String> = providers
            .iter()
            .filter(|provider| !provider.is_empty())
            .map(|provider| provider.to_string())
            .collect();

        let response = self.client.unlink_provider(uid, &providers).await?;
        self.user_from_response(&response).await
    }

    /// Invalidates every refresh token of the user, and with it every ID
    /// token and session cookie issued so far.
    pub async fn revoke_refresh_tokens(&self, uid: &str) -> Result<(), AuthError> {
        validate_uid(uid)?;

        self.client.revoke_refresh_tokens(uid).await?;
        Ok(())
    }

    async fn user_from_response(&self, response: &Value) -> Result<UserRecord, AuthError> {
        let uid = response
            .get("localId")
            .and_then(Value::as_str)
            .ok_or_else(|| AuthError::other("The response did not contain a user ID"))?;

        self.get_user(uid).await
    }

    // Tokens

    /// Creates a custom token for `uid` that is valid for `ttl_secs` seconds.
    pub async fn create_custom_token(
        &self,
        uid: &str,
        claims: Map<String, Value>,
        ttl_secs: i64,
    ) -> Result<CompactToken, AuthError> {
        self.token_generator
            .create_custom_token_with_ttl(uid, claims, ttl_secs)
            .await
    }

    /// Parses a token without verifying its signature or claims. The header
    /// and payload must both decode to JSON objects.
    pub fn parse_token(&self, token: &str) -> Result<CompactToken, AuthError> {
        let parsed = CompactToken::parse(token)
            .and_then(|parsed| {
                parsed.header()?;
                parsed.claims::<Map<String, Value>>()?;
                Ok(parsed)
            })
            .map_err(|e| AuthError::InvalidArgument(format!("The given token could not be parsed: {}", e)))?;

        Ok(parsed)
    }

    /// Verifies an ID token. With `check_revoked`, the user is looked up
    /// and tokens authenticated before the last revocation are rejected.
    pub async fn verify_id_token(
        &self,
        token: &str,
        check_revoked: bool,
        leeway_secs: Option<i64>,
    ) -> Result<FirebaseTokenClaims, AuthError> {
        let leeway = leeway_secs.unwrap_or(0);
        let claims = self
            .id_token_verifier
            .verify_token(token, leeway)
            .await
            .map_err(AuthError::FailedToVerifyToken)?;

        if check_revoked {
            let revoked = self
                .session_has_been_revoked(&claims, leeway)
                .await
                .map_err(AuthError::FailedToVerifyToken)?;
            if revoked {
                return Err(AuthError::RevokedIdToken);
            }
        }

        Ok(claims)
    }

    pub async fn verify_session_cookie(
        &self,
        session_cookie: &str,
        check_revoked: bool,
        leeway_secs: Option<i64>,
    ) -> Result<FirebaseTokenClaims, AuthError> {
        let leeway = leeway_secs.unwrap_or(0);
        let claims = self
            .session_cookie_verifier
            .verify_token(session_cookie, leeway)
            .await
            .map_err(AuthError::FailedToVerifySessionCookie)?;

        if check_revoked {
            let revoked = self
                .session_has_been_revoked(&claims, leeway)
                .await
                .map_err(AuthError::FailedToVerifySessionCookie)?;
            if revoked {
                return Err(AuthError::RevokedSessionCookie);
            }
        }

        Ok(claims)
    }

    async fn session_has_been_revoked(
        &self,
        claims: &FirebaseTokenClaims,
        leeway_secs: i64,
    ) -> Result<bool, TokenVerificationError> {
        let user = self
            .get_user(claims.uid())
            .await
            .map_err(|e| TokenVerificationError::UserLookupFailed(e.to_string()))?;

        // Users that never signed in have nothing to revoke.
        let Some(valid_since) = user.tokens_valid_after_time() else {
            return Ok(false);
        };

        Ok(claims.authenticated_at().saturating_sub(leeway_secs) < valid_since.timestamp())
    }

    /// Exchanges an ID token for a session cookie valid for `ttl_secs`
    /// seconds, between 5 minutes and 2 weeks.
    pub async fn create_session_cookie(&self, id_token: &str, ttl_secs: i64) -> Result<String, AuthError> {
        if !(MIN_SESSION_COOKIE_TTL..=MAX_SESSION_COOKIE_TTL).contains(&ttl_secs) {
            return Err(AuthError::InvalidArgument(format!(
                "The session cookie TTL must be between {} and {} seconds, {} given",
                MIN_SESSION_COOKIE_TTL, MAX_SESSION_COOKIE_TTL, ttl_secs
            )));
        }
        if id_token.trim().is_empty() {
            return Err(AuthError::InvalidArgument("The ID token must not be empty".to_string()));
        }

        self.client.create_session_cookie(id_token, ttl_secs).await
    }

    // Email actions

    pub async fn get_email_action_link(
        &self,
        kind: EmailActionType,
        email: &str,
        settings: Option<ActionCodeSettings>,
        locale: Option<&str>,
    ) -> Result<String, AuthError> {
        validate_email(email).map_err(|e| AuthError::FailedToCreateActionLink(e.to_string()))?;

        self.client
            .get_email_action_link(kind, email, settings.as_ref(), locale)
            .await
    }

    /// Lets Firebase send the email. Verification emails can only be sent
    /// on behalf of the user, so the user is signed in first.
    pub async fn send_email_action_link(
        &self,
        kind: EmailActionType,
        email: &str,
        settings: Option<ActionCodeSettings>,
        locale: Option<&str>,
    ) -> Result<(), AuthError> {
        validate_email(email).map_err(|e| AuthError::FailedToSendActionLink(e.to_string()))?;

        let id_token = match kind {
            EmailActionType::VerifyEmail => {
                let user = self
                    .get_user_by_email(email)
                    .await
                    .map_err(|e| AuthError::FailedToSendActionLink(e.to_string()))?;
                let result = self
                    .sign_in_as_user(&user.local_id, None)
                    .await
                    .map_err(|e| AuthError::FailedToSendActionLink(e.to_string()))?;

                Some(result.id_token.ok_or_else(|| {
                    AuthError::FailedToSendActionLink(format!(
                        "Unable to retrieve ID token for user assigned to email {}",
                        email
                    ))
                })?)
            }
            _ => None,
        };

        self.client
            .send_email_action_link(kind, email, settings.as_ref(), locale, id_token.as_deref())
            .await
    }

    pub async fn generate_email_verification_link(
        &self,
        email: &str,
        settings: Option<ActionCodeSettings>,
    ) -> Result<String, AuthError> {
        self.get_email_action_link(EmailActionType::VerifyEmail, email, settings, None)
            .await
    }

    pub async fn generate_password_reset_link(
        &self,
        email: &str,
        settings: Option<ActionCodeSettings>,
    ) -> Result<String, AuthError> {
        self.get_email_action_link(EmailActionType::PasswordReset, email, settings, None)
            .await
    }

    pub async fn generate_sign_in_with_email_link(
        &self,
        email: &str,
        settings: Option<ActionCodeSettings>,
    ) -> Result<String, AuthError> {
        self.get_email_action_link(EmailActionType::EmailSignIn, email, settings, None)
            .await
    }

    pub async fn send_email_verification_link(
        &self,
        email: &str,
        settings: Option<ActionCodeSettings>,
        locale: Option<&str>,
    ) -> Result<(), AuthError> {
        self.send_email_action_link(EmailActionType::VerifyEmail, email, settings, locale)
            .await
    }

    pub async fn send_password_reset_link(
        &self,
        email: &str,
        settings: Option<ActionCodeSettings>,
        locale: Option<&str>,
    ) -> Result<(), AuthError> {
        self.send_email_action_link(EmailActionType::PasswordReset, email, settings, locale)
            .await
    }

    pub async fn send_sign_in_with_email_link(
        &self,
        email: &str,
        settings: Option<ActionCodeSettings>,
        locale: Option<&str>,
    ) -> Result<(), AuthError> {
        self.send_email_action_link(EmailActionType::EmailSignIn, email, settings, locale)
            .await
    }

    /// Returns the email address the password reset code belongs to.
    pub async fn verify_password_reset_code(&self, oob_code: &str) -> Result<String, AuthError> {
        let response = self.client.verify_password_reset_code(oob_code).await?;
        email_from_response(&response)
    }

    /// Sets a new password with a reset code and returns the user's email.
    pub async fn confirm_password_reset(
        &self,
        oob_code: &str,
        new_password: &str,
        invalidate_previous_sessions: bool,
    ) -> Result<String, AuthError> {
        validate_password(new_password)?;

        let response = self.client.confirm_password_reset(oob_code, new_password).await?;
        let email = email_from_response(&response)?;

        if invalidate_previous_sessions {
            let user = self.get_user_by_email(&email).await?;
            self.revoke_refresh_tokens(&user.local_id).await?;
        }

        Ok(email)
    }

    // Sign-in

    /// Signs in as `uid` by minting and exchanging a custom token.
    pub async fn sign_in_as_user(
        &self,
        uid: &str,
        claims: Option<Map<String, Value>>,
    ) -> Result<SignInResult, AuthError> {
        let token = self
            .token_generator
            .create_custom_token(uid, claims.unwrap_or_default(), None)
            .await
            .map_err(|e| AuthError::FailedToSignIn(e.to_string()))?;

        self.sign_in_with_custom_token(token.as_str()).await
    }

    pub async fn sign_in_with_custom_token(&self, token: &str) -> Result<SignInResult, AuthError> {
        self.client.sign_in(&SignIn::CustomToken(token.to_string())).await
    }

    pub async fn sign_in_with_refresh_token(&self, refresh_token: &str) -> Result<SignInResult, AuthError> {
        self.client
            .sign_in(&SignIn::RefreshToken(refresh_token.to_string()))
            .await
    }

    pub async fn sign_in_with_email_and_password(&self, email: &str, password: &str) -> Result<SignInResult, AuthError> {
        validate_email(email)?;
        validate_password(password)?;

        self.client
            .sign_in(&SignIn::EmailAndPassword {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    pub async fn sign_in_with_email_and_oob_code(&self, email: &str, oob_code: &str) -> Result<SignInResult, AuthError> {
        validate_email(email)?;

        self.client
            .sign_in(&SignIn::EmailAndOobCode {
                email: email.to_string(),
                oob_code: oob_code.to_string(),
            })
            .await
    }

    /// Creates an anonymous user and signs in as it.
    pub async fn sign_in_anonymously(&self) -> Result<SignInResult, AuthError> {
        let result = self.client.sign_in(&SignIn::Anonymous).await?;

        if result.id_token.is_some() {
            return Ok(result);
        }

        match result.data.get("localId").and_then(Value::as_str) {
            Some(uid) => self.sign_in_as_user(uid, None).await,
            None => Err(AuthError::FailedToSignIn(
                "Failed to sign in anonymously: No ID token or UID available".to_string(),
            )),
        }
    }

    pub async fn sign_in_with_idp(&self, credentials: IdpCredentials) -> Result<SignInResult, AuthError> {
        self.client.sign_in(&SignIn::Idp(credentials)).await
    }

    pub async fn sign_in_with_idp_access_token(
        &self,
        provider: &str,
        access_token: &str,
    ) -> Result<SignInResult, AuthError> {
        self.sign_in_with_idp(IdpCredentials {
            provider: provider.to_string(),
            access_token: Some(access_token.to_string()),
            ..Default::default()
        })
        .await
    }

    pub async fn sign_in_with_idp_id_token(&self, provider: &str, id_token: &str) -> Result<SignInResult, AuthError> {
        self.sign_in_with_idp(IdpCredentials {
            provider: provider.to_string(),
            id_token: Some(id_token.to_string()),
            ..Default::default()
        })
        .await
    }
}

fn email_from_response(response: &Value) -> Result<String, AuthError> {
    response
        .get("email")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AuthError::other("The response did not contain an email address"))
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace),
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AuthError::InvalidArgument(format!("'{}' is not a valid email address", email)))
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::InvalidArgument(format!(
            "A password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(())
}
