use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::auth::error::{AuthApiExceptionConverter, AuthError};
use crate::auth::models::{
    ActionCodeSettings, BatchDeleteResponse, CreateUserRequest, DeleteAccountRequest, DeleteUsersRequest,
    EmailActionType, EmailLinkResponse, GetAccountInfoRequest, GetAccountInfoResponse, ListUsersResponse,
    UpdateUserRequest,
};
use crate::auth::sign_in::{SignIn, SignInResult};
use crate::auth::urls::ResourceUrls;
use crate::core::clock::Clock;
use crate::core::{self, ApiFailure};
use crate::errors::ExceptionConverter;

const LOCALE_HEADER: &str = "X-Firebase-Locale";

/// Raw Identity Toolkit calls. Every failure leaves this type converted.
#[derive(Clone)]
pub(crate) struct ApiClient {
    client: ClientWithMiddleware,
    urls: ResourceUrls,
    clock: Arc<dyn Clock>,
}

impl ApiClient {
    pub(crate) fn new(client: ClientWithMiddleware, urls: ResourceUrls, clock: Arc<dyn Clock>) -> Self {
        Self { client, urls, clock }
    }

    pub(crate) fn urls(&self) -> &ResourceUrls {
        &self.urls
    }

    pub(crate) fn for_tenant(&self, tenant_id: &str) -> Self {
        Self {
            urls: self.urls.for_tenant(tenant_id),
            ..self.clone()
        }
    }

    pub(crate) async fn create_user(&self, request: &CreateUserRequest) -> Result<Value, AuthError> {
        self.request_api(&self.urls.scoped("/accounts"), to_map(request)?).await
    }

    pub(crate) async fn update_user(&self, request: &UpdateUserRequest) -> Result<Value, AuthError> {
        self.request_api(&self.urls.scoped("/accounts:update"), to_map(request)?)
            .await
    }

    pub(crate) async fn set_custom_user_claims(
        &self,
        uid: &str,
        claims: &Map<String, Value>,
    ) -> Result<Value, AuthError> {
        let data = json!({
            "localId": uid,
            "customAttributes": serde_json::to_string(claims)?,
        });

        self.request_api(&self.urls.scoped("/accounts:update"), to_map(&data)?)
            .await
    }

    pub(crate) async fn get_account_info(
        &self,
        request: &GetAccountInfoRequest,
    ) -> Result<GetAccountInfoResponse, AuthError> {
        let data = self
            .request_api(&self.urls.scoped("/accounts:lookup"), to_map(request)?)
            .await?;

        Ok(serde_json::from_value(data)?)
    }

    pub(crate) async fn download_account(
        &self,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<ListUsersResponse, AuthError> {
        let mut url = Url::parse(&self.urls.scoped("/accounts:batchGet"))
            .map_err(|e| AuthError::InvalidArgument(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("maxResults", &max_results.to_string());
            if let Some(token) = page_token.filter(|t| !t.is_empty()) {
                query.append_pair("nextPageToken", token);
            }
        }

        let data = self.request_api(url.as_str(), Map::new()).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub(crate) async fn delete_user(&self, uid: &str) -> Result<Value, AuthError> {
        let request = DeleteAccountRequest {
            local_id: uid.to_string(),
        };

        self.request_api(&self.urls.scoped("/accounts:delete"), to_map(&request)?)
            .await
    }

    pub(crate) async fn delete_users(&self, request: &DeleteUsersRequest) -> Result<BatchDeleteResponse, AuthError> {
        let data = self
            .request_api(&self.urls.scoped("/accounts:batchDelete"), to_map(request)?)
            .await?;

        Ok(serde_json::from_value(data)?)
    }

    pub(crate) async fn verify_password_reset_code(&self, oob_code: &str) -> Result<Value, AuthError> {
        let data = json!({ "oobCode": oob_code });

        self.request_api(&self.urls.global("/accounts:resetPassword"), to_map(&data)?)
            .await
    }

    pub(crate) async fn confirm_password_reset(&self, oob_code: &str, new_password: &str) -> Result<Value, AuthError> {
        let data = json!({ "oobCode": oob_code, "newPassword": new_password });

        self.request_api(&self.urls.global("/accounts:resetPassword"), to_map(&data)?)
            .await
    }

    pub(crate) async fn revoke_refresh_tokens(&self, uid: &str) -> Result<Value, AuthError> {
        let data = json!({
            "localId": uid,
            "validSince": self.clock.now().timestamp().to_string(),
        });

        self.request_api(&self.urls.scoped("/accounts:update"), to_map(&data)?)
            .await
    }

    pub(crate) async fn unlink_provider(&self, uid: &str, providers: &[String]) -> Result<Value, AuthError> {
        let data = json!({ "localId": uid, "deleteProvider": providers });

        self.request_api(&self.urls.scoped("/accounts:update"), to_map(&data)?)
            .await
    }

    pub(crate) async fn create_session_cookie(&self, id_token: &str, ttl_secs: i64) -> Result<String, AuthError> {
        let request = self
            .client
            .post(self.urls.scoped(":createSessionCookie"))
            .json(&json!({ "idToken": id_token, "validDuration": ttl_secs }));

        let data: Value = core::send_json(request)
            .await
            .map_err(|failure| AuthError::FailedToCreateSessionCookie(failure.to_string()))?;

        data.get("sessionCookie")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                AuthError::FailedToCreateSessionCookie("The response did not contain a session cookie".to_string())
            })
    }

    pub(crate) async fn get_email_action_link(
        &self,
        kind: EmailActionType,
        email: &str,
        settings: Option<&ActionCodeSettings>,
        locale: Option<&str>,
    ) -> Result<String, AuthError> {
        let mut data = action_link_fields(kind, email, settings);
        data.insert("returnOobLink".into(), Value::Bool(true));

        let mut request = self.client.post(self.urls.scoped("/accounts:sendOobCode")).json(&data);
        if let Some(locale) = locale {
            request = request.header(LOCALE_HEADER, locale);
        }

        let response: EmailLinkResponse = core::send_json(request)
            .await
            .map_err(|failure| AuthError::FailedToCreateActionLink(failure.to_string()))?;

        response
            .oob_link
            .filter(|link| !link.is_empty())
            .ok_or_else(|| AuthError::FailedToCreateActionLink("The response did not contain an action link".to_string()))
    }

    pub(crate) async fn send_email_action_link(
        &self,
        kind: EmailActionType,
        email: &str,
        settings: Option<&ActionCodeSettings>,
        locale: Option<&str>,
        id_token: Option<&str>,
    ) -> Result<(), AuthError> {
        let mut data = action_link_fields(kind, email, settings);
        if let Some(tenant_id) = self.urls.tenant_id() {
            data.insert("tenantId".into(), Value::from(tenant_id));
        }
        if let Some(id_token) = id_token {
            data.insert("idToken".into(), Value::from(id_token));
        }

        let mut request = self.client.post(self.urls.scoped("/accounts:sendOobCode")).json(&data);
        if let Some(locale) = locale {
            request = request.header(LOCALE_HEADER, locale);
        }

        core::send(request)
            .await
            .map_err(|failure| AuthError::FailedToSendActionLink(failure.to_string()))?;

        Ok(())
    }

    pub(crate) async fn sign_in(&self, action: &SignIn) -> Result<SignInResult, AuthError> {
        let request = match (action, action.endpoint()) {
            (SignIn::RefreshToken(refresh_token), _) => {
                let body = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("grant_type", "refresh_token")
                    .append_pair("refresh_token", refresh_token)
                    .finish();

                self.client
                    .post(self.urls.secure_token())
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .header(header::ACCEPT, "application/json")
                    .body(body)
            }
            (_, Some(endpoint)) => self
                .client
                .post(self.urls.global(endpoint))
                .json(&action.body(self.urls.project_id(), self.urls.tenant_id())),
            (_, None) => return Err(AuthError::FailedToSignIn("Unsupported sign-in method".to_string())),
        };

        let data: Map<String, Value> = core::send_json(request)
            .await
            .map_err(|failure| AuthError::FailedToSignIn(failure.to_string()))?;

        Ok(SignInResult::from_data(data))
    }

    /// Sends `data` to `url`, as a POST when there is a body and a GET
    /// otherwise. The project and tenant are added to the body unless the URL
    /// already names them.
    async fn request_api(&self, url: &str, mut data: Map<String, Value>) -> Result<Value, AuthError> {
        if !url.contains("projects") {
            data.insert("targetProjectId".into(), Value::from(self.urls.project_id()));
        }
        if let Some(tenant_id) = self.urls.tenant_id() {
            if !url.contains("tenants") {
                data.insert("tenantId".into(), Value::from(tenant_id));
            }
        }

        let request = if data.is_empty() {
            self.client.get(url)
        } else {
            self.client.post(url).json(&data)
        };

        core::send_json(request).await.map_err(convert)
    }
}

fn convert(failure: ApiFailure) -> AuthError {
    let error = AuthApiExceptionConverter.convert(failure);
    debug!(kind = ?error.kind(), status = ?error.status(), "Identity Toolkit request failed");
    error
}

fn to_map<T: Serialize>(value: &T) -> Result<Map<String, Value>, AuthError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

fn action_link_fields(kind: EmailActionType, email: &str, settings: Option<&ActionCodeSettings>) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("requestType".into(), Value::from(kind.as_str()));
    data.insert("email".into(), Value::from(email));
    if let Some(settings) = settings {
        data.extend(settings.to_fields());
    }
    data
}
