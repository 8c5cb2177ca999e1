use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::error::AuthError;

/// Maximum number of users that can be deleted in one batch.
pub const MAX_DELETE_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    pub local_id: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub phone_number: Option<String>,
    pub disabled: bool,
    pub provider_user_info: Option<Vec<ProviderUserInfo>>,
    pub password_hash: Option<String>,
    #[serde(rename = "salt")]
    pub password_salt: Option<String>,
    pub custom_attributes: Option<String>, // JSON string for custom claims
    pub tenant_id: Option<String>,
    pub mfa_info: Option<Vec<MfaInfo>>,
    /// Seconds since the epoch, as a string. Tokens authenticated before are revoked.
    pub valid_since: Option<String>,
    /// Milliseconds since the epoch, as a string.
    pub created_at: Option<String>,
    pub last_login_at: Option<String>,
    pub password_updated_at: Option<f64>,
    pub last_refresh_at: Option<String>,
}

impl UserRecord {
    pub fn uid(&self) -> &str {
        &self.local_id
    }

    /// Instant before which ID tokens and session cookies of this user count
    /// as revoked.
    pub fn tokens_valid_after_time(&self) -> Option<DateTime<Utc>> {
        let seconds = self.valid_since.as_deref()?.parse::<i64>().ok()?;
        DateTime::from_timestamp(seconds, 0)
    }

    pub fn custom_claims(&self) -> Map<String, Value> {
        self.custom_attributes
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        millis(self.created_at.as_deref())
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        millis(self.last_login_at.as_deref())
    }
}

fn millis(value: Option<&str>) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value?.parse::<i64>().ok()?)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderUserInfo {
    pub provider_id: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub federated_id: Option<String>,
    pub email: Option<String>,
    pub raw_id: Option<String>,
    pub screen_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MfaInfo {
    pub mfa_enrollment_id: Option<String>,
    pub display_name: Option<String>,
    pub phone_info: Option<String>,
    pub enrolled_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub local_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_user: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_attribute: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_provider: Option<Vec<String>>,
}

impl UpdateUserRequest {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            local_id: uid.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersResponse {
    pub users: Option<Vec<UserRecord>>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountInfoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountInfoResponse {
    pub users: Option<Vec<UserRecord>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountRequest {
    pub local_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IosSettings {
    pub bundle_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AndroidSettings {
    pub package_name: String,
    pub install_app: Option<bool>,
    pub minimum_version: Option<String>,
}

/// Where and how an email action link should continue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionCodeSettings {
    pub url: String,
    pub handle_code_in_app: Option<bool>,
    pub ios: Option<IosSettings>,
    pub android: Option<AndroidSettings>,
    pub dynamic_link_domain: Option<String>,
}

impl ActionCodeSettings {
    /// The request fields for these settings. Unset values are omitted.
    pub(crate) fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();

        if !self.url.is_empty() {
            fields.insert("continueUrl".into(), Value::from(self.url.clone()));
        }
        if let Some(handle) = self.handle_code_in_app {
            fields.insert("canHandleCodeInApp".into(), Value::from(handle));
        }
        if let Some(domain) = &self.dynamic_link_domain {
            fields.insert("dynamicLinkDomain".into(), Value::from(domain.clone()));
        }
        if let Some(ios) = &self.ios {
            fields.insert("iOSBundleId".into(), Value::from(ios.bundle_id.clone()));
        }
        if let Some(android) = &self.android {
            fields.insert("androidPackageName".into(), Value::from(android.package_name.clone()));
            if let Some(install) = android.install_app {
                fields.insert("androidInstallApp".into(), Value::from(install));
            }
            if let Some(version) = &android.minimum_version {
                fields.insert("androidMinimumVersion".into(), Value::from(version.clone()));
            }
        }

        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailActionType {
    VerifyEmail,
    PasswordReset,
    EmailSignIn,
}

impl EmailActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailActionType::VerifyEmail => "VERIFY_EMAIL",
            EmailActionType::PasswordReset => "PASSWORD_RESET",
            EmailActionType::EmailSignIn => "EMAIL_SIGNIN",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailLinkResponse {
    pub email: Option<String>,
    pub oob_link: Option<String>,
}

/// A validated batch of users to delete.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUsersRequest {
    local_ids: Vec<String>,
    force: bool,
}

impl DeleteUsersRequest {
    pub fn new<I, S>(uids: I, force_delete_enabled_users: bool) -> Result<Self, AuthError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut local_ids = Vec::new();

        for uid in uids {
            let uid = uid.into();
            crate::auth::custom_token::validate_uid(&uid)?;
            local_ids.push(uid);

            if local_ids.len() > MAX_DELETE_BATCH_SIZE {
                return Err(AuthError::InvalidArgument(format!(
                    "Only {} users can be deleted at a time",
                    MAX_DELETE_BATCH_SIZE
                )));
            }
        }

        Ok(Self {
            local_ids,
            force: force_delete_enabled_users,
        })
    }

    pub fn uids(&self) -> &[String] {
        &self.local_ids
    }

    pub fn force_delete_enabled_users(&self) -> bool {
        self.force
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BatchDeleteResponse {
    #[serde(default)]
    pub errors: Vec<DeleteUserError>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserError {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub local_id: String,
    #[serde(default)]
    pub message: String,
}

/// Outcome of a batch deletion. Failures are reported per user instead of
/// failing the whole call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteUsersResult {
    pub success_count: usize,
    pub failure_count: usize,
    pub raw_errors: Vec<DeleteUserError>,
}

impl DeleteUsersResult {
    pub(crate) fn from_request_and_response(request: &DeleteUsersRequest, response: BatchDeleteResponse) -> Self {
        let failure_count = response.errors.len();

        Self {
            success_count: request.uids().len().saturating_sub(failure_count),
            failure_count,
            raw_errors: response.errors,
        }
    }
}
