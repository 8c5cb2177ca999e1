use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload of a custom token minted by this crate.
///
/// Reserved fields are typed; developer claims live under `claims` and may
/// never shadow a reserved name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTokenClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub claims: Map<String, Value>,
}

/// Verified claims of a Firebase ID token or session cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirebaseTokenClaims {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firebase: Option<Value>,
    /// Every other claim, including custom claims set on the user.
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl FirebaseTokenClaims {
    pub fn uid(&self) -> &str {
        &self.sub
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.firebase.as_ref()?.get("tenant")?.as_str()
    }

    pub fn sign_in_provider(&self) -> Option<&str> {
        self.firebase.as_ref()?.get("sign_in_provider")?.as_str()
    }

    /// `auth_time`, falling back to `iat` for tokens that lack it.
    pub fn authenticated_at(&self) -> i64 {
        self.auth_time.unwrap_or(self.iat)
    }
}
