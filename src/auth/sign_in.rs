//! Sign-in flows against the Identity Toolkit and Secure Token APIs.

use serde_json::{json, Map, Value};

use crate::auth::claims::FirebaseTokenClaims;
use crate::jwt::CompactToken;

/// A sign-in request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignIn {
    Anonymous,
    CustomToken(String),
    EmailAndPassword { email: String, password: String },
    EmailAndOobCode { email: String, oob_code: String },
    RefreshToken(String),
    Idp(IdpCredentials),
}

/// Credentials issued by a federated identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdpCredentials {
    pub provider: String,
    pub access_token: Option<String>,
    pub id_token: Option<String>,
    pub oauth_token_secret: Option<String>,
    pub raw_nonce: Option<String>,
    /// Defaults to `http://localhost`.
    pub request_uri: Option<String>,
    /// The ID token of an existing user to link the credentials to.
    pub linking_id_token: Option<String>,
}

impl SignIn {
    /// The Identity Toolkit endpoint, `None` for the Secure Token exchange.
    pub(crate) fn endpoint(&self) -> Option<&'static str> {
        match self {
            SignIn::Anonymous => Some("/accounts:signUp"),
            SignIn::CustomToken(_) => Some("/accounts:signInWithCustomToken"),
            SignIn::EmailAndPassword { .. } => Some("/accounts:signInWithPassword"),
            SignIn::EmailAndOobCode { .. } => Some("/accounts:signInWithEmailLink"),
            SignIn::Idp(_) => Some("/accounts:signInWithIdp"),
            SignIn::RefreshToken(_) => None,
        }
    }

    /// The JSON body, on top of the common fields.
    pub(crate) fn body(&self, project_id: &str, tenant_id: Option<&str>) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("returnSecureToken".into(), Value::Bool(true));
        body.insert("targetProjectId".into(), Value::from(project_id));
        if let Some(tenant_id) = tenant_id {
            body.insert("tenantId".into(), Value::from(tenant_id));
        }

        let fields = match self {
            SignIn::Anonymous | SignIn::RefreshToken(_) => json!({}),
            SignIn::CustomToken(token) => json!({ "token": token }),
            SignIn::EmailAndPassword { email, password } => json!({ "email": email, "password": password }),
            SignIn::EmailAndOobCode { email, oob_code } => json!({ "email": email, "oobCode": oob_code }),
            SignIn::Idp(credentials) => {
                let mut fields = json!({
                    "postBody": credentials.post_body(),
                    "returnIdpCredential": true,
                    "requestUri": credentials.request_uri.as_deref().unwrap_or("http://localhost"),
                });
                if let Some(id_token) = &credentials.linking_id_token {
                    fields["idToken"] = Value::from(id_token.clone());
                }
                fields
            }
        };

        if let Value::Object(fields) = fields {
            body.extend(fields);
        }

        body
    }
}

impl IdpCredentials {
    fn post_body(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());

        if let Some(access_token) = &self.access_token {
            serializer.append_pair("access_token", access_token);
        }
        if let Some(id_token) = &self.id_token {
            serializer.append_pair("id_token", id_token);
        }
        serializer.append_pair("providerId", &self.provider);
        if let Some(secret) = &self.oauth_token_secret {
            serializer.append_pair("oauth_token_secret", secret);
        }
        if let Some(nonce) = &self.raw_nonce {
            serializer.append_pair("nonce", nonce);
        }

        serializer.finish()
    }
}

/// The tokens returned by a successful sign-in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignInResult {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub ttl: Option<i64>,
    pub data: Map<String, Value>,
}

impl SignInResult {
    /// Reads a sign-in response. The Identity Toolkit answers in camelCase,
    /// the Secure Token API in snake_case.
    pub fn from_data(data: Map<String, Value>) -> Self {
        let field = |camel: &str, snake: &str| {
            data.get(camel)
                .or_else(|| data.get(snake))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let ttl = data
            .get("expiresIn")
            .or_else(|| data.get("expires_in"))
            .and_then(|value| match value {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            });

        Self {
            id_token: field("idToken", "id_token"),
            access_token: field("accessToken", "access_token"),
            refresh_token: field("refreshToken", "refresh_token"),
            ttl,
            data,
        }
    }

    /// Claims of the returned ID token, decoded without verifying the
    /// signature. The token comes straight from Google in the same exchange;
    /// verify it with [`FirebaseAuth::verify_id_token`](crate::auth::FirebaseAuth::verify_id_token)
    /// before handing it to anyone else.
    fn unverified_claims(&self) -> Option<FirebaseTokenClaims> {
        let token = CompactToken::parse(self.id_token.as_deref()?).ok()?;
        token.claims().ok()
    }

    /// The uid of the signed-in user.
    pub fn firebase_user_id(&self) -> Option<String> {
        if let Some(claims) = self.unverified_claims() {
            return Some(claims.user_id.unwrap_or(claims.sub));
        }

        self.data
            .get("localId")
            .or_else(|| self.data.get("user_id"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    pub fn firebase_tenant_id(&self) -> Option<String> {
        if let Some(tenant_id) = self.unverified_claims().and_then(|c| c.tenant_id().map(str::to_string)) {
            return Some(tenant_id);
        }

        self.data.get("tenantId").and_then(Value::as_str).map(str::to_string)
    }

    /// The result in OAuth 2.0 token response shape.
    pub fn as_token_response(&self) -> Value {
        json!({
            "token_type": "Bearer",
            "access_token": self.access_token,
            "id_token": self.id_token,
            "refresh_token": self.refresh_token,
            "expires_in": self.ttl,
        })
    }
}
