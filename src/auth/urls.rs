use crate::auth::config::AuthConfig;

const IDENTITY_TOOLKIT_BASE: &str = "https://identitytoolkit.googleapis.com";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";

/// Builds Identity Toolkit URLs for a project and an optional tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUrls {
    base: String,
    project_id: String,
    tenant_id: Option<String>,
    secure_token_url: String,
}

impl ResourceUrls {
    pub fn new(config: &AuthConfig) -> Self {
        let (base, secure_token_url) = match &config.emulator.host {
            Some(host) => (
                format!("http://{}/identitytoolkit.googleapis.com", host),
                format!("http://{}/securetoken.googleapis.com/v1/token?key=any", host),
            ),
            None => (IDENTITY_TOOLKIT_BASE.to_string(), SECURE_TOKEN_URL.to_string()),
        };

        Self {
            base,
            project_id: config.project_id.clone(),
            tenant_id: config.tenant_id.clone(),
            secure_token_url,
        }
    }

    /// Points every URL at `base`, e.g. a mock server.
    pub(crate) fn with_base(config: &AuthConfig, base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();

        Self {
            secure_token_url: format!("{}/v1/token", base),
            base,
            project_id: config.project_id.clone(),
            tenant_id: config.tenant_id.clone(),
        }
    }

    pub(crate) fn for_tenant(&self, tenant_id: &str) -> Self {
        Self {
            tenant_id: Some(tenant_id.to_string()),
            ..self.clone()
        }
    }

    /// `{base}/v1{api}`, for endpoints that take the project in the body.
    pub fn global(&self, api: &str) -> String {
        format!("{}/v1{}", self.base, api)
    }

    /// `{base}/v1/projects/{project}[/tenants/{tenant}]{api}`
    pub fn scoped(&self, api: &str) -> String {
        match &self.tenant_id {
            Some(tenant_id) => format!(
                "{}/v1/projects/{}/tenants/{}{}",
                self.base, self.project_id, tenant_id, api
            ),
            None => format!("{}/v1/projects/{}{}", self.base, self.project_id, api),
        }
    }

    pub fn secure_token(&self) -> &str {
        &self.secure_token_url
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }
}
