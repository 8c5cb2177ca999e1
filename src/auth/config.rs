/// Environment variable naming the host of a running Auth emulator.
pub const EMULATOR_HOST_ENV: &str = "FIREBASE_AUTH_EMULATOR_HOST";

/// Where the Auth emulator runs, if it is used at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthEmulatorConfig {
    pub host: Option<String>,
}

impl AuthEmulatorConfig {
    /// Reads [`EMULATOR_HOST_ENV`]. An empty value disables the emulator.
    pub fn from_env() -> Self {
        Self::from_host(std::env::var(EMULATOR_HOST_ENV).ok())
    }

    pub fn from_host(host: Option<String>) -> Self {
        Self {
            host: host.map(|h| h.trim().to_string()).filter(|h| !h.is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.host.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    pub project_id: String,
    pub tenant_id: Option<String>,
    pub emulator: AuthEmulatorConfig,
}

impl AuthConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Default::default()
        }
    }

    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_emulator(mut self, emulator: AuthEmulatorConfig) -> Self {
        self.emulator = emulator;
        self
    }
}
