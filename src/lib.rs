//! Server-side Firebase Authentication and App Check.
//!
//! ```no_run
//! # async fn run(key: yup_oauth2::ServiceAccountKey) -> Result<(), Box<dyn std::error::Error>> {
//! use firebase_auth_admin::FirebaseApp;
//!
//! let app = FirebaseApp::new(key);
//! let auth = app.auth();
//!
//! let token = auth.create_custom_token("alice", Default::default(), 3600).await?;
//! let claims = auth.verify_id_token("<id token>", true, None).await?;
//! # let _ = (token, claims);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "app_check")]
pub mod app_check;
#[cfg(feature = "auth")]
pub mod auth;
pub mod core;
pub mod errors;
pub mod jwt;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use yup_oauth2::ServiceAccountKey;

#[cfg(feature = "app_check")]
use crate::app_check::{AppCheckError, FirebaseAppCheck};
#[cfg(feature = "auth")]
use crate::auth::{AuthConfig, AuthEmulatorConfig, FirebaseAuth};
use crate::core::clock::{Clock, SystemClock};
use crate::core::middleware::AuthMiddleware;

/// Entry point holding the service account credentials.
pub struct FirebaseApp {
    key: ServiceAccountKey,
    #[cfg(feature = "auth")]
    emulator: AuthEmulatorConfig,
    clock: Arc<dyn Clock>,
}

impl FirebaseApp {
    /// The Auth emulator is picked up from `FIREBASE_AUTH_EMULATOR_HOST`.
    pub fn new(service_account_key: ServiceAccountKey) -> Self {
        Self {
            key: service_account_key,
            #[cfg(feature = "auth")]
            emulator: AuthEmulatorConfig::from_env(),
            clock: Arc::new(SystemClock),
        }
    }

    #[cfg(feature = "auth")]
    pub fn with_auth_emulator(mut self, emulator: AuthEmulatorConfig) -> Self {
        self.emulator = emulator;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[cfg(feature = "auth")]
    pub fn auth(&self) -> FirebaseAuth {
        let middleware = AuthMiddleware::new(self.key.clone());
        let config = AuthConfig::new(middleware.project_id()).with_emulator(self.emulator.clone());

        FirebaseAuth::new(middleware, config, self.clock.clone())
    }

    #[cfg(feature = "app_check")]
    pub fn app_check(&self) -> Result<FirebaseAppCheck, AppCheckError> {
        FirebaseAppCheck::new(AuthMiddleware::new(self.key.clone()), self.clock.clone())
    }
}
