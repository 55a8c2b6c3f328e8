//! Application state and dependency injection.

mod config;
mod guard;
mod security;

use secreto_postgres::PgClient;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::guard::{
    AuthClaims, CredentialGuard, GuardError, GuardResult, Identity, IdentityStore,
};
pub use crate::service::security::{
    Clock, FixedClock, PasswordHasher, SessionKeys, SessionKeysConfig, SigningAlgorithm,
    SystemClock,
};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    // External services:
    pub postgres: PgClient,

    // Internal services:
    pub guard: CredentialGuard,
}

impl ServiceState {
    /// Creates the state from already constructed services.
    pub fn new(postgres: PgClient, guard: CredentialGuard) -> Self {
        Self { postgres, guard }
    }

    /// Initializes application state from configuration.
    ///
    /// Connects to Postgres, applies migrations and loads the signing keys.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let service_state = Self {
            guard: config.create_guard()?,
            postgres: config.connect_postgres().await?,
        };

        Ok(service_state)
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(postgres: PgClient);

// Internal services:
impl_di!(guard: CredentialGuard);
