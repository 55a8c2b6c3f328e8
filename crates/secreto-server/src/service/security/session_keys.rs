//! Signing keys for stateless session tokens.
//!
//! Tokens are signed with a server-held HMAC secret. The secret is read once
//! at startup and shared read-only for the lifetime of the process.

use std::fmt;
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jiff::SignedDuration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result, TRACING_TARGET_GUARD};

/// Minimum length of the signing secret in bytes.
const MIN_SECRET_LEN: usize = 32;

/// Bounds of the token lifetime in minutes.
const MIN_TOKEN_TTL_MINS: u32 = 1;
const MAX_TOKEN_TTL_MINS: u32 = 1440;

/// HMAC algorithm used to sign session tokens.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SigningAlgorithm {
    /// HMAC using SHA-256.
    #[default]
    HS256,
    /// HMAC using SHA-384.
    HS384,
    /// HMAC using SHA-512.
    HS512,
}

impl SigningAlgorithm {
    /// Returns the matching [`jsonwebtoken`] algorithm.
    #[inline]
    pub const fn as_jwt_algorithm(self) -> Algorithm {
        match self {
            Self::HS256 => Algorithm::HS256,
            Self::HS384 => Algorithm::HS384,
            Self::HS512 => Algorithm::HS512,
        }
    }
}

/// Session token signing configuration.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct SessionKeysConfig {
    /// Secret used to sign and verify session tokens (at least 32 bytes).
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_SECRET", hide_env_values = true)
    )]
    pub auth_secret: String,

    /// HMAC algorithm for session tokens.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_ALGORITHM", default_value = "HS256")
    )]
    #[serde(default)]
    pub auth_algorithm: SigningAlgorithm,

    /// Lifetime of a session token in minutes (1-1440).
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_TOKEN_TTL_MINS", default_value = "30")
    )]
    #[serde(default = "SessionKeysConfig::default_token_ttl_mins")]
    pub auth_token_ttl_mins: u32,
}

impl SessionKeysConfig {
    /// Creates a configuration with the given secret and default settings.
    pub fn new(auth_secret: impl Into<String>) -> Self {
        Self {
            auth_secret: auth_secret.into(),
            auth_algorithm: SigningAlgorithm::default(),
            auth_token_ttl_mins: Self::default_token_ttl_mins(),
        }
    }

    fn default_token_ttl_mins() -> u32 {
        30
    }

    /// Sets the signing algorithm.
    pub fn with_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.auth_algorithm = algorithm;
        self
    }

    /// Sets the token lifetime in minutes.
    pub fn with_token_ttl_mins(mut self, mins: u32) -> Self {
        self.auth_token_ttl_mins = mins;
        self
    }

    /// Returns the token lifetime.
    #[inline]
    pub fn token_ttl(&self) -> SignedDuration {
        SignedDuration::from_mins(i64::from(self.auth_token_ttl_mins))
    }

    /// Validates the secret length and token lifetime.
    pub fn validate(&self) -> Result<()> {
        if self.auth_secret.len() < MIN_SECRET_LEN {
            return Err(Error::config(format!(
                "Auth secret must be at least {MIN_SECRET_LEN} bytes long"
            )));
        }

        if !(MIN_TOKEN_TTL_MINS..=MAX_TOKEN_TTL_MINS).contains(&self.auth_token_ttl_mins) {
            return Err(Error::config(format!(
                "Auth token lifetime must be between {MIN_TOKEN_TTL_MINS} and {MAX_TOKEN_TTL_MINS} minutes"
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for SessionKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeysConfig")
            .field("auth_secret", &"[REDACTED]")
            .field("auth_algorithm", &self.auth_algorithm)
            .field("auth_token_ttl_mins", &self.auth_token_ttl_mins)
            .finish()
    }
}

/// Keys used to sign and verify session tokens.
///
/// Cloning is cheap; all clones share the same keys.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    config: SessionKeysConfig,
}

impl SessionKeys {
    /// Creates the keys from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the secret is too short or the token
    /// lifetime is out of range.
    pub fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        config.validate()?;

        let secret = config.auth_secret.as_bytes();
        let inner = Arc::new(SessionKeysInner {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            config: config.clone(),
        });

        tracing::info!(
            target: TRACING_TARGET_GUARD,
            algorithm = %config.auth_algorithm,
            token_ttl_mins = config.auth_token_ttl_mins,
            "Session keys loaded",
        );

        Ok(Self { inner })
    }

    /// Returns the key used to verify tokens.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns the key used to sign tokens.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Returns the signing algorithm.
    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.inner.config.auth_algorithm.as_jwt_algorithm()
    }

    /// Returns the lifetime of newly issued tokens.
    #[inline]
    pub fn token_ttl(&self) -> SignedDuration {
        self.inner.config.token_ttl()
    }

    /// Returns the configuration these keys were created from.
    #[inline]
    pub fn config(&self) -> &SessionKeysConfig {
        &self.inner.config
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
