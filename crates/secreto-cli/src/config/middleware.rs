//! HTTP middleware settings: browser origins, API reference paths and the
//! per-request deadline.

use anyhow::{Result as AnyhowResult, bail};
use clap::Args;
use secreto_server::middleware::{CorsConfig, OpenApiConfig, RecoveryConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Longest request deadline accepted, in seconds.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Origins allowed to call the API from a browser.
    #[clap(flatten)]
    pub cors: CorsConfig,

    #[clap(flatten)]
    pub openapi: OpenApiConfig,

    /// Request deadline and panic recovery.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Rejects settings the server could not honour.
    ///
    /// # Errors
    ///
    /// Fails when the request timeout is outside 1-300 seconds, when the
    /// reference paths are not absolute or collide, or when a configured
    /// origin is not an http(s) origin.
    pub fn validate(&self) -> AnyhowResult<()> {
        let timeout = self.recovery.request_timeout_secs;
        if timeout == 0 || timeout > MAX_REQUEST_TIMEOUT_SECS {
            bail!("Request timeout {timeout}s must be between 1 and {MAX_REQUEST_TIMEOUT_SECS}s");
        }

        let OpenApiConfig {
            open_api_json,
            scalar_ui,
        } = &self.openapi;
        if !open_api_json.starts_with('/') || !scalar_ui.starts_with('/') {
            bail!("OpenAPI paths must start with '/'");
        }
        if open_api_json == scalar_ui {
            bail!("OpenAPI document and Scalar page cannot share {open_api_json}");
        }

        if let Some(origin) = self
            .cors
            .allowed_origins
            .iter()
            .find(|origin| !origin.starts_with("http://") && !origin.starts_with("https://"))
        {
            bail!("CORS origin '{origin}' must start with http:// or https://");
        }

        Ok(())
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            cors_origins = ?self.cors.allowed_origins,
            cors_credentials = self.cors.allow_credentials,
            openapi_path = %self.openapi.open_api_json,
            scalar_path = %self.openapi.scalar_ui,
            request_timeout_secs = self.recovery.request_timeout_secs,
            "Middleware configuration"
        );
    }
}
