//! Middleware for `axum::Router` and HTTP request processing.
//!
//! Applied from the outside in by the binary:
//!
//! 1. [`RouterRecoveryExt`] catches panics and enforces request timeouts
//! 2. [`RouterObservabilityExt`] assigns request ids and opens tracing spans
//! 3. [`RouterSecurityExt`] applies CORS, security headers and body limits
//!
//! [`require_authentication`] guards the private routes and
//! [`RouterOpenApiExt`] serves the generated OpenAPI document.
//!
//! ```rust,no_run
//! use axum::Router;
//! use secreto_server::middleware::{
//!     RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_default_security()
//!     .with_observability()
//!     .with_default_recovery();
//! ```

mod authentication;
mod observability;
mod recovery;
mod security;
mod specification;

pub use authentication::{RouterAuthExt, require_authentication};
pub use observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{
    CorsConfig, FrameOptions, ReferrerPolicy, RouterSecurityExt, SecurityHeadersConfig,
};
pub use specification::{BEARER_SCHEME, OpenApiConfig, RouterOpenApiExt};
