//! Request extractors with structured rejections.
//!
//! Every extractor here rejects with [`handler::Error`], so malformed input
//! produces the same JSON error body as a failing handler.
//!
//! ## Authentication
//!
//! - [`AuthHeader`] - Bearer token taken from the `Authorization` header
//! - [`AuthState`] - Identity resolved from that token by the credential guard
//!
//! ## Request data
//!
//! - [`Json`] - JSON body with sanitized rejection messages
//! - [`ValidateJson`] - JSON body followed by `validator` checks
//! - [`Form`] - URL-encoded or multipart form fields
//! - [`ValidateForm`] - Form (or JSON) body followed by `validator` checks
//! - [`Path`] - Path parameters with type hints on failure
//! - [`Query`] - Query string with per-field failure messages
//!
//! ## Database
//!
//! - [`PgPool`] - Pooled Postgres connection
//!
//! [`handler::Error`]: crate::handler::Error

pub mod auth;
mod pg_connection;
pub mod reject;

pub use crate::extract::auth::{AuthHeader, AuthState};
pub use crate::extract::pg_connection::PgPool;
pub use crate::extract::reject::{Form, Json, Path, Query, ValidateForm, ValidateJson};
