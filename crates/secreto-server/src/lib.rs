#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::error::{BoxedError, Error, ErrorKind, Result};

/// Tracing target for request authentication.
pub const TRACING_TARGET_AUTHENTICATION: &str = "secreto_server::authentication";

/// Tracing target for the credential and session guard.
pub const TRACING_TARGET_GUARD: &str = "secreto_server::service::guard";
