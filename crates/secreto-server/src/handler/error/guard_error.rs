//! Guard error to HTTP error conversion.
//!
//! Every rejection of the caller becomes the same `401`; only the login
//! check gets its own message. Lookup failures map like any other database
//! error; the remaining guard failures become `500`.

use crate::handler::{Error, ErrorKind};
use crate::service::GuardError;

/// Tracing target for guard error conversion.
const TRACING_TARGET: &str = "secreto_server::guard_errors";

impl From<GuardError> for Error<'static> {
    fn from(error: GuardError) -> Self {
        match error {
            GuardError::InvalidCredentials => ErrorKind::Unauthorized
                .with_message("Incorrect username or password"),
            GuardError::InvalidToken | GuardError::ExpiredToken | GuardError::UnknownSubject => {
                ErrorKind::Unauthorized.into_error()
            }
            GuardError::Lookup(pg_error) => pg_error.into(),
            other => {
                tracing::error!(
                    target: TRACING_TARGET,
                    reason = other.reason(),
                    error = %other,
                    "credential guard failure"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}
