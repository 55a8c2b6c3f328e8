//! Failures of the credential and session guard.

use secreto_postgres::PgError;

/// Result type for guard operations.
pub type GuardResult<T, E = GuardError> = std::result::Result<T, E>;

/// Reason a guard operation did not succeed.
///
/// The first four variants are rejections of the caller and must reach the
/// client as the same generic `401`. The remaining variants are server-side
/// failures: lookups map like any database error, the rest surface as `500`.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// Unknown username or wrong password.
    #[error("incorrect username or password")]
    InvalidCredentials,
    /// Signature, structure, issuer or audience did not verify.
    #[error("token signature or structure is invalid")]
    InvalidToken,
    /// Token verified but its expiry has passed.
    #[error("token has expired")]
    ExpiredToken,
    /// Token verified but no user exists for its subject.
    #[error("token subject does not exist")]
    UnknownSubject,

    /// The user lookup collaborator failed.
    #[error("identity lookup failed: {0}")]
    Lookup(#[from] PgError),
    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
    /// Token signing failed.
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    /// Token lifetime does not fit in the supported time range.
    #[error("token lifetime out of range: {0}")]
    Lifetime(#[source] jiff::Error),
}

impl GuardError {
    /// Returns whether the error rejects the caller rather than signalling a
    /// server-side failure.
    #[inline]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::InvalidToken | Self::ExpiredToken | Self::UnknownSubject
        )
    }

    /// Returns a stable identifier for logs.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidToken => "invalid_token",
            Self::ExpiredToken => "expired_token",
            Self::UnknownSubject => "unknown_subject",
            Self::Lookup(_) => "lookup_failed",
            Self::Hashing(_) => "hashing_failed",
            Self::Signing(_) => "signing_failed",
            Self::Lifetime(_) => "lifetime_out_of_range",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_classified() {
        assert!(GuardError::InvalidCredentials.is_rejection());
        assert!(GuardError::InvalidToken.is_rejection());
        assert!(GuardError::ExpiredToken.is_rejection());
        assert!(GuardError::UnknownSubject.is_rejection());
        assert!(!GuardError::Hashing("salt".into()).is_rejection());
        assert!(!GuardError::Lookup(PgError::Config("url".into())).is_rejection());
    }

    #[test]
    fn reasons_are_distinct() {
        let reasons = [
            GuardError::InvalidCredentials.reason(),
            GuardError::InvalidToken.reason(),
            GuardError::ExpiredToken.reason(),
            GuardError::UnknownSubject.reason(),
        ];

        for (i, reason) in reasons.iter().enumerate() {
            assert!(!reasons[i + 1..].contains(reason));
        }
    }
}
