//! Authenticated identity extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;
use secreto_postgres::PgClient;

use super::AuthHeader;
use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::Error;
use crate::service::{CredentialGuard, Identity};

/// Identity of the caller, resolved by the [`CredentialGuard`].
///
/// Extraction takes the bearer token from the request and resolves it against
/// the users table. Every failure, whether the token is missing, malformed,
/// forged, expired or names a deleted user, rejects with the same `401`.
///
/// The resolved identity is cached in the request extensions so that
/// middleware and handler share one lookup. It never outlives the request.
///
/// ```rust,ignore
/// use secreto_server::extract::AuthState;
///
/// async fn whoami(AuthState(identity): AuthState) -> String {
///     identity.username().to_owned()
/// }
/// ```
#[derive(Debug, Clone, Deref)]
pub struct AuthState(pub Identity);

impl AuthState {
    /// Consumes the extractor and returns the identity.
    #[inline]
    pub fn into_inner(self) -> Identity {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    CredentialGuard: FromRef<S>,
    PgClient: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let auth_header = AuthHeader::from_request_parts(parts, state).await?;
        let guard = CredentialGuard::from_ref(state);
        let pg_client = PgClient::from_ref(state);

        let identity = guard
            .resolve_identity(auth_header.token(), &pg_client)
            .await
            .inspect_err(|error| {
                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    reason = error.reason(),
                    "Session token rejected"
                );
            })?;

        tracing::trace!(
            target: TRACING_TARGET_AUTHENTICATION,
            user_id = %identity.user_id(),
            "Session token accepted"
        );

        let auth_state = Self(identity);
        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}

impl aide::OperationInput for AuthState {}
