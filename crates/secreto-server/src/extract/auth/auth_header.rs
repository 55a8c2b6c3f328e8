//! Bearer token extraction from the `Authorization` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind};

/// Raw bearer token presented by the client.
///
/// Only the header shape is checked here. A missing or malformed header is
/// rejected with the same `401` as a token that fails verification, so the
/// client learns nothing about why it was refused.
#[must_use]
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader(String);

impl AuthHeader {
    /// Wraps an already extracted token.
    #[inline]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token string.
    #[inline]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthHeader").field(&"[REDACTED]").finish()
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts.extensions.get::<Self>() {
            return Ok(auth_header.clone());
        }

        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;

        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let auth_header = Self::new(bearer.token());
                parts.extensions.insert(auth_header.clone());
                Ok(auth_header)
            }
            Err(rejection) => {
                let reason = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => "missing_header",
                    _ => "malformed_header",
                };

                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    reason,
                    "Bearer token rejected"
                );

                Err(ErrorKind::Unauthorized.into_error())
            }
        }
    }
}

impl aide::OperationInput for AuthHeader {}

#[cfg(test)]
mod tests {
    use axum::http::{Request, header};

    use super::*;

    async fn extract(value: Option<&str>) -> Result<AuthHeader, Error<'static>> {
        let mut builder = Request::builder().uri("/users/me");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        AuthHeader::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn extracts_bearer_token() {
        let header = extract(Some("Bearer abc.def.ghi")).await.unwrap();
        assert_eq!(header.token(), "abc.def.ghi");
    }

    #[tokio::test]
    async fn missing_and_malformed_headers_are_unauthorized() {
        for value in [None, Some("Basic bmVvOnRyaW5pdHk="), Some("Bearer")] {
            let error = extract(value).await.unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Unauthorized);
        }
    }

    #[test]
    fn debug_redacts_token() {
        let header = AuthHeader::new("secret-token");
        assert!(!format!("{header:?}").contains("secret-token"));
    }
}
