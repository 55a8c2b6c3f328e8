//! Query string extractor with structured rejections.

use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query as AxumQuery};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use super::sanitize_error_message;
use crate::handler::{Error, ErrorKind};

/// Target identifier for query extraction logs.
const TRACING_TARGET: &str = "secreto_server::extract::query";

/// Query string extractor that rejects with [`Error`].
///
/// Missing, duplicated and mistyped parameters are reported by name.
///
/// ```rust,ignore
/// use secreto_server::extract::Query;
///
/// #[derive(serde::Deserialize)]
/// struct SearchParams {
///     q: String,
///     limit: Option<i64>,
/// }
///
/// // GET /users/search?q=ne&limit=10
/// async fn search(Query(params): Query<SearchParams>) {}
/// ```
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Creates a new [`Query`] wrapper around the provided query parameters.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Consumes the wrapper and returns the inner query parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(query)) => Ok(Query(query)),
            Err(rejection) => Err(enhance_query_error(rejection)),
        }
    }
}

/// Converts an axum query rejection into a message naming the offending field.
fn enhance_query_error(rejection: QueryRejection) -> Error<'static> {
    tracing::debug!(
        target: TRACING_TARGET,
        error = %rejection,
        "Query parameter parsing failed"
    );

    let QueryRejection::FailedToDeserializeQueryString(err) = rejection else {
        return ErrorKind::BadRequest
            .with_message("Invalid query parameters")
            .with_context("The query string could not be parsed");
    };

    let error_message = err.body_text();
    let field_name = extract_field_name_from_error(&error_message).unwrap_or("unknown");

    if error_message.contains("missing field") {
        ErrorKind::BadRequest
            .with_message("Missing required query parameter")
            .with_context(format!("The query parameter '{field_name}' is required"))
    } else if error_message.contains("duplicate field") {
        ErrorKind::BadRequest
            .with_message("Duplicate query parameter")
            .with_context(format!(
                "The query parameter '{field_name}' was provided more than once"
            ))
    } else if error_message.contains("invalid type") || error_message.contains("variant") {
        ErrorKind::BadRequest
            .with_message("Invalid query parameter type")
            .with_context(sanitize_error_message(&error_message, 2, 150))
    } else {
        ErrorKind::BadRequest
            .with_message("Invalid query parameters")
            .with_context(sanitize_error_message(&error_message, 2, 150))
    }
}

/// Best-effort extraction of a field name from a serde error message.
fn extract_field_name_from_error(error_message: &str) -> Option<&str> {
    if let Some(start) = error_message.find('`')
        && let Some(end) = error_message[start + 1..].find('`')
    {
        return Some(&error_message[start + 1..start + 1 + end]);
    }

    let start = error_message.find("field ")?;
    let field_part = &error_message[start + 6..];
    field_part.find(' ').map(|end| &field_part[..end])
}

impl<T> aide::OperationInput for Query<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumQuery::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AxumQuery::<T>::inferred_early_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_field_name_from_backticks() {
        assert_eq!(
            extract_field_name_from_error("missing field `new_status`"),
            Some("new_status")
        );
    }

    #[test]
    fn extract_field_name_from_plain_text() {
        assert_eq!(
            extract_field_name_from_error("duplicate field limit at line 1"),
            Some("limit")
        );
    }

    #[test]
    fn extract_field_name_without_match() {
        assert_eq!(extract_field_name_from_error("some other error"), None);
    }

    #[test]
    fn query_into_inner() {
        let query = Query::new("neo".to_owned());
        assert_eq!(query.into_inner(), "neo");
    }
}
