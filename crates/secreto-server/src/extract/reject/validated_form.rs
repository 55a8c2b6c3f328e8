//! Form body extractor that runs `validator` checks after deserialization.

use axum::extract::{FromRequest, Request};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::{Form, Json};
use crate::handler::Error;

/// Form extractor that also validates the body with [`Validate`].
///
/// Reads URL-encoded and multipart form bodies through [`Form`]. A body
/// declared as JSON is read through [`Json`] instead.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateForm<T>(pub T);

impl<T> ValidateForm<T> {
    /// Creates a new instance of [`ValidateForm`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateForm<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let data = if is_json(req.headers()) {
            <Json<T> as FromRequest<S>>::from_request(req, state)
                .await?
                .into_inner()
        } else {
            <Form<T> as FromRequest<S>>::from_request(req, state)
                .await?
                .into_inner()
        };

        data.validate()?;
        Ok(Self::new(data))
    }
}

/// Returns whether the request declares a JSON body.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence == "application/json" || essence.ends_with("+json")
}

impl<T> aide::OperationInput for ValidateForm<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Form::<T>::operation_input(ctx, operation);
    }
}
