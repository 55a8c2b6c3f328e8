//! Form body extractor for URL-encoded and multipart submissions.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::FormRejection;
use axum::extract::{Form as AxumForm, FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::sanitize_error_message;
use crate::handler::{Error, ErrorKind};

/// Tracing target for form extraction.
const TRACING_TARGET: &str = "secreto_server::extract::form";

/// Form extractor that rejects with [`Error`].
///
/// Accepts `application/x-www-form-urlencoded` bodies and the text fields of
/// `multipart/form-data` bodies, so browser `FormData` uploads and OAuth2
/// password clients deserialize into the same type. Unknown fields are
/// ignored unless `T` denies them.
///
/// ```rust,no_run
/// use secreto_server::extract::Form;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct LoginForm {
///     username: String,
///     password: String,
/// }
///
/// async fn login(Form(form): Form<LoginForm>) {
///     println!("Login attempt for: {}", form.username);
/// }
/// ```
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Form<T>(pub T);

impl<T> Form<T> {
    /// Creates a new [`Form`] wrapper around the provided form data.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Consumes the wrapper and returns the inner form data.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for Form<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(req.headers()) {
            let multipart = Multipart::from_request(req, state).await?;
            return read_multipart(multipart).await.map(Self);
        }

        let AxumForm(form) = AxumForm::<T>::from_request(req, state).await?;
        Ok(Self(form))
    }
}

/// Returns whether the request declares a `multipart/form-data` body.
fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("multipart/form-data"))
}

/// Collects the text fields of a multipart body and deserializes them.
///
/// File parts are skipped. A repeated field keeps its last value.
async fn read_multipart<T>(mut multipart: Multipart) -> Result<T, Error<'static>>
where
    T: DeserializeOwned,
{
    let mut fields = Map::new();
    while let Some(field) = multipart.next_field().await? {
        if field.file_name().is_some() {
            continue;
        }

        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        let value = field.text().await?;
        fields.insert(name, Value::String(value));
    }

    serde_json::from_value(Value::Object(fields))
        .map_err(|err| form_data_error(&err.to_string()))
}

/// Builds the rejection for form fields that did not deserialize.
fn form_data_error(error_message: &str) -> Error<'static> {
    tracing::debug!(
        target: TRACING_TARGET,
        error = error_message,
        "Form data parsing failed"
    );

    if error_message.contains("missing field") {
        let field_name = extract_field_name(error_message).unwrap_or("unknown");
        return ErrorKind::BadRequest
            .with_message("Missing required form field")
            .with_context(format!("The form field '{field_name}' is required"));
    }

    ErrorKind::BadRequest
        .with_message("Invalid form data")
        .with_context(sanitize_error_message(error_message, 3, 200))
}

/// Pulls the backticked field name out of a serde error message.
fn extract_field_name(error_message: &str) -> Option<&str> {
    let start = error_message.find('`')? + 1;
    let end = error_message[start..].find('`')?;
    Some(&error_message[start..start + end])
}

impl From<FormRejection> for Error<'static> {
    fn from(rejection: FormRejection) -> Self {
        match rejection {
            FormRejection::FailedToDeserializeForm(err) => form_data_error(&err.body_text()),
            FormRejection::FailedToDeserializeFormBody(err) => form_data_error(&err.body_text()),
            FormRejection::InvalidFormContentType(_) => ErrorKind::BadRequest
                .with_message("Invalid content type")
                .with_context(
                    "Content-Type header must be 'application/x-www-form-urlencoded' \
                    or 'multipart/form-data'",
                ),
            FormRejection::BytesRejection(err) => ErrorKind::BadRequest
                .with_message("Failed to read request body")
                .with_context(sanitize_error_message(&err.body_text(), 3, 200)),
            other => {
                tracing::error!(
                    target: TRACING_TARGET,
                    rejection = ?other,
                    "Unexpected form rejection"
                );
                ErrorKind::InternalServerError.with_message("Request processing failed")
            }
        }
    }
}

impl From<MultipartRejection> for Error<'static> {
    fn from(rejection: MultipartRejection) -> Self {
        match rejection {
            MultipartRejection::InvalidBoundary(_) => ErrorKind::BadRequest
                .with_message("Invalid multipart boundary")
                .with_context(
                    "The Content-Type header must be 'multipart/form-data' with a boundary",
                ),
            other => ErrorKind::BadRequest
                .with_message("Invalid multipart request")
                .with_context(sanitize_error_message(&other.body_text(), 3, 200)),
        }
    }
}

impl From<MultipartError> for Error<'static> {
    fn from(error: MultipartError) -> Self {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ErrorKind::PayloadTooLarge.with_message("Request body too large");
        }

        ErrorKind::BadRequest
            .with_message("Invalid multipart request")
            .with_context(sanitize_error_message(&error.body_text(), 3, 200))
    }
}

impl<T> aide::OperationInput for Form<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumForm::<T>::operation_input(ctx, operation);
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn field_names_come_from_backticks() {
        assert_eq!(
            extract_field_name("missing field `password`"),
            Some("password")
        );
        assert_eq!(extract_field_name("some other error"), None);
    }

    #[test]
    fn missing_fields_are_named() {
        let error = form_data_error("missing field `password`");
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), Some("Missing required form field"));
        assert_eq!(
            error.context(),
            Some("The form field 'password' is required")
        );
    }

    #[test]
    fn multipart_is_detected_with_boundary() {
        let mut headers = HeaderMap::new();
        assert!(!is_multipart(&headers));

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=secreto"),
        );
        assert!(is_multipart(&headers));

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        assert!(!is_multipart(&headers));
    }
}
