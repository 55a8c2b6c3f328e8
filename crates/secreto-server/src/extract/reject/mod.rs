//! Drop-in replacements for axum's body, path and query extractors.
//!
//! Each wrapper delegates to the axum extractor and converts its rejection
//! into a [`handler::Error`] with a short message and a sanitized context.
//!
//! [`handler::Error`]: crate::handler::Error

mod enhanced_form;
mod enhanced_json;
mod enhanced_path;
mod enhanced_query;
mod validated_form;
mod validated_json;

pub(crate) use self::enhanced_json::MAX_JSON_PAYLOAD_SIZE;
pub use self::enhanced_form::Form;
pub use self::enhanced_json::Json;
pub use self::enhanced_path::Path;
pub use self::enhanced_query::Query;
pub use self::validated_form::ValidateForm;
pub use self::validated_json::ValidateJson;

/// Truncates a rejection message so parser internals do not leak into responses.
fn sanitize_error_message(message: &str, max_lines: usize, max_chars: usize) -> String {
    message
        .lines()
        .take(max_lines)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}
