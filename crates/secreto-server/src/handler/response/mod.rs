//! Response types for HTTP handlers.

use std::borrow::Cow;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod authentications;
mod errors;
mod messages;
mod monitors;
mod users;

pub use authentications::*;
pub use errors::*;
pub use messages::*;
pub use monitors::*;
pub use users::*;

/// Plain confirmation returned by operations without a resource body.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ActionMessage {
    /// Human readable outcome of the operation.
    pub message: Cow<'static, str>,
}

impl ActionMessage {
    /// Creates a new confirmation message.
    #[inline]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
