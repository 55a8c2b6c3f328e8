//! Path parameter types for HTTP handlers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path parameters for operations addressing a user by name.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UsernamePathParams {
    /// Username of the user.
    pub username: String,
}

/// Path parameters for favorite operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UserIdPathParams {
    /// Unique identifier of the user.
    pub user_id: Uuid,
}

/// Path parameters for message operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MessagePathParams {
    /// Unique identifier of the message.
    pub message_id: Uuid,
}
