//! Authentication response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Session token issued after signup or login.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AccessToken {
    /// Signed session token for the `Authorization: Bearer` header.
    pub access_token: String,
    /// Token scheme, always `bearer`.
    pub token_type: String,
}

impl AccessToken {
    /// Scheme reported with every issued token.
    pub const TOKEN_TYPE: &str = "bearer";

    /// Wraps a freshly signed session token.
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: Self::TOKEN_TYPE.to_owned(),
        }
    }
}
