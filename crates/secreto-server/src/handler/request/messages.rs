//! Anonymous message request types.

use schemars::JsonSchema;
use secreto_postgres::types::MessageStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validations::{validate_not_blank, validate_username};

/// Request payload for sending an anonymous message.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
pub struct SendMessage {
    /// Username of the receiver.
    #[validate(custom(function = "validate_username"))]
    pub receiver_username: String,

    /// Message text.
    #[validate(length(min = 1, max = 4096), custom(function = "validate_not_blank"))]
    pub content: String,
}

impl SendMessage {
    /// Converts to database model for the resolved receiver.
    ///
    /// The sender is never recorded.
    pub fn into_model(self, receiver_id: Uuid) -> secreto_postgres::model::NewMessage {
        secreto_postgres::model::NewMessage {
            receiver_id,
            content: self.content,
            status: None,
        }
    }
}

/// Query parameters for listing received messages.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListMessagesQuery {
    /// Only return messages with this status.
    #[serde(default)]
    pub status: Option<MessageStatus>,
}

/// Query parameters for moving a message to another status.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateStatusQuery {
    /// Status to move the message to.
    pub new_status: MessageStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_bounds() {
        let request = |content: String| SendMessage {
            receiver_username: "neo".to_owned(),
            content,
        };

        assert!(request("follow the white rabbit".to_owned()).validate().is_ok());
        assert!(request(String::new()).validate().is_err());
        assert!(request(" \t".to_owned()).validate().is_err());
        assert!(request("x".repeat(4097)).validate().is_err());
    }

    #[test]
    fn new_message_has_no_status_override() {
        let receiver_id = Uuid::new_v4();
        let model = SendMessage {
            receiver_username: "neo".to_owned(),
            content: "hello".to_owned(),
        }
        .into_model(receiver_id);

        assert_eq!(model.receiver_id, receiver_id);
        assert!(model.status.is_none());
    }
}
