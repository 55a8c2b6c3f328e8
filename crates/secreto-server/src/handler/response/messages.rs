//! Anonymous message response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use secreto_postgres::model;
use secreto_postgres::types::MessageStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A received message. Messages carry no sender.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Message {
    /// Unique identifier of the message.
    pub id: Uuid,
    /// Message text.
    pub content: String,
    /// Where the receiver filed the message.
    pub status: MessageStatus,
    /// Timestamp when the message was received.
    pub created_at: Timestamp,
}

impl From<model::Message> for Message {
    fn from(message: model::Message) -> Self {
        Self {
            id: message.id,
            content: message.content,
            status: message.status,
            created_at: message.created_at.into(),
        }
    }
}

/// Messages returned by inbox and public board listings.
pub type Messages = Vec<Message>;

impl Message {
    /// Converts a list of database models, keeping their order.
    pub fn from_models(models: Vec<model::Message>) -> Messages {
        models.into_iter().map(Self::from).collect()
    }
}
