//! Anonymous message model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::messages;
use crate::types::MessageStatus;

/// Message addressed to a user.
///
/// The sender is never stored.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// Receiving user.
    pub receiver_id: Uuid,
    /// Message text exactly as sent; never blank.
    pub content: String,
    /// Where the receiver filed the message.
    pub status: MessageStatus,
    /// Timestamp when the message was sent.
    pub created_at: Timestamp,
}

/// Data for sending a new message.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewMessage {
    /// Receiving user.
    pub receiver_id: Uuid,
    /// Message text.
    pub content: String,
    /// Initial status, `inbox` when omitted.
    pub status: Option<MessageStatus>,
}

/// Data for refiling a message.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateMessage {
    /// New status.
    pub status: Option<MessageStatus>,
}

impl Message {
    /// Returns whether the message is visible on the receiver's public page.
    #[inline]
    pub fn is_public(&self) -> bool {
        self.status.is_public()
    }
}
