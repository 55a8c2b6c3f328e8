//! Message status enumeration for inbox triage.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Defines where a received message is filed by its receiver.
///
/// This enumeration corresponds to the `MESSAGE_STATUS` PostgreSQL enum.
/// New messages always land in [`MessageStatus::Inbox`]; only messages moved
/// to [`MessageStatus::Public`] appear on the receiver's public page.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::MessageStatus"]
pub enum MessageStatus {
    /// Message is waiting in the receiver's private inbox
    #[db_rename = "inbox"]
    #[serde(rename = "inbox")]
    #[strum(serialize = "inbox")]
    #[default]
    Inbox,

    /// Message is shown on the receiver's public page
    #[db_rename = "public"]
    #[serde(rename = "public")]
    #[strum(serialize = "public")]
    Public,

    /// Message is kept privately among the receiver's favorites
    #[db_rename = "favorite"]
    #[serde(rename = "favorite")]
    #[strum(serialize = "favorite")]
    Favorite,
}

impl MessageStatus {
    /// Returns whether the message is visible to anyone.
    #[inline]
    pub fn is_public(self) -> bool {
        matches!(self, MessageStatus::Public)
    }

    /// Returns whether the message is still untriaged.
    #[inline]
    pub fn is_inbox(self) -> bool {
        matches!(self, MessageStatus::Inbox)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn default_is_inbox() {
        assert_eq!(MessageStatus::default(), MessageStatus::Inbox);
    }

    #[test]
    fn parses_lowercase_names() {
        assert_eq!("public".parse::<MessageStatus>().ok(), Some(MessageStatus::Public));
        assert_eq!("favorite".parse::<MessageStatus>().ok(), Some(MessageStatus::Favorite));
        assert!("archived".parse::<MessageStatus>().is_err());
        assert!("Inbox".parse::<MessageStatus>().is_err());
    }

    #[test]
    fn display_matches_serde() -> anyhow::Result<()> {
        for status in MessageStatus::iter() {
            let json = serde_json::to_string(&status)?;
            assert_eq!(json, format!("\"{status}\""));
        }
        Ok(())
    }

    #[test]
    fn only_public_is_visible() {
        assert!(MessageStatus::Public.is_public());
        assert!(!MessageStatus::Inbox.is_public());
        assert!(!MessageStatus::Favorite.is_public());
    }
}
