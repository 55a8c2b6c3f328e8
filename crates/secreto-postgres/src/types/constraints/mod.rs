//! Database constraint violations organized by table.
//!
//! Constraint names follow the `<table>_<rule>` convention of the migrations,
//! which lets a violation reported by PostgreSQL be routed to the enum of the
//! table it belongs to.

pub mod favorites;
pub mod messages;
pub mod users;

use std::fmt;

pub use favorites::FavoriteConstraints;
pub use messages::MessageConstraints;
use serde::{Deserialize, Serialize};
pub use users::UserConstraints;

/// Unified constraint violation enum that can represent any database constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    User(UserConstraints),
    Message(MessageConstraints),
    Favorite(FavoriteConstraints),
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Chronological integrity constraints (timestamp relationships).
    Chronological,
    /// Business logic constraints (domain-specific rules).
    BusinessLogic,
    /// Uniqueness constraints (primary keys, unique indexes).
    Uniqueness,
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from the constraint name.
    ///
    /// Returns `None` if the constraint name is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use secreto_postgres::types::ConstraintViolation;
    ///
    /// let violation = ConstraintViolation::new("users_username_unique_idx");
    /// assert!(violation.is_some());
    ///
    /// let unknown = ConstraintViolation::new("unknown_constraint");
    /// assert!(unknown.is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        let (prefix, _) = constraint.split_once('_')?;
        match prefix {
            "users" => UserConstraints::new(constraint).map(Self::User),
            "messages" => MessageConstraints::new(constraint).map(Self::Message),
            "favorites" => FavoriteConstraints::new(constraint).map(Self::Favorite),
            _ => None,
        }
    }

    /// Returns the table name associated with this constraint.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::User(_) => "users",
            ConstraintViolation::Message(_) => "messages",
            ConstraintViolation::Favorite(_) => "favorites",
        }
    }

    /// Returns the category of this constraint violation.
    pub fn constraint_category(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::User(c) => c.categorize(),
            ConstraintViolation::Message(c) => c.categorize(),
            ConstraintViolation::Favorite(c) => c.categorize(),
        }
    }

    /// Returns the underlying constraint name as used in the database.
    #[inline]
    pub fn constraint_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::User(c) => write!(f, "{}", c),
            ConstraintViolation::Message(c) => write!(f, "{}", c),
            ConstraintViolation::Favorite(c) => write!(f, "{}", c),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or_else(|| format!("Unknown constraint: {}", value))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_constraint_parsing() {
        assert_eq!(
            ConstraintViolation::new("users_username_unique_idx"),
            Some(ConstraintViolation::User(UserConstraints::UsernameUnique))
        );

        assert_eq!(
            ConstraintViolation::new("favorites_not_self"),
            Some(ConstraintViolation::Favorite(FavoriteConstraints::NotSelf))
        );

        assert_eq!(ConstraintViolation::new("unknown_constraint"), None);
        assert_eq!(ConstraintViolation::new("users"), None);
        assert_eq!(ConstraintViolation::new("messages_unknown"), None);
    }

    #[test]
    fn test_table_name_extraction() {
        let violation = ConstraintViolation::User(UserConstraints::UsernameFormat);
        assert_eq!(violation.table_name(), "users");

        let violation = ConstraintViolation::Message(MessageConstraints::ContentLength);
        assert_eq!(violation.table_name(), "messages");

        let violation = ConstraintViolation::Favorite(FavoriteConstraints::UserPairUnique);
        assert_eq!(violation.table_name(), "favorites");
    }

    #[test]
    fn test_constraint_categorization() {
        let violation = ConstraintViolation::User(UserConstraints::BioLength);
        assert_eq!(
            violation.constraint_category(),
            ConstraintCategory::Validation
        );

        let violation = ConstraintViolation::Favorite(FavoriteConstraints::UserPairUnique);
        assert_eq!(
            violation.constraint_category(),
            ConstraintCategory::Uniqueness
        );
    }

    #[test]
    fn every_constraint_routes_to_its_table() {
        for c in UserConstraints::iter() {
            let name = c.to_string();
            assert_eq!(
                ConstraintViolation::new(&name),
                Some(ConstraintViolation::User(c))
            );
        }
        for c in MessageConstraints::iter() {
            let name = c.to_string();
            assert_eq!(
                ConstraintViolation::new(&name),
                Some(ConstraintViolation::Message(c))
            );
        }
        for c in FavoriteConstraints::iter() {
            let name = c.to_string();
            assert_eq!(
                ConstraintViolation::new(&name),
                Some(ConstraintViolation::Favorite(c))
            );
        }
    }

    #[test]
    fn test_serde_uses_constraint_name() -> anyhow::Result<()> {
        let violation = ConstraintViolation::User(UserConstraints::UsernameUnique);
        let json = serde_json::to_string(&violation)?;
        assert_eq!(json, "\"users_username_unique_idx\"");

        let parsed: ConstraintViolation = serde_json::from_str(&json)?;
        assert_eq!(parsed, violation);
        assert!(serde_json::from_str::<ConstraintViolation>("\"nope\"").is_err());
        Ok(())
    }
}
