//! User model for PostgreSQL database operations.
//!
//! ## Models
//!
//! - [`User`] - Registered user with profile information and credentials
//! - [`NewUser`] - Data structure for registering new users
//! - [`UpdateUser`] - Data structure for updating profile information

use std::fmt;

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::users;

/// Registered user that can receive anonymous messages.
#[derive(Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique, case-sensitive login name (1-64 characters).
    pub username: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Optional contact email.
    pub email: Option<String>,
    /// Optional contact phone number.
    pub phone_number: Option<String>,
    /// Optional short biography shown on the public page.
    pub bio: Option<String>,
    /// Optional URL to profile avatar image.
    pub avatar_url: Option<String>,
    /// Premium membership flag.
    pub is_prime: bool,
    /// Timestamp when the user registered.
    pub created_at: Timestamp,
}

/// Data for registering a new user.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    /// Unique, case-sensitive login name.
    pub username: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Optional contact email.
    pub email: Option<String>,
    /// Optional contact phone number.
    pub phone_number: Option<String>,
    /// Optional short biography.
    pub bio: Option<String>,
    /// Optional URL to profile avatar image.
    pub avatar_url: Option<String>,
}

/// Data for updating a user profile.
///
/// Outer `None` leaves the column untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateUser {
    /// Display name.
    pub name: Option<Option<String>>,
    /// Contact email.
    pub email: Option<Option<String>>,
    /// Contact phone number.
    pub phone_number: Option<Option<String>>,
    /// Short biography.
    pub bio: Option<Option<String>>,
    /// URL to profile avatar image.
    pub avatar_url: Option<Option<String>>,
}

impl User {
    /// Returns whether the user has an avatar URL configured.
    pub fn has_avatar(&self) -> bool {
        self.avatar_url.is_some()
    }

    /// Returns the name to show in listings, falling back to the username.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

impl UpdateUser {
    /// Returns whether the update would not change any column.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("name", &self.name)
            .field("is_prime", &self.is_prime)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::nil(),
            username: "neo".to_owned(),
            password_hash: "$argon2id$v=19$secret".to_owned(),
            name: None,
            email: None,
            phone_number: None,
            bio: None,
            avatar_url: None,
            is_prime: false,
            created_at: jiff::Timestamp::UNIX_EPOCH.into(),
        }
    }

    #[test]
    fn debug_redacts_password_hash() {
        let output = format!("{:?}", user());
        assert!(output.contains("neo"));
        assert!(!output.contains("argon2id"));
        assert!(output.contains("[REDACTED]"));
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let mut user = user();
        assert_eq!(user.display_name(), "neo");

        user.name = Some(String::new());
        assert_eq!(user.display_name(), "neo");

        user.name = Some("Thomas Anderson".to_owned());
        assert_eq!(user.display_name(), "Thomas Anderson");
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(UpdateUser::default().is_empty());

        let update = UpdateUser {
            bio: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
