//! User response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use secreto_postgres::model::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile of a user as anyone may see it.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PublicUser {
    /// Unique identifier of the user.
    pub id: Uuid,
    /// Username of the user.
    pub username: String,
    /// Display name.
    pub name: Option<String>,
    /// Short biography.
    pub bio: Option<String>,
    /// URL of the avatar image.
    pub avatar_url: Option<String>,
    /// Whether the user has a prime subscription.
    pub is_prime: bool,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            bio: user.bio,
            avatar_url: user.avatar_url,
            is_prime: user.is_prime,
        }
    }
}

/// Profile of the authenticated caller, including contact details.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_prime: bool,
    pub created_at: Timestamp,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            bio: user.bio,
            avatar_url: user.avatar_url,
            is_prime: user.is_prime,
            created_at: user.created_at.into(),
        }
    }
}

/// Users returned by search and favorites listings.
pub type PublicUsers = Vec<PublicUser>;

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "neo".to_owned(),
            password_hash: "$argon2id$v=19$secret".to_owned(),
            name: Some("Thomas Anderson".to_owned()),
            email: Some("neo@matrix.io".to_owned()),
            phone_number: Some("+1 555 0100".to_owned()),
            bio: None,
            avatar_url: None,
            is_prime: true,
            created_at: Timestamp::now().into(),
        }
    }

    #[test]
    fn public_profile_hides_contact_details() -> anyhow::Result<()> {
        let json = serde_json::to_value(PublicUser::from(user()))?;

        assert_eq!(json["username"], "neo");
        assert_eq!(json["is_prime"], true);
        assert!(json.get("email").is_none());
        assert!(json.get("phone_number").is_none());
        assert!(json.get("password_hash").is_none());
        Ok(())
    }

    #[test]
    fn own_profile_never_contains_password_hash() -> anyhow::Result<()> {
        let json = serde_json::to_string(&UserProfile::from(user()))?;

        assert!(json.contains("neo@matrix.io"));
        assert!(!json.contains("argon2"));
        Ok(())
    }
}
