//! Users table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Users table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum UserConstraints {
    // User validation constraints
    #[strum(serialize = "users_username_length")]
    UsernameLength,
    #[strum(serialize = "users_username_format")]
    UsernameFormat,
    #[strum(serialize = "users_password_hash_not_empty")]
    PasswordHashNotEmpty,
    #[strum(serialize = "users_name_length")]
    NameLength,
    #[strum(serialize = "users_email_length")]
    EmailLength,
    #[strum(serialize = "users_phone_number_length")]
    PhoneNumberLength,
    #[strum(serialize = "users_bio_length")]
    BioLength,
    #[strum(serialize = "users_avatar_url_length")]
    AvatarUrlLength,

    // User unique constraints
    #[strum(serialize = "users_username_unique_idx")]
    UsernameUnique,
}

impl UserConstraints {
    /// Creates a new [`UserConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            UserConstraints::UsernameLength
            | UserConstraints::UsernameFormat
            | UserConstraints::PasswordHashNotEmpty
            | UserConstraints::NameLength
            | UserConstraints::EmailLength
            | UserConstraints::PhoneNumberLength
            | UserConstraints::BioLength
            | UserConstraints::AvatarUrlLength => ConstraintCategory::Validation,

            UserConstraints::UsernameUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<UserConstraints> for String {
    #[inline]
    fn from(val: UserConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for UserConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
