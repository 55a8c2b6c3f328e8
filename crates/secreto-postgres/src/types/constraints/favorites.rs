//! Favorites table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Favorites table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum FavoriteConstraints {
    // Favorite business logic constraints
    #[strum(serialize = "favorites_not_self")]
    NotSelf,
    #[strum(serialize = "favorites_user_id_fkey")]
    UserExists,
    #[strum(serialize = "favorites_favorite_user_id_fkey")]
    FavoriteUserExists,

    // Favorite unique constraints
    #[strum(serialize = "favorites_user_pair_unique_idx")]
    UserPairUnique,
}

impl FavoriteConstraints {
    /// Creates a new [`FavoriteConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            FavoriteConstraints::NotSelf
            | FavoriteConstraints::UserExists
            | FavoriteConstraints::FavoriteUserExists => ConstraintCategory::BusinessLogic,

            FavoriteConstraints::UserPairUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<FavoriteConstraints> for String {
    #[inline]
    fn from(val: FavoriteConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for FavoriteConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
