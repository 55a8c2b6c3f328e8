//! User profile request types.

use schemars::JsonSchema;
use secreto_postgres::model::UpdateUser;
use secreto_postgres::query::Pagination;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::validate_not_blank;

/// Request payload to update the caller's profile.
///
/// Absent fields are left untouched.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate, JsonSchema)]
pub struct UpdateProfile {
    /// New display name.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub name: Option<String>,

    /// New biography.
    #[serde(default)]
    #[validate(length(max = 500))]
    pub bio: Option<String>,
}

impl UpdateProfile {
    /// Converts to database model.
    pub fn into_model(self) -> UpdateUser {
        UpdateUser {
            name: self.name.map(Some),
            bio: self.bio.map(Some),
            ..Default::default()
        }
    }
}

/// Query parameters for searching users by username.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
pub struct SearchUsers {
    /// Substring the username must contain.
    #[validate(length(min = 1, max = 64), custom(function = "validate_not_blank"))]
    pub q: String,

    /// Maximum number of users to return.
    #[serde(default)]
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,

    /// Number of users to skip.
    #[serde(default)]
    #[validate(range(max = 100000))]
    pub offset: Option<u32>,
}

impl SearchUsers {
    /// Default number of users returned by a search.
    const DEFAULT_LIMIT: u32 = 50;

    /// Returns the pagination for the database query.
    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            i64::from(self.limit.unwrap_or(Self::DEFAULT_LIMIT)),
            i64::from(self.offset.unwrap_or_default()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_update_only_sets_given_fields() {
        let update = UpdateProfile {
            name: Some("Neo".to_owned()),
            bio: None,
        }
        .into_model();

        assert_eq!(update.name, Some(Some("Neo".to_owned())));
        assert!(update.bio.is_none());
        assert!(update.email.is_none());
    }

    #[test]
    fn empty_profile_update() {
        assert!(UpdateProfile::default().into_model().is_empty());
    }

    #[test]
    fn search_defaults_pagination() {
        let search = SearchUsers {
            q: "ne".to_owned(),
            limit: None,
            offset: None,
        };
        assert_eq!(search.pagination(), Pagination::new(50, 0));
    }

    #[test]
    fn blank_search_is_rejected() {
        let search = SearchUsers {
            q: "  ".to_owned(),
            limit: None,
            offset: None,
        };
        assert!(search.validate().is_err());
    }
}
