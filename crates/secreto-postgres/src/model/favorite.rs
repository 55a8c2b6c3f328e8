//! Favorite relation model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::favorites;

/// Directed relation: `user_id` marked `favorite_user_id` as favorite.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub favorite_user_id: Uuid,
    pub created_at: Timestamp,
}

/// Data for adding a user to favorites.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewFavorite {
    pub user_id: Uuid,
    pub favorite_user_id: Uuid,
}
