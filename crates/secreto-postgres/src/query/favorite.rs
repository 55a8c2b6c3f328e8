//! Favorite repository for the directed user-to-user favorite relation.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Favorite, NewFavorite, User};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for favorite database operations.
pub trait FavoriteRepository {
    /// Adds a user to favorites.
    ///
    /// Returns `None` when the relation already exists.
    fn create_favorite(
        &mut self,
        new_favorite: NewFavorite,
    ) -> impl Future<Output = PgResult<Option<Favorite>>> + Send;

    /// Removes a user from favorites, returning whether a relation was removed.
    fn delete_favorite(
        &mut self,
        user_id: Uuid,
        favorite_user_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists the users `user_id` has favorited, most recently added first.
    fn list_favorite_users(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<User>>> + Send;
}

impl FavoriteRepository for PgConnection {
    async fn create_favorite(&mut self, new_favorite: NewFavorite) -> PgResult<Option<Favorite>> {
        use schema::favorites;

        diesel::insert_into(favorites::table)
            .values(&new_favorite)
            .on_conflict_do_nothing()
            .returning(Favorite::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn delete_favorite(&mut self, user_id: Uuid, favorite_user_id: Uuid) -> PgResult<bool> {
        use schema::favorites::{self, dsl};

        let deleted = diesel::delete(
            favorites::table
                .filter(dsl::user_id.eq(user_id))
                .filter(dsl::favorite_user_id.eq(favorite_user_id)),
        )
        .execute(self)
        .await
        .map_err(PgError::from)?;

        Ok(deleted > 0)
    }

    async fn list_favorite_users(&mut self, user_id: Uuid) -> PgResult<Vec<User>> {
        use schema::{favorites, users};

        favorites::table
            .inner_join(users::table.on(users::id.eq(favorites::favorite_user_id)))
            .filter(favorites::user_id.eq(user_id))
            .order(favorites::created_at.desc())
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
