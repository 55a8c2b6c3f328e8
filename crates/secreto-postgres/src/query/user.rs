//! User repository for registration, lookup and profile management.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::{Pagination, escape_like};
use crate::model::{NewUser, UpdateUser, User};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for user database operations.
pub trait UserRepository {
    /// Registers a new user.
    ///
    /// Fails with a `users_username_unique_idx` violation when the username
    /// is already taken.
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by its unique identifier.
    fn find_user_by_id(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by username.
    ///
    /// Usernames are compared exactly (case-sensitive).
    fn find_user_by_username(
        &mut self,
        username: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Checks if a username is already registered.
    fn username_exists(&mut self, username: &str) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists users whose username contains `query`, ordered by username.
    ///
    /// The query is matched literally, `%` and `_` are not wildcards.
    fn search_users_by_username(
        &mut self,
        query: &str,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<User>>> + Send;

    /// Applies a partial profile update and returns the updated user.
    ///
    /// An empty update returns the current record unchanged, or `None`
    /// when the user does not exist.
    fn update_user(
        &mut self,
        user_id: Uuid,
        updates: UpdateUser,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, mut new_user: NewUser) -> PgResult<User> {
        use schema::users;

        new_user.name = new_user
            .name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());
        new_user.email = new_user
            .email
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty());

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_user_by_id(&mut self, user_id: Uuid) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_user_by_username(&mut self, username: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::username.eq(username))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn username_exists(&mut self, username: &str) -> PgResult<bool> {
        use schema::users::{self, dsl};

        let count: i64 = users::table
            .filter(dsl::username.eq(username))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(count > 0)
    }

    async fn search_users_by_username(
        &mut self,
        query: &str,
        pagination: Pagination,
    ) -> PgResult<Vec<User>> {
        use schema::users::{self, dsl};

        let pattern = format!("%{}%", escape_like(query));

        users::table
            .filter(dsl::username.like(pattern))
            .order(dsl::username.asc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_user(&mut self, user_id: Uuid, mut updates: UpdateUser) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        // Some(None) clears, Some(Some(value)) sets, None skips
        updates.name = updates
            .name
            .map(|opt| opt.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty()));
        updates.bio = updates
            .bio
            .map(|opt| opt.map(|b| b.trim().to_owned()).filter(|b| !b.is_empty()));

        if updates.is_empty() {
            return self.find_user_by_id(user_id).await;
        }

        diesel::update(users::table.filter(dsl::id.eq(user_id)))
            .set(&updates)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }
}
