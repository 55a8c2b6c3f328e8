//! Resolved identity of an authenticated caller.

use std::future::Future;

use secreto_postgres::model::User;
use secreto_postgres::query::UserRepository;
use secreto_postgres::{PgClient, PgResult};
use uuid::Uuid;

use super::AuthClaims;

/// Looks up users by username on behalf of the guard.
pub trait IdentityStore {
    /// Returns the user registered under `username`, if any.
    fn find_identity(
        &self,
        username: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;
}

impl IdentityStore for PgClient {
    async fn find_identity(&self, username: &str) -> PgResult<Option<User>> {
        let mut conn = self.get_connection().await?;
        conn.find_user_by_username(username).await
    }
}

/// Verified token claims together with the user they name.
#[derive(Debug, Clone)]
pub struct Identity {
    claims: AuthClaims,
    user: User,
}

impl Identity {
    /// Pairs verified claims with the user found for their subject.
    pub(crate) fn new(claims: AuthClaims, user: User) -> Self {
        Self { claims, user }
    }

    /// Returns the verified token claims.
    #[inline]
    pub fn claims(&self) -> &AuthClaims {
        &self.claims
    }

    /// Returns the authenticated user.
    #[inline]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Returns the authenticated user's id.
    #[inline]
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// Returns the authenticated user's username.
    #[inline]
    pub fn username(&self) -> &str {
        &self.user.username
    }

    /// Consumes the identity and returns the user.
    #[inline]
    pub fn into_user(self) -> User {
        self.user
    }
}
