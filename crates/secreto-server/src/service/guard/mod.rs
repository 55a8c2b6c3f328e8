//! Credential and session guard.
//!
//! The guard hashes and verifies passwords, issues signed session tokens and
//! resolves a presented token back to a registered user. Resolution checks,
//! in order:
//!
//! 1. signature and structure, failing with [`GuardError::InvalidToken`],
//! 2. expiry against the guard's clock, failing with [`GuardError::ExpiredToken`],
//! 3. existence of the subject, failing with [`GuardError::UnknownSubject`].
//!
//! All three reach clients as the same `401` response.

mod claims;
mod error;
mod identity;

use std::sync::Arc;

pub use claims::AuthClaims;
pub use error::{GuardError, GuardResult};
pub use identity::{Identity, IdentityStore};
use jiff::Timestamp;
use secreto_postgres::model::User;

use crate::TRACING_TARGET_GUARD;
use crate::service::{Clock, PasswordHasher, SessionKeys, SystemClock};

/// Hashes credentials, issues session tokens and resolves them to users.
///
/// Holds no mutable state; clones share the same keys and clock.
#[derive(Debug, Clone)]
pub struct CredentialGuard {
    hasher: PasswordHasher,
    keys: SessionKeys,
    clock: Arc<dyn Clock>,
}

impl CredentialGuard {
    /// Creates a guard that reads time from the system clock.
    pub fn new(keys: SessionKeys) -> Self {
        Self {
            hasher: PasswordHasher::new(),
            keys,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for issuing and expiring tokens.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the signing keys.
    #[inline]
    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// Returns the current time according to the guard's clock.
    #[inline]
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Derives a salted one-way hash of `password`.
    ///
    /// Two calls with the same password produce different hashes.
    pub fn hash_password(&self, password: &str) -> GuardResult<String> {
        self.hasher.hash_password(password)
    }

    /// Returns whether `password` matches `stored_hash`.
    ///
    /// A malformed stored hash yields `false`.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.hasher.verify_password(password, stored_hash)
    }

    /// Issues a signed session token naming `subject`.
    pub fn create_token(&self, subject: &str) -> GuardResult<String> {
        let claims = AuthClaims::new(subject, self.now(), self.keys.token_ttl())?;
        let token = claims.encode(&self.keys)?;

        tracing::debug!(
            target: TRACING_TARGET_GUARD,
            token_id = %claims.token_id,
            expires_at = %claims.expires_at,
            "session token issued"
        );

        Ok(token)
    }

    /// Verifies signature, structure and expiry of `token`.
    pub fn verify_token(&self, token: &str) -> GuardResult<AuthClaims> {
        let claims = AuthClaims::decode(token, &self.keys)?;

        if claims.is_expired_at(self.now()) {
            tracing::debug!(
                target: TRACING_TARGET_GUARD,
                token_id = %claims.token_id,
                expired_at = %claims.expires_at,
                "session token expired"
            );
            return Err(GuardError::ExpiredToken);
        }

        Ok(claims)
    }

    /// Resolves `token` to the registered user it names.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::InvalidToken`], [`GuardError::ExpiredToken`] or
    /// [`GuardError::UnknownSubject`] in that order of precedence, or
    /// [`GuardError::Lookup`] if the store fails.
    pub async fn resolve_identity<S>(&self, token: &str, store: &S) -> GuardResult<Identity>
    where
        S: IdentityStore + Sync,
    {
        let claims = self.verify_token(token)?;

        let Some(user) = store.find_identity(&claims.subject).await? else {
            tracing::debug!(
                target: TRACING_TARGET_GUARD,
                token_id = %claims.token_id,
                "session token subject no longer exists"
            );
            return Err(GuardError::UnknownSubject);
        };

        Ok(Identity::new(claims, user))
    }

    /// Checks a username and password pair against the store.
    ///
    /// Unknown usernames and wrong passwords both fail with
    /// [`GuardError::InvalidCredentials`]. A hash verification is performed
    /// in either case so the two are not distinguishable by timing.
    pub async fn authenticate<S>(&self, username: &str, password: &str, store: &S) -> GuardResult<User>
    where
        S: IdentityStore + Sync,
    {
        let Some(user) = store.find_identity(username).await? else {
            let _ = self.hasher.verify_dummy_password(password);
            tracing::debug!(target: TRACING_TARGET_GUARD, "login for unknown username");
            return Err(GuardError::InvalidCredentials);
        };

        if !self.verify_password(password, &user.password_hash) {
            tracing::debug!(
                target: TRACING_TARGET_GUARD,
                user_id = %user.id,
                "login with wrong password"
            );
            return Err(GuardError::InvalidCredentials);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use jiff::SignedDuration;
    use secreto_postgres::PgError;
    use uuid::Uuid;

    use super::*;
    use crate::service::{FixedClock, SessionKeysConfig};

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[derive(Default)]
    struct MemoryStore {
        users: HashMap<String, User>,
        fail: bool,
    }

    impl MemoryStore {
        fn with_user(mut self, username: &str, password_hash: String) -> Self {
            let user = User {
                id: Uuid::now_v7(),
                username: username.to_owned(),
                password_hash,
                name: None,
                email: None,
                phone_number: None,
                bio: None,
                avatar_url: None,
                is_prime: false,
                created_at: Timestamp::now().into(),
            };
            self.users.insert(username.to_owned(), user);
            self
        }
    }

    impl IdentityStore for MemoryStore {
        async fn find_identity(&self, username: &str) -> secreto_postgres::PgResult<Option<User>> {
            if self.fail {
                return Err(PgError::Unexpected("store offline".into()));
            }
            Ok(self.users.get(username).cloned())
        }
    }

    fn instant(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn guard_at(now: &str) -> CredentialGuard {
        guard_with_secret_at(TEST_SECRET, now)
    }

    fn guard_with_secret_at(secret: &str, now: &str) -> CredentialGuard {
        let keys = SessionKeys::from_config(&SessionKeysConfig::new(secret)).unwrap();
        CredentialGuard::new(keys).with_clock(FixedClock::new(instant(now)))
    }

    #[tokio::test]
    async fn signup_then_login_then_resolve() -> anyhow::Result<()> {
        let guard = guard_at("2025-10-01T12:00:00Z");

        let hash = guard.hash_password("trinity123")?;
        assert!(guard.verify_password("trinity123", &hash));
        assert!(!guard.verify_password("wrong", &hash));

        let store = MemoryStore::default().with_user("neo", hash);
        let user = guard.authenticate("neo", "trinity123", &store).await?;
        assert_eq!(user.username, "neo");

        let token = guard.create_token(&user.username)?;
        let identity = guard.resolve_identity(&token, &store).await?;
        assert_eq!(identity.username(), "neo");
        assert_eq!(identity.user_id(), user.id);
        assert_eq!(
            identity.claims().expires_at,
            instant("2025-10-01T12:30:00Z")
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() -> anyhow::Result<()> {
        let guard = guard_at("2025-10-01T12:00:00Z");
        let store = MemoryStore::default().with_user("neo", guard.hash_password("trinity123")?);

        let wrong_password = guard.authenticate("neo", "morpheus", &store).await;
        assert!(matches!(wrong_password, Err(GuardError::InvalidCredentials)));

        let unknown_user = guard.authenticate("smith", "trinity123", &store).await;
        assert!(matches!(unknown_user, Err(GuardError::InvalidCredentials)));
        Ok(())
    }

    #[tokio::test]
    async fn token_resolves_until_expiry() -> anyhow::Result<()> {
        let issuer = guard_at("2025-10-01T12:00:00Z");
        let store = MemoryStore::default().with_user("neo", issuer.hash_password("trinity123")?);
        let token = issuer.create_token("neo")?;

        let almost = guard_at("2025-10-01T12:29:59Z");
        assert!(almost.resolve_identity(&token, &store).await.is_ok());

        let at_expiry = guard_at("2025-10-01T12:30:00Z");
        assert!(matches!(
            at_expiry.resolve_identity(&token, &store).await,
            Err(GuardError::ExpiredToken)
        ));

        let later = guard_at("2025-10-02T00:00:00Z");
        assert!(matches!(
            later.resolve_identity(&token, &store).await,
            Err(GuardError::ExpiredToken)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn foreign_signature_is_invalid() -> anyhow::Result<()> {
        let store = MemoryStore::default().with_user("neo", String::new());
        let forger = guard_with_secret_at("fedcba9876543210fedcba9876543210", "2025-10-01T12:00:00Z");
        let token = forger.create_token("neo")?;

        let guard = guard_at("2025-10-01T12:00:00Z");
        assert!(matches!(
            guard.resolve_identity(&token, &store).await,
            Err(GuardError::InvalidToken)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        let guard = guard_at("2025-10-01T12:00:00Z");
        let store = MemoryStore::default();

        for token in ["", "not-a-token", "a.b.c"] {
            assert!(matches!(
                guard.resolve_identity(token, &store).await,
                Err(GuardError::InvalidToken)
            ));
        }
    }

    #[tokio::test]
    async fn deleted_subject_is_unknown() -> anyhow::Result<()> {
        let guard = guard_at("2025-10-01T12:00:00Z");
        let token = guard.create_token("ghost")?;

        assert!(matches!(
            guard.resolve_identity(&token, &MemoryStore::default()).await,
            Err(GuardError::UnknownSubject)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn expiry_takes_precedence_over_unknown_subject() -> anyhow::Result<()> {
        let token = guard_at("2025-10-01T12:00:00Z").create_token("ghost")?;
        let later = guard_at("2025-10-01T13:00:00Z");

        assert!(matches!(
            later.resolve_identity(&token, &MemoryStore::default()).await,
            Err(GuardError::ExpiredToken)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn tampered_token_is_invalid_even_when_expired() -> anyhow::Result<()> {
        let token = guard_at("2025-10-01T12:00:00Z").create_token("neo")?;
        let mut tampered = token.clone();
        tampered.push('x');

        let later = guard_at("2025-10-02T12:00:00Z");
        assert!(matches!(
            later.resolve_identity(&tampered, &MemoryStore::default()).await,
            Err(GuardError::InvalidToken)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn store_failure_is_not_a_rejection() -> anyhow::Result<()> {
        let guard = guard_at("2025-10-01T12:00:00Z");
        let token = guard.create_token("neo")?;
        let store = MemoryStore {
            fail: true,
            ..MemoryStore::default()
        };

        let error = guard.resolve_identity(&token, &store).await.unwrap_err();
        assert!(matches!(error, GuardError::Lookup(_)));
        assert!(!error.is_rejection());
        Ok(())
    }

    #[test]
    fn tokens_issued_at_different_times_differ() -> anyhow::Result<()> {
        let first = guard_at("2025-10-01T12:00:00Z").create_token("neo")?;
        let second = guard_at("2025-10-01T12:00:01Z").create_token("neo")?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn token_lifetime_follows_config() -> anyhow::Result<()> {
        let config = SessionKeysConfig::new(TEST_SECRET).with_token_ttl_mins(5);
        let guard = CredentialGuard::new(SessionKeys::from_config(&config)?)
            .with_clock(FixedClock::new(instant("2025-10-01T12:00:00Z")));

        let claims = guard.verify_token(&guard.create_token("neo")?)?;
        assert_eq!(
            claims.expires_at.duration_since(claims.issued_at),
            SignedDuration::from_mins(5)
        );
        Ok(())
    }
}
