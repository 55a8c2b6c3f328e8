//! Password hashing and verification using Argon2id.
//!
//! Hashes are stored in PHC string format, which carries the algorithm,
//! parameters and salt alongside the digest.

use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use rand::RngExt;
use rand::distr::Alphanumeric;

use crate::service::guard::{GuardError, GuardResult};

/// Target identifier for password hashing logs.
const TRACING_TARGET: &str = "secreto_server::service::password_hasher";

/// Password hashing and verification service using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a new instance of the [`PasswordHasher`] service.
    pub fn new() -> Self {
        let argon2 = Argon2::default();
        Self { argon2 }
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// Two calls with the same plaintext return different strings, both of
    /// which verify against that plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Hashing`] if salt generation or hashing fails.
    pub fn hash_password(&self, password: &str) -> GuardResult<String> {
        // The hasher draws the salt from the operating system.
        let password_hash = self.argon2.hash_password(password.as_bytes()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "password hashing operation failed"
            );
            GuardError::Hashing(e.to_string())
        })?;

        Ok(password_hash.to_string())
    }

    /// Returns whether `password` matches `stored_hash`.
    ///
    /// Mismatches and malformed hashes both yield `false`.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(parsed_hash) => parsed_hash,
            Err(e) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %e,
                    "stored password hash is malformed"
                );
                return false;
            }
        };

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => {
                tracing::trace!(target: TRACING_TARGET, "password verification succeeded");
                true
            }
            Err(e) => {
                tracing::trace!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password verification failed"
                );
                false
            }
        }
    }

    /// Performs a verification against a throwaway hash.
    ///
    /// Used when the user does not exist, so that a failed login takes about
    /// as long whether or not the username is registered. Always returns `false`.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        let mut rng = rand::rng();
        let password_len = rng.random_range(16..32);
        let dummy_password: String = (0..password_len)
            .map(|_| rng.sample(Alphanumeric) as char)
            .collect();

        if let Ok(dummy_hash) = self.hash_password(&dummy_password) {
            let _ = self.verify_password(password, &dummy_hash);
        }

        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("trinity123")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("trinity123", &hash));
        assert!(!hasher.verify_password("morpheus", &hash));

        Ok(())
    }

    #[test]
    fn hash_produces_unique_salts() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();

        let hash1 = hasher.hash_password("test_password")?;
        let hash2 = hasher.hash_password("test_password")?;

        assert_ne!(hash1, hash2);
        assert!(hasher.verify_password("test_password", &hash1));
        assert!(hasher.verify_password("test_password", &hash2));

        Ok(())
    }

    #[test]
    fn hash_never_contains_plaintext() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("plaintext-secret")?;
        assert!(!hash.contains("plaintext-secret"));
        Ok(())
    }

    #[test]
    fn empty_password_round_trips() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("")?;
        assert!(hasher.verify_password("", &hash));
        assert!(!hasher.verify_password(" ", &hash));
        Ok(())
    }

    #[test]
    fn malformed_hash_is_false_not_error() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_password("test_password", "invalid_hash_format"));
        assert!(!hasher.verify_password("test_password", ""));
    }

    #[test]
    fn dummy_verification_always_fails() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_dummy_password("anything"));
    }
}
