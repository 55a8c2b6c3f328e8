//! Claims carried by a session token.

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GuardError, GuardResult};
use crate::TRACING_TARGET_GUARD;
use crate::service::SessionKeys;

/// JWT claims of a session token.
///
/// | Claim | Field | Description |
/// |-------|-------|-------------|
/// | `iss` | `issued_by` | Token issuer identifier |
/// | `aud` | `audience` | Token audience identifier |
/// | `jti` | `token_id` | Random token identifier |
/// | `sub` | `subject` | Username the token represents |
/// | `iat` | `issued_at` | Issue time, seconds since the epoch |
/// | `exp` | `expires_at` | Expiry time, seconds since the epoch |
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthClaims {
    #[serde(rename = "iss")]
    issued_by: String,
    #[serde(rename = "aud")]
    audience: String,

    /// Random token identifier.
    #[serde(rename = "jti")]
    pub token_id: Uuid,
    /// Username the token was issued to.
    #[serde(rename = "sub")]
    pub subject: String,

    /// Issue time.
    #[serde(rename = "iat")]
    #[serde(with = "jiff::fmt::serde::timestamp::second::required")]
    pub issued_at: Timestamp,
    /// Expiry time.
    #[serde(rename = "exp")]
    #[serde(with = "jiff::fmt::serde::timestamp::second::required")]
    pub expires_at: Timestamp,
}

impl AuthClaims {
    /// JWT audience identifier for session tokens.
    const JWT_AUDIENCE: &str = "secreto:server";
    /// JWT issuer identifier for session tokens.
    const JWT_ISSUER: &str = "secreto";

    /// Creates claims for `subject` valid for `ttl` from `issued_at`.
    ///
    /// Sub-second precision is dropped since the wire format uses whole seconds.
    pub fn new(
        subject: impl Into<String>,
        issued_at: Timestamp,
        ttl: SignedDuration,
    ) -> GuardResult<Self> {
        let issued_at = Timestamp::from_second(issued_at.as_second())
            .map_err(GuardError::Lifetime)?;
        let expires_at = issued_at.checked_add(ttl).map_err(GuardError::Lifetime)?;

        Ok(Self {
            issued_by: Self::JWT_ISSUER.to_owned(),
            audience: Self::JWT_AUDIENCE.to_owned(),
            token_id: Uuid::new_v4(),
            subject: subject.into(),
            issued_at,
            expires_at,
        })
    }

    /// Returns whether the token has expired at `now`.
    #[inline]
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    /// Returns the remaining lifetime at `now`, or zero if already expired.
    #[must_use]
    pub fn remaining_lifetime(&self, now: Timestamp) -> SignedDuration {
        let remaining = self.expires_at.duration_since(now);
        if remaining.is_positive() {
            remaining
        } else {
            SignedDuration::ZERO
        }
    }

    /// Signs the claims into a compact JWT.
    pub fn encode(&self, keys: &SessionKeys) -> GuardResult<String> {
        let header = Header::new(keys.algorithm());
        encode(&header, self, keys.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_GUARD,
                error = %e,
                "failed to sign session token"
            );
            GuardError::Signing(e)
        })
    }

    /// Verifies the signature and structure of `token` and returns its claims.
    ///
    /// Expiry is not checked here; callers compare [`AuthClaims::expires_at`]
    /// against their own clock.
    pub fn decode(token: &str, keys: &SessionKeys) -> GuardResult<Self> {
        let mut validation = Validation::new(keys.algorithm());
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = true;
        validation.leeway = 0;
        validation.set_audience(&[Self::JWT_AUDIENCE]);
        validation.set_issuer(&[Self::JWT_ISSUER]);
        validation.set_required_spec_claims(&["iss", "aud", "jti", "sub", "iat", "exp"]);

        let token_data =
            decode::<Self>(token, keys.decoding_key(), &validation).map_err(|e| {
                tracing::debug!(
                    target: TRACING_TARGET_GUARD,
                    error_kind = ?e.kind(),
                    "session token failed verification"
                );
                GuardError::InvalidToken
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::SessionKeysConfig;

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn keys(secret: &str) -> anyhow::Result<SessionKeys> {
        Ok(SessionKeys::from_config(&SessionKeysConfig::new(secret))?)
    }

    #[test]
    fn claims_round_trip_through_jwt() -> anyhow::Result<()> {
        let keys = keys(TEST_SECRET)?;
        let now: Timestamp = "2025-10-01T12:00:00.750Z".parse()?;
        let claims = AuthClaims::new("alice", now, SignedDuration::from_mins(30))?;

        let token = claims.encode(&keys)?;
        assert_eq!(token.split('.').count(), 3);

        let decoded = AuthClaims::decode(&token, &keys)?;
        assert_eq!(decoded, claims);
        assert_eq!(decoded.subject, "alice");
        assert_eq!(decoded.issued_at.as_second(), now.as_second());
        Ok(())
    }

    #[test]
    fn expiry_is_exclusive() -> anyhow::Result<()> {
        let now: Timestamp = "2025-10-01T12:00:00Z".parse()?;
        let claims = AuthClaims::new("alice", now, SignedDuration::from_mins(30))?;

        assert!(!claims.is_expired_at(now));
        assert!(!claims.is_expired_at(claims.expires_at - SignedDuration::from_secs(1)));
        assert!(claims.is_expired_at(claims.expires_at));
        assert_eq!(claims.remaining_lifetime(now), SignedDuration::from_mins(30));
        assert_eq!(
            claims.remaining_lifetime(claims.expires_at + SignedDuration::from_secs(5)),
            SignedDuration::ZERO
        );
        Ok(())
    }

    #[test]
    fn decode_rejects_foreign_secret() -> anyhow::Result<()> {
        let now = Timestamp::now();
        let claims = AuthClaims::new("alice", now, SignedDuration::from_mins(30))?;
        let token = claims.encode(&keys(TEST_SECRET)?)?;

        let other = keys("fedcba9876543210fedcba9876543210")?;
        assert!(matches!(
            AuthClaims::decode(&token, &other),
            Err(GuardError::InvalidToken)
        ));
        Ok(())
    }

    #[test]
    fn decode_rejects_garbage() -> anyhow::Result<()> {
        let keys = keys(TEST_SECRET)?;
        for token in ["", "garbage", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30."] {
            assert!(matches!(
                AuthClaims::decode(token, &keys),
                Err(GuardError::InvalidToken)
            ));
        }
        Ok(())
    }

    #[test]
    fn decode_accepts_expired_tokens() -> anyhow::Result<()> {
        let keys = keys(TEST_SECRET)?;
        let long_ago: Timestamp = "2001-01-01T00:00:00Z".parse()?;
        let claims = AuthClaims::new("alice", long_ago, SignedDuration::from_mins(1))?;

        let decoded = AuthClaims::decode(&claims.encode(&keys)?, &keys)?;
        assert!(decoded.is_expired_at(Timestamp::now()));
        Ok(())
    }
}
