//! Time source for token issuance and expiry checks.

use std::fmt;

use jiff::Timestamp;

/// Source of the current time.
///
/// Token expiry is computed against this clock instead of the system time
/// directly, so tests can move time forward deterministically.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Timestamp;
}

/// [`Clock`] backed by the operating system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// [`Clock`] frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl FixedClock {
    /// Creates a clock that always returns `now`.
    #[inline]
    pub const fn new(now: Timestamp) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    #[inline]
    fn now(&self) -> Timestamp {
        self.0
    }
}
