//! Security primitives behind the credential and session guard.
//!
//! Password hashing, token signing keys and the injectable clock.

mod clock;
mod password_hasher;
mod session_keys;

pub use clock::{Clock, FixedClock, SystemClock};
pub use password_hasher::PasswordHasher;
pub use session_keys::{SessionKeys, SessionKeysConfig, SigningAlgorithm};
