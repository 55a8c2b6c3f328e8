//! Database enumeration types for type-safe queries.
//!
//! Each enumeration corresponds to a PostgreSQL ENUM type defined in the
//! migrations and is usable both in Diesel queries and in API payloads.

pub mod message_status;

pub use message_status::MessageStatus;
