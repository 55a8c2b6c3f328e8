//! Database models for all entities in the system.
//!
//! This module contains Diesel model definitions for all database tables,
//! including structs for querying, inserting, and updating records.

mod favorite;
mod message;
mod user;

pub use favorite::{Favorite, NewFavorite};
pub use message::{Message, NewMessage, UpdateMessage};
pub use user::{NewUser, UpdateUser, User};
