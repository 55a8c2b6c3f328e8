//! Request types for HTTP handlers.

mod authentications;
mod messages;
mod paths;
mod users;
mod validations;

pub use authentications::*;
pub use messages::*;
pub use paths::*;
pub use users::*;
pub use validations::*;
