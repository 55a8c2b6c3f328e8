//! Contains constraints, enumerations and other custom types.

mod constraints;
mod enums;

pub use constraints::{
    ConstraintCategory, ConstraintViolation, FavoriteConstraints, MessageConstraints,
    UserConstraints,
};
pub use enums::MessageStatus;
