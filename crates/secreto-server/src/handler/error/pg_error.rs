//! Database error to HTTP error conversion.
//!
//! Named constraint violations become client errors with a precise message.
//! Everything else is a `500` whose detail only reaches the logs.

use secreto_postgres::PgError;
use secreto_postgres::types::{
    ConstraintViolation, FavoriteConstraints, MessageConstraints, UserConstraints,
};

use crate::handler::{Error, ErrorKind};

/// Tracing target for database error conversion.
const TRACING_TARGET: &str = "secreto_server::postgres_constraints";

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        match constraint {
            ConstraintViolation::User(c) => c.into(),
            ConstraintViolation::Message(c) => c.into(),
            ConstraintViolation::Favorite(c) => c.into(),
        }
    }
}

impl From<UserConstraints> for Error<'static> {
    fn from(c: UserConstraints) -> Self {
        let error = match c {
            UserConstraints::UsernameUnique => {
                ErrorKind::BadRequest.with_message("Username already registered")
            }
            UserConstraints::UsernameLength => {
                ErrorKind::BadRequest.with_message("Username must be between 1 and 64 characters")
            }
            UserConstraints::UsernameFormat => ErrorKind::BadRequest
                .with_message("Username may contain only letters, digits, '_', '.' and '-'"),
            UserConstraints::NameLength => {
                ErrorKind::BadRequest.with_message("Name is too long")
            }
            UserConstraints::EmailLength => {
                ErrorKind::BadRequest.with_message("Email address is too long")
            }
            UserConstraints::PhoneNumberLength => {
                ErrorKind::BadRequest.with_message("Phone number is too long")
            }
            UserConstraints::BioLength => ErrorKind::BadRequest.with_message("Bio is too long"),
            UserConstraints::AvatarUrlLength => {
                ErrorKind::BadRequest.with_message("Avatar URL is too long")
            }
            UserConstraints::PasswordHashNotEmpty => ErrorKind::InternalServerError.into_error(),
        };

        error.with_resource("user")
    }
}

impl From<MessageConstraints> for Error<'static> {
    fn from(c: MessageConstraints) -> Self {
        let error = match c {
            MessageConstraints::ContentLength => ErrorKind::BadRequest
                .with_message("Message content must be between 1 and 4096 characters"),
            MessageConstraints::ReceiverExists => {
                ErrorKind::NotFound.with_message("User not found")
            }
        };

        error.with_resource("message")
    }
}

impl From<FavoriteConstraints> for Error<'static> {
    fn from(c: FavoriteConstraints) -> Self {
        let error = match c {
            FavoriteConstraints::NotSelf => {
                ErrorKind::BadRequest.with_message("Cannot add yourself to favorites")
            }
            FavoriteConstraints::UserPairUnique => {
                ErrorKind::BadRequest.with_message("Already previously added")
            }
            FavoriteConstraints::UserExists | FavoriteConstraints::FavoriteUserExists => {
                ErrorKind::NotFound.with_message("User not found")
            }
        };

        error.with_resource("favorite")
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        match error {
            PgError::Config(config_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %config_error,
                    "database configuration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Timeout(timeout) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    timeout = ?timeout,
                    "database timeout",
                );
                ErrorKind::ServiceUnavailable.into_error()
            }
            PgError::Connection(connection_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %connection_error,
                    "database connection error"
                );
                ErrorKind::ServiceUnavailable.into_error()
            }
            PgError::Migration(migration_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %migration_error,
                    "database migration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Query(ref query_error) => {
                if let Some(constraint_name) = error.constraint()
                    && let Some(constraint) = ConstraintViolation::new(constraint_name)
                {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        constraint = constraint_name,
                        "query error (constraint violation)"
                    );
                    return constraint.into();
                }

                tracing::error!(
                    target: TRACING_TARGET,
                    error = %query_error,
                    "query error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Unexpected(unexpected_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %unexpected_error,
                    "unexpected database error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use secreto_postgres::error::TimeoutType;

    use super::*;

    #[test]
    fn duplicate_username_is_bad_request() {
        let error: Error = ConstraintViolation::User(UserConstraints::UsernameUnique).into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), Some("Username already registered"));
        assert_eq!(error.resource(), Some("user"));
    }

    #[test]
    fn favorite_violations_map_to_client_errors() {
        let error: Error = FavoriteConstraints::UserPairUnique.into();
        assert_eq!(error.message(), Some("Already previously added"));

        let error: Error = FavoriteConstraints::NotSelf.into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);

        let error: Error = FavoriteConstraints::FavoriteUserExists.into();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("User not found"));
    }

    #[test]
    fn unknown_receiver_is_not_found() {
        let error: Error = MessageConstraints::ReceiverExists.into();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("User not found"));
    }

    #[test]
    fn infrastructure_failures_hide_details() {
        let error: Error = PgError::Timeout(TimeoutType::Wait).into();
        assert_eq!(error.kind(), ErrorKind::ServiceUnavailable);
        assert!(error.message().is_none());

        let error: Error = PgError::Unexpected("pool exploded".into()).into();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert!(error.context().is_none());
    }
}
