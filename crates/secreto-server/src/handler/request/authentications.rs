//! Authentication request types.

use schemars::JsonSchema;
use secreto_postgres::model::NewUser;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::validate_username;

/// Request payload for signup.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
pub struct Signup {
    /// Unique, case-sensitive username.
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    /// Plaintext password; only its hash is stored.
    #[validate(length(min = 8, max = 128))]
    pub password: String,

    /// Optional display name.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub name: Option<String>,

    /// Optional contact email.
    #[serde(default)]
    #[validate(email, length(max = 254))]
    pub email: Option<String>,

    /// Optional contact phone number.
    #[serde(default)]
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
}

impl Signup {
    /// Converts to the database model using an already computed hash.
    pub fn into_model(self, password_hash: String) -> NewUser {
        NewUser {
            username: self.username,
            password_hash,
            name: self.name,
            email: self.email,
            phone_number: self.phone_number,
            ..Default::default()
        }
    }
}

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
pub struct Login {
    /// Username of the account.
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    /// Password of the account.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, password: &str) -> Signup {
        Signup {
            username: username.to_owned(),
            password: password.to_owned(),
            name: None,
            email: None,
            phone_number: None,
        }
    }

    #[test]
    fn valid_signup() {
        assert!(signup("neo", "trinity123").validate().is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(signup("neo", "short").validate().is_err());
    }

    #[test]
    fn malformed_username_is_rejected() {
        assert!(signup("neo anderson", "trinity123").validate().is_err());
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut request = signup("neo", "trinity123");
        request.email = Some("not-an-email".to_owned());
        assert!(request.validate().is_err());
    }

    #[test]
    fn into_model_keeps_profile_fields() {
        let mut request = signup("neo", "trinity123");
        request.name = Some("Thomas Anderson".to_owned());

        let model = request.into_model("$argon2id$stub".to_owned());
        assert_eq!(model.username, "neo");
        assert_eq!(model.password_hash, "$argon2id$stub");
        assert_eq!(model.name.as_deref(), Some("Thomas Anderson"));
        assert!(model.bio.is_none());
    }
}
