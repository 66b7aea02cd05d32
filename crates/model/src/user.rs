use schemars::JsonSchema;
use serde::Serialize;
use utility::id::HasId;

use crate::error::DomainError;
use crate::validate;

pub const PASSWORD_MIN_LEN: usize = 5;
pub const EMAIL_MAX_LEN: usize = 254;

/// An account. The password digest never leaves the process boundary.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct User {
    pub email: String,
    #[serde(skip)]
    pub password_digest: String,
    pub is_staff: bool,
}

impl HasId for User {}

/// Gate for registration input, run before the digest is computed.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), DomainError> {
    if email.trim().is_empty() {
        return Err(DomainError::Blank { field: "email" });
    }
    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(DomainError::TooLong {
            field: "email",
            max: EMAIL_MAX_LEN,
        });
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(DomainError::TooShort {
            field: "password",
            min: PASSWORD_MIN_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_is_rejected() {
        assert_eq!(
            validate_credentials("test@test.com", "12"),
            Err(DomainError::TooShort {
                field: "password",
                min: PASSWORD_MIN_LEN
            })
        );
        assert!(validate_credentials("test@test.com", "test123test").is_ok());
    }

    #[test]
    fn blank_email_is_rejected() {
        assert_eq!(
            validate_credentials("  ", "test123test"),
            Err(DomainError::Blank { field: "email" })
        );
    }

    #[test]
    fn password_never_serializes() {
        let user = User {
            email: "user@test.com".to_owned(),
            password_digest: "secret".to_owned(),
            is_staff: false,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("password"));
    }
}
