use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::error::DomainError;
use crate::validate;

/// A crew member that can be assigned to trips.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Crew {
    pub first_name: String,
    pub last_name: String,
    /// Media path of the portrait, relative to the media root.
    pub image: Option<String>,
}

impl HasId for Crew {}

impl Crew {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate::validate_person_name("first_name", &self.first_name)?;
        validate::validate_person_name("last_name", &self.last_name)?;
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabetic_names_pass() {
        let crew = Crew {
            first_name: "Maja".to_owned(),
            last_name: "Sørensen".to_owned(),
            image: None,
        };
        assert!(crew.validate().is_ok());
        assert_eq!(crew.full_name(), "Maja Sørensen");
    }

    #[test]
    fn digits_and_punctuation_fail() {
        let crew = Crew {
            first_name: "Anna2".to_owned(),
            last_name: "Smith".to_owned(),
            image: None,
        };
        assert_eq!(
            crew.validate(),
            Err(DomainError::NonAlphabeticName {
                field: "first_name"
            })
        );

        let crew = Crew {
            first_name: "Anna".to_owned(),
            last_name: "O'Brien".to_owned(),
            image: None,
        };
        assert_eq!(
            crew.validate(),
            Err(DomainError::NonAlphabeticName { field: "last_name" })
        );
    }
}
