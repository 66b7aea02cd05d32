use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::error::DomainError;
use crate::validate;
use crate::WithId;

/// A category of rolling stock, e.g. "Intercity" or "Night sleeper".
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrainType {
    pub name: String,
}

impl HasId for TrainType {}

impl TrainType {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate::validate_required_name("name", &self.name)
    }
}

/// A physical train: `cargo_num` cars with `places_in_cargo` seats each.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Train {
    pub name: String,
    pub cargo_num: i32,
    pub places_in_cargo: i32,
    pub train_type_id: Id<TrainType>,
    /// Media path of the photo, relative to the media root.
    pub image: Option<String>,
}

impl HasId for Train {}

impl Train {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate::validate_required_name("name", &self.name)?;
        validate::validate_positive("cargo_num", self.cargo_num)?;
        validate::validate_positive("places_in_cargo", self.places_in_cargo)?;
        Ok(())
    }

    /// Total seat count. Derived, never stored.
    pub fn capacity(&self) -> i64 {
        self.cargo_num as i64 * self.places_in_cargo as i64
    }
}

/// Read view of a train with its type resolved and capacity spelled out.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct TrainDetail {
    pub name: String,
    pub cargo_num: i32,
    pub places_in_cargo: i32,
    pub capacity: i64,
    pub train_type: WithId<TrainType>,
    pub image: Option<String>,
}

impl HasId for TrainDetail {}

#[cfg(test)]
mod tests {
    use super::*;

    fn train(cargo_num: i32, places_in_cargo: i32) -> Train {
        Train {
            name: "Express".to_owned(),
            cargo_num,
            places_in_cargo,
            train_type_id: Id::new(1),
            image: None,
        }
    }

    #[test]
    fn capacity_is_cargo_times_places() {
        assert_eq!(train(3, 50).capacity(), 150);
        assert_eq!(train(1, 1).capacity(), 1);
    }

    #[test]
    fn capacity_does_not_overflow_i32() {
        assert_eq!(train(i32::MAX, 2).capacity(), i32::MAX as i64 * 2);
    }

    #[test]
    fn counts_must_be_positive() {
        assert_eq!(
            train(0, 50).validate(),
            Err(DomainError::NotPositive { field: "cargo_num" })
        );
        assert_eq!(
            train(3, -1).validate(),
            Err(DomainError::NotPositive {
                field: "places_in_cargo"
            })
        );
        assert!(train(3, 50).validate().is_ok());
    }
}
