use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::error::DomainError;
use crate::validate;

/// A named point on the map that routes connect.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Station {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl HasId for Station {}

impl Station {
    /// Field-level gate run before create and update.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate::validate_required_name("name", &self.name)?;
        validate::validate_latitude(self.latitude)?;
        validate::validate_longitude(self.longitude)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_reasonable_station() {
        let station = Station {
            name: "Kiel Hbf".to_owned(),
            latitude: 54.315,
            longitude: 10.132,
        };
        assert!(station.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let station = Station {
            name: "North Pole".to_owned(),
            latitude: 90.0,
            longitude: 0.0,
        };
        assert_eq!(station.validate(), Err(DomainError::LatitudeOutOfRange));

        let station = Station {
            name: "Antimeridian".to_owned(),
            latitude: 0.0,
            longitude: -180.0,
        };
        assert_eq!(station.validate(), Err(DomainError::LongitudeOutOfRange));
    }
}
