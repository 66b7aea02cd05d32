use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::error::DomainError;
use crate::station::Station;
use crate::validate;
use crate::WithId;

/// A directed connection between two stations. The (source, destination)
/// pair is unique; the reverse direction is a separate route.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Route {
    pub source: Id<Station>,
    pub destination: Id<Station>,
    pub distance: f64,
}

impl HasId for Route {}

impl Route {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate::validate_distinct_stations(self.source, self.destination)?;
        validate::validate_distance(self.distance)?;
        Ok(())
    }
}

/// Read view of a route with both endpoints resolved.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct RouteDetail {
    pub source: WithId<Station>,
    pub destination: WithId<Station>,
    pub distance: f64,
}

impl HasId for RouteDetail {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_endpoints_are_rejected() {
        let route = Route {
            source: Id::new(3),
            destination: Id::new(3),
            distance: 0.0,
        };
        assert_eq!(route.validate(), Err(DomainError::SameSourceDestination));
    }

    #[test]
    fn negative_distance_is_rejected() {
        let route = Route {
            source: Id::new(1),
            destination: Id::new(2),
            distance: -5.0,
        };
        assert_eq!(route.validate(), Err(DomainError::NegativeDistance));
    }

    #[test]
    fn zero_distance_is_fine() {
        let route = Route {
            source: Id::new(1),
            destination: Id::new(2),
            distance: 0.0,
        };
        assert!(route.validate().is_ok());
    }
}
