use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::crew::Crew;
use crate::error::DomainError;
use crate::route::{Route, RouteDetail};
use crate::train::{Train, TrainDetail};
use crate::validate;
use crate::WithId;

/// A scheduled run of a train over a route between two timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Trip {
    pub route: Id<Route>,
    pub train: Id<Train>,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

impl HasId for Trip {}

impl Trip {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate::validate_time_order(self.departure_time, self.arrival_time)
    }
}

/// List view of a trip: resolved display names plus the derived seat count
/// that is still bookable.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct TripSummary {
    pub source: String,
    pub destination: String,
    pub train_name: String,
    pub train_type: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub train_capacity: i64,
    pub tickets_available: i64,
}

impl HasId for TripSummary {}

/// A single occupied (cargo, seat) slot on a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Place {
    pub cargo: i32,
    pub seat: i32,
}

/// Detail view of a trip: fully resolved route and train, assigned crew and
/// the places already taken.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct TripDetail {
    pub route: WithId<RouteDetail>,
    pub train: WithId<TrainDetail>,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub crew: Vec<WithId<Crew>>,
    pub taken_places: Vec<Place>,
}

impl HasId for TripDetail {}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn time_order_is_enforced() {
        let trip = Trip {
            route: Id::new(1),
            train: Id::new(1),
            departure_time: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            arrival_time: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        };
        assert_eq!(trip.validate(), Err(DomainError::DepartureNotBeforeArrival));
    }

    #[test]
    fn forward_in_time_passes() {
        let trip = Trip {
            route: Id::new(1),
            train: Id::new(1),
            departure_time: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            arrival_time: Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(),
        };
        assert!(trip.validate().is_ok());
    }
}
