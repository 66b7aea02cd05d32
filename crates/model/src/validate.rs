//! Pure, side-effect-free validation gates.
//!
//! These run before every create *and* update, so an update that would break
//! an invariant is rejected the same way as a create. Uniqueness is not
//! checked here; that is the database's job and surfaces as a conflict.

use chrono::{DateTime, Utc};
use utility::id::{HasId, Id};

use crate::error::DomainError;
use crate::train::Train;

pub const NAME_MAX_LEN: usize = 63;

/// Latitude is valid strictly inside (-90, 90); the poles themselves are
/// rejected.
pub fn validate_latitude(value: f64) -> Result<(), DomainError> {
    if -90.0 < value && value < 90.0 {
        Ok(())
    } else {
        Err(DomainError::LatitudeOutOfRange)
    }
}

/// Longitude is valid strictly inside (-180, 180).
pub fn validate_longitude(value: f64) -> Result<(), DomainError> {
    if -180.0 < value && value < 180.0 {
        Ok(())
    } else {
        Err(DomainError::LongitudeOutOfRange)
    }
}

pub fn validate_required_name(
    field: &'static str,
    value: &str,
) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Blank { field });
    }
    if value.chars().count() > NAME_MAX_LEN {
        return Err(DomainError::TooLong {
            field,
            max: NAME_MAX_LEN,
        });
    }
    Ok(())
}

/// Person names must be purely alphabetic.
pub fn validate_person_name(
    field: &'static str,
    value: &str,
) -> Result<(), DomainError> {
    validate_required_name(field, value)?;
    if value.chars().all(|c| c.is_alphabetic()) {
        Ok(())
    } else {
        Err(DomainError::NonAlphabeticName { field })
    }
}

pub fn validate_distinct_stations<S: HasId>(
    source: Id<S>,
    destination: Id<S>,
) -> Result<(), DomainError> {
    if source == destination {
        Err(DomainError::SameSourceDestination)
    } else {
        Ok(())
    }
}

pub fn validate_distance(distance: f64) -> Result<(), DomainError> {
    if distance < 0.0 || !distance.is_finite() {
        Err(DomainError::NegativeDistance)
    } else {
        Ok(())
    }
}

pub fn validate_time_order(
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
) -> Result<(), DomainError> {
    if departure < arrival {
        Ok(())
    } else {
        Err(DomainError::DepartureNotBeforeArrival)
    }
}

pub fn validate_positive(field: &'static str, value: i32) -> Result<(), DomainError> {
    if value > 0 {
        Ok(())
    } else {
        Err(DomainError::NotPositive { field })
    }
}

/// A ticket must name a cargo within the train's cargo count and a seat
/// within the per-cargo place count.
pub fn validate_ticket_bounds(
    cargo: i32,
    seat: i32,
    train: &Train,
) -> Result<(), DomainError> {
    for (value, field, max) in [
        (cargo, "cargo", train.cargo_num),
        (seat, "seat", train.places_in_cargo),
    ] {
        if !(1 <= value && value <= max) {
            return Err(DomainError::TicketOutOfBounds { field, max });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

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
    fn latitude_boundaries_are_exclusive() {
        assert!(validate_latitude(0.0).is_ok());
        assert!(validate_latitude(89.999).is_ok());
        assert!(validate_latitude(-89.999).is_ok());
        assert_eq!(
            validate_latitude(90.0),
            Err(DomainError::LatitudeOutOfRange)
        );
        assert_eq!(
            validate_latitude(-90.0),
            Err(DomainError::LatitudeOutOfRange)
        );
        assert_eq!(
            validate_latitude(120.5),
            Err(DomainError::LatitudeOutOfRange)
        );
    }

    #[test]
    fn longitude_boundaries_are_exclusive() {
        assert!(validate_longitude(0.0).is_ok());
        assert!(validate_longitude(179.999).is_ok());
        assert_eq!(
            validate_longitude(180.0),
            Err(DomainError::LongitudeOutOfRange)
        );
        assert_eq!(
            validate_longitude(-180.0),
            Err(DomainError::LongitudeOutOfRange)
        );
    }

    #[test]
    fn person_names_must_be_alphabetic() {
        assert!(validate_person_name("first_name", "Anna").is_ok());
        assert!(validate_person_name("first_name", "Åsa").is_ok());
        assert_eq!(
            validate_person_name("first_name", "R2D2"),
            Err(DomainError::NonAlphabeticName {
                field: "first_name"
            })
        );
        assert_eq!(
            validate_person_name("last_name", ""),
            Err(DomainError::Blank { field: "last_name" })
        );
    }

    #[test]
    fn names_have_a_length_cap() {
        let long = "x".repeat(NAME_MAX_LEN + 1);
        assert_eq!(
            validate_required_name("name", &long),
            Err(DomainError::TooLong {
                field: "name",
                max: NAME_MAX_LEN
            })
        );
        assert!(validate_required_name("name", &"x".repeat(NAME_MAX_LEN)).is_ok());
    }

    #[test]
    fn route_endpoints_must_differ() {
        let a: Id<crate::station::Station> = Id::new(1);
        let b: Id<crate::station::Station> = Id::new(2);
        assert!(validate_distinct_stations(a, b).is_ok());
        assert_eq!(
            validate_distinct_stations(a, a),
            Err(DomainError::SameSourceDestination)
        );
    }

    #[test]
    fn distance_must_not_be_negative() {
        assert!(validate_distance(0.0).is_ok());
        assert!(validate_distance(120.5).is_ok());
        assert_eq!(
            validate_distance(-1.0),
            Err(DomainError::NegativeDistance)
        );
        assert_eq!(
            validate_distance(f64::NAN),
            Err(DomainError::NegativeDistance)
        );
    }

    #[test]
    fn departure_must_be_before_arrival() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert!(validate_time_order(early, late).is_ok());
        assert_eq!(
            validate_time_order(late, early),
            Err(DomainError::DepartureNotBeforeArrival)
        );
        // equal timestamps are rejected as well
        assert_eq!(
            validate_time_order(early, early),
            Err(DomainError::DepartureNotBeforeArrival)
        );
    }

    #[test]
    fn ticket_bounds_follow_the_train() {
        let train = train(3, 50);
        assert!(validate_ticket_bounds(1, 1, &train).is_ok());
        assert!(validate_ticket_bounds(3, 50, &train).is_ok());
        assert_eq!(
            validate_ticket_bounds(0, 1, &train),
            Err(DomainError::TicketOutOfBounds {
                field: "cargo",
                max: 3
            })
        );
        assert_eq!(
            validate_ticket_bounds(4, 1, &train),
            Err(DomainError::TicketOutOfBounds {
                field: "cargo",
                max: 3
            })
        );
        assert_eq!(
            validate_ticket_bounds(2, 51, &train),
            Err(DomainError::TicketOutOfBounds {
                field: "seat",
                max: 50
            })
        );
    }
}
