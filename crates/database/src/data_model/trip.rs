use chrono::{DateTime, Utc};
use model::trip::{Place, Trip, TripSummary};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::EntityRow;

#[derive(Debug, Clone, FromRow)]
pub struct TripRow {
    pub id: i64,
    pub route_id: i64,
    pub train_id: i64,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

impl EntityRow for TripRow {
    type Model = Trip;

    fn id(&self) -> Id<Trip> {
        Id::new(self.id)
    }

    fn into_model(self) -> Trip {
        Trip {
            route: Id::new(self.route_id),
            train: Id::new(self.train_id),
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
        }
    }
}

/// A trip joined with its route endpoints and train, carrying the seat
/// availability aggregate.
#[derive(Debug, Clone, FromRow)]
pub struct TripSummaryRow {
    pub id: i64,
    pub source: String,
    pub destination: String,
    pub train_name: String,
    pub train_type: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub train_capacity: i64,
    pub tickets_available: i64,
}

impl EntityRow for TripSummaryRow {
    type Model = TripSummary;

    fn id(&self) -> Id<TripSummary> {
        Id::new(self.id)
    }

    fn into_model(self) -> TripSummary {
        TripSummary {
            source: self.source,
            destination: self.destination,
            train_name: self.train_name,
            train_type: self.train_type,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            train_capacity: self.train_capacity,
            tickets_available: self.tickets_available,
        }
    }
}

#[derive(Debug, Clone, Copy, FromRow)]
pub struct PlaceRow {
    pub cargo: i32,
    pub seat: i32,
}

impl PlaceRow {
    pub fn into_place(self) -> Place {
        Place {
            cargo: self.cargo,
            seat: self.seat,
        }
    }
}
