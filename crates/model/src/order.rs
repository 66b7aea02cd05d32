use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::trip::Trip;
use crate::user::User;

/// A batch of tickets purchased together. Orders are append-only: once
/// created they are never updated or deleted through the API.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Order {
    #[serde(skip)]
    pub user: Id<User>,
    pub created_at: DateTime<Utc>,
}

impl HasId for Order {}

/// A reservation of one (cargo, seat) slot on a trip.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Ticket {
    pub cargo: i32,
    pub seat: i32,
    pub trip: Id<Trip>,
    #[serde(skip)]
    pub order: Id<Order>,
}

impl HasId for Ticket {}

/// Read view of an order with every booked ticket resolved against its
/// trip.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct OrderSummary {
    pub created_at: DateTime<Utc>,
    pub tickets: Vec<BookedTicket>,
}

impl HasId for OrderSummary {}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct BookedTicket {
    pub id: Id<Ticket>,
    pub cargo: i32,
    pub seat: i32,
    pub trip: TicketTrip,
}

/// The slice of trip data shown on a booked ticket.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct TicketTrip {
    pub id: Id<Trip>,
    pub source: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub train_name: String,
}

/// One requested slot inside a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct TicketRequest {
    pub cargo: i32,
    pub seat: i32,
    pub trip: Id<Trip>,
}

/// Finds the first request that repeats an earlier (trip, cargo, seat)
/// triple within the same batch. The storage unique constraint would catch
/// this too, but checking up front gives a deterministic answer before any
/// row is written.
pub fn duplicate_in_batch(requests: &[TicketRequest]) -> Option<TicketRequest> {
    for (index, request) in requests.iter().enumerate() {
        if requests[..index].contains(request) {
            return Some(*request);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(cargo: i32, seat: i32, trip: i64) -> TicketRequest {
        TicketRequest {
            cargo,
            seat,
            trip: Id::new(trip),
        }
    }

    #[test]
    fn distinct_batch_has_no_duplicate() {
        let batch = [request(1, 1, 5), request(1, 2, 5), request(1, 1, 6)];
        assert_eq!(duplicate_in_batch(&batch), None);
    }

    #[test]
    fn repeated_triple_is_found() {
        let batch = [request(1, 1, 5), request(2, 10, 5), request(1, 1, 5)];
        assert_eq!(duplicate_in_batch(&batch), Some(request(1, 1, 5)));
    }

    #[test]
    fn same_seat_on_other_trip_is_allowed() {
        let batch = [request(1, 1, 5), request(1, 1, 7)];
        assert_eq!(duplicate_in_batch(&batch), None);
    }

    #[test]
    fn empty_batch() {
        assert_eq!(duplicate_in_batch(&[]), None);
    }
}
