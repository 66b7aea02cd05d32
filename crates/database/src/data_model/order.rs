use chrono::{DateTime, Utc};
use model::order::{BookedTicket, Order, Ticket, TicketTrip};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::EntityRow;

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl EntityRow for OrderRow {
    type Model = Order;

    fn id(&self) -> Id<Order> {
        Id::new(self.id)
    }

    fn into_model(self) -> Order {
        Order {
            user: Id::new(self.user_id),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TicketRow {
    pub id: i64,
    pub cargo: i32,
    pub seat: i32,
    pub trip_id: i64,
    pub order_id: i64,
}

impl EntityRow for TicketRow {
    type Model = Ticket;

    fn id(&self) -> Id<Ticket> {
        Id::new(self.id)
    }

    fn into_model(self) -> Ticket {
        Ticket {
            cargo: self.cargo,
            seat: self.seat,
            trip: Id::new(self.trip_id),
            order: Id::new(self.order_id),
        }
    }
}

/// A ticket joined with its trip, keyed by the order it belongs to. Used to
/// assemble nested order listings from one query.
#[derive(Debug, Clone, FromRow)]
pub struct OrderTicketRow {
    pub order_id: i64,
    pub ticket_id: i64,
    pub cargo: i32,
    pub seat: i32,
    pub trip_id: i64,
    pub source: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub train_name: String,
}

impl OrderTicketRow {
    pub fn into_booked_ticket(self) -> BookedTicket {
        BookedTicket {
            id: Id::new(self.ticket_id),
            cargo: self.cargo,
            seat: self.seat,
            trip: TicketTrip {
                id: Id::new(self.trip_id),
                source: self.source,
                destination: self.destination,
                departure_time: self.departure_time,
                arrival_time: self.arrival_time,
                train_name: self.train_name,
            },
        }
    }
}
