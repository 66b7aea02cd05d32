use std::collections::BTreeMap;

use model::{
    order::{self, BookedTicket, Order, OrderSummary, TicketRequest},
    train::Train,
    user::User,
    validate, DomainError, WithId,
};
use sqlx::{Executor, PgPool, Postgres};
use utility::id::Id;

use crate::data_model::{
    order::{OrderRow, OrderTicketRow},
    train::TrainRow,
    with_id, EntityRow,
};
use crate::error::{convert_error, TICKET_CONFLICT};
use crate::{Result, StoreError};

const TICKET_COLUMNS: &str = "
    SELECT
        k.order_id,
        k.id AS ticket_id,
        k.cargo,
        k.seat,
        k.trip_id,
        ss.name AS source,
        ds.name AS destination,
        t.departure_time,
        t.arrival_time,
        tr.name AS train_name
    FROM tickets k
    JOIN trips t ON t.id = k.trip_id
    JOIN routes r ON r.id = t.route_id
    JOIN stations ss ON ss.id = r.source_id
    JOIN stations ds ON ds.id = r.destination_id
    JOIN trains tr ON tr.id = t.train_id";

/// Books an order: one transaction that creates the order row and every
/// requested ticket, or nothing at all.
///
/// Each request is validated against the bounds of the train actually
/// running the trip before its row is written. A seat already taken -- by a
/// previous order or by a concurrent one -- surfaces as a conflict from the
/// (trip, cargo, seat) unique constraint, and the transaction rolls back
/// without leaving a dangling order.
pub async fn create(
    pool: &PgPool,
    user: Id<User>,
    requests: &[TicketRequest],
) -> Result<Id<Order>> {
    if requests.is_empty() {
        return Err(DomainError::EmptyTicketList.into());
    }
    if order::duplicate_in_batch(requests).is_some() {
        return Err(StoreError::Conflict(TICKET_CONFLICT.to_owned()));
    }

    let mut tx = pool.begin().await.map_err(convert_error)?;

    let order: OrderRow =
        sqlx::query_as("INSERT INTO orders(user_id) VALUES ($1) RETURNING id, user_id, created_at;")
            .bind(user.raw())
            .fetch_one(&mut *tx)
            .await
            .map_err(convert_error)?;

    for request in requests {
        let train = train_for_trip(&mut *tx, request.trip).await?;
        validate::validate_ticket_bounds(request.cargo, request.seat, &train.content)?;

        sqlx::query(
            "
            INSERT INTO tickets(cargo, seat, trip_id, order_id)
            VALUES ($1, $2, $3, $4);
            ",
        )
        .bind(request.cargo)
        .bind(request.seat)
        .bind(request.trip.raw())
        .bind(order.id)
        .execute(&mut *tx)
        .await
        .map_err(convert_error)?;
    }

    tx.commit().await.map_err(convert_error)?;
    tracing::debug!(
        "booked order {} with {} tickets for user {}",
        order.id,
        requests.len(),
        user
    );
    Ok(order.id())
}

/// The train that runs the given trip.
async fn train_for_trip<'c, E>(executor: E, trip: Id<model::trip::Trip>) -> Result<WithId<Train>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT tr.id, tr.name, tr.cargo_num, tr.places_in_cargo,
               tr.train_type_id, tr.image
        FROM trains tr
        JOIN trips t ON t.train_id = tr.id
        WHERE t.id = $1;
        ",
    )
    .bind(trip.raw())
    .fetch_one(executor)
    .await
    .map(|row: TrainRow| with_id(row))
    .map_err(convert_error)
}

pub async fn count_for_user<'c, E>(executor: E, user: Id<User>) -> Result<i64>
where
    E: Executor<'c, Database = Postgres>,
{
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = $1;")
            .bind(user.raw())
            .fetch_one(executor)
            .await
            .map_err(convert_error)?;
    Ok(count)
}

/// A page of the user's orders, newest first, each with its tickets
/// resolved against their trips.
pub async fn list_for_user(
    pool: &PgPool,
    user: Id<User>,
    limit: i64,
    offset: i64,
) -> Result<Vec<WithId<OrderSummary>>> {
    let orders: Vec<OrderRow> = sqlx::query_as(
        "
        SELECT id, user_id, created_at
        FROM orders
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3;
        ",
    )
    .bind(user.raw())
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(convert_error)?;

    let order_ids: Vec<i64> = orders.iter().map(|order| order.id).collect();
    let mut query = String::from(TICKET_COLUMNS);
    query.push_str(
        "
        WHERE k.order_id = ANY($1)
        ORDER BY k.trip_id, k.cargo, k.seat;",
    );
    let tickets: Vec<OrderTicketRow> = sqlx::query_as(&query)
        .bind(&order_ids)
        .fetch_all(pool)
        .await
        .map_err(convert_error)?;

    let mut by_order: BTreeMap<i64, Vec<BookedTicket>> = BTreeMap::new();
    for ticket in tickets {
        by_order
            .entry(ticket.order_id)
            .or_default()
            .push(ticket.into_booked_ticket());
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let tickets = by_order.remove(&order.id).unwrap_or_default();
            WithId::new(
                Id::new(order.id),
                OrderSummary {
                    created_at: order.created_at,
                    tickets,
                },
            )
        })
        .collect())
}

/// A single order of the user, with its tickets resolved.
pub async fn get_for_user(
    pool: &PgPool,
    user: Id<User>,
    id: Id<Order>,
) -> Result<WithId<OrderSummary>> {
    let order: OrderRow = sqlx::query_as(
        "
        SELECT id, user_id, created_at
        FROM orders
        WHERE id = $1 AND user_id = $2;
        ",
    )
    .bind(id.raw())
    .bind(user.raw())
    .fetch_one(pool)
    .await
    .map_err(convert_error)?;

    let mut query = String::from(TICKET_COLUMNS);
    query.push_str(
        "
        WHERE k.order_id = $1
        ORDER BY k.trip_id, k.cargo, k.seat;",
    );
    let tickets: Vec<OrderTicketRow> = sqlx::query_as(&query)
        .bind(order.id)
        .fetch_all(pool)
        .await
        .map_err(convert_error)?;

    Ok(WithId::new(
        Id::new(order.id),
        OrderSummary {
            created_at: order.created_at,
            tickets: tickets
                .into_iter()
                .map(OrderTicketRow::into_booked_ticket)
                .collect(),
        },
    ))
}
