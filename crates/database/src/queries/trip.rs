use chrono::NaiveDate;
use model::{
    crew::Crew,
    trip::{Place, Trip, TripDetail, TripSummary},
    WithId,
};
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use utility::id::Id;

use crate::data_model::{
    crew::CrewRow,
    trip::{PlaceRow, TripRow, TripSummaryRow},
    with_id, with_ids,
};
use crate::error::convert_error;
use crate::{Result, StoreError};

use super::{contains_pattern, push_page, FilterPrefix};

#[derive(Debug, Clone, Default)]
pub struct TripFilter {
    /// Calendar-date equality against the departure timestamp.
    pub departure_date: Option<NaiveDate>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub train_type: Option<String>,
    /// `true` keeps trips with free seats, `false` keeps sold-out trips.
    pub available: Option<bool>,
}

/// `COUNT(DISTINCT ...)` keeps the aggregate correct should the join ever
/// fan out (e.g. through the crew assignment table); a plain COUNT would
/// multiply booked tickets per joined row.
const AVAILABLE: &str =
    "tr.cargo_num::BIGINT * tr.places_in_cargo - COUNT(DISTINCT k.id)";

const FROM_CLAUSE: &str = "
    FROM trips t
    JOIN routes r ON r.id = t.route_id
    JOIN stations ss ON ss.id = r.source_id
    JOIN stations ds ON ds.id = r.destination_id
    JOIN trains tr ON tr.id = t.train_id
    JOIN train_types tt ON tt.id = tr.train_type_id
    LEFT JOIN tickets k ON k.trip_id = t.id";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &TripFilter) {
    let mut prefix = FilterPrefix::new();
    if let Some(date) = filter.departure_date {
        prefix.push(builder);
        builder.push("t.departure_time::date = ");
        builder.push_bind(date);
    }
    if let Some(source) = &filter.source {
        prefix.push(builder);
        builder.push("ss.name ILIKE ");
        builder.push_bind(contains_pattern(source));
    }
    if let Some(destination) = &filter.destination {
        prefix.push(builder);
        builder.push("ds.name ILIKE ");
        builder.push_bind(contains_pattern(destination));
    }
    if let Some(train_type) = &filter.train_type {
        prefix.push(builder);
        builder.push("tt.name ILIKE ");
        builder.push_bind(contains_pattern(train_type));
    }
}

fn push_group_by(builder: &mut QueryBuilder<'_, Postgres>, filter: &TripFilter) {
    builder.push(
        " GROUP BY t.id, ss.name, ds.name, tr.name, tt.name, \
         tr.cargo_num, tr.places_in_cargo",
    );
    match filter.available {
        Some(true) => {
            builder.push(" HAVING ");
            builder.push(AVAILABLE);
            builder.push(" > 0");
        }
        Some(false) => {
            builder.push(" HAVING ");
            builder.push(AVAILABLE);
            builder.push(" = 0");
        }
        None => {}
    }
}

pub async fn list<'c, E>(
    executor: E,
    filter: &TripFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<WithId<TripSummary>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut builder = QueryBuilder::new(
        "SELECT
            t.id,
            ss.name AS source,
            ds.name AS destination,
            tr.name AS train_name,
            tt.name AS train_type,
            t.departure_time,
            t.arrival_time,
            tr.cargo_num::BIGINT * tr.places_in_cargo AS train_capacity, ",
    );
    builder.push(AVAILABLE);
    builder.push(" AS tickets_available");
    builder.push(FROM_CLAUSE);
    push_filters(&mut builder, filter);
    push_group_by(&mut builder, filter);
    builder.push(" ORDER BY t.departure_time, t.id");
    push_page(&mut builder, limit, offset);

    let rows: Vec<TripSummaryRow> = builder
        .build_query_as()
        .fetch_all(executor)
        .await
        .map_err(convert_error)?;
    Ok(with_ids(rows))
}

pub async fn count<'c, E>(executor: E, filter: &TripFilter) -> Result<i64>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM (SELECT t.id");
    builder.push(FROM_CLAUSE);
    push_filters(&mut builder, filter);
    push_group_by(&mut builder, filter);
    builder.push(") AS page");

    let (count,): (i64,) = builder
        .build_query_as()
        .fetch_one(executor)
        .await
        .map_err(convert_error)?;
    Ok(count)
}

pub async fn get<'c, E>(executor: E, id: Id<Trip>) -> Result<WithId<Trip>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, route_id, train_id, departure_time, arrival_time
        FROM trips
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: TripRow| with_id(row))
    .map_err(convert_error)
}

/// All occupied (cargo, seat) slots of a trip, in seating order.
pub async fn taken_places<'c, E>(executor: E, id: Id<Trip>) -> Result<Vec<Place>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<PlaceRow> = sqlx::query_as(
        "
        SELECT cargo, seat
        FROM tickets
        WHERE trip_id = $1
        ORDER BY cargo, seat;
        ",
    )
    .bind(id.raw())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?;
    Ok(rows.into_iter().map(PlaceRow::into_place).collect())
}

pub async fn crew_for_trip<'c, E>(
    executor: E,
    id: Id<Trip>,
) -> Result<Vec<WithId<Crew>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<CrewRow> = sqlx::query_as(
        "
        SELECT c.id, c.first_name, c.last_name, c.image
        FROM crews c
        JOIN trip_crews tc ON tc.crew_id = c.id
        WHERE tc.trip_id = $1
        ORDER BY c.first_name, c.last_name;
        ",
    )
    .bind(id.raw())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?;
    Ok(with_ids(rows))
}

/// Full trip view: resolved route and train, assigned crew and occupied
/// places. Fetching the detail twice without intervening bookings yields
/// identical results.
pub async fn get_detail(pool: &PgPool, id: Id<Trip>) -> Result<WithId<TripDetail>> {
    let trip = get(pool, id).await?;
    let route = super::route::get_detail(pool, trip.content.route).await?;
    let train = super::train::get_detail(pool, trip.content.train).await?;
    let crew = crew_for_trip(pool, id).await?;
    let taken = taken_places(pool, id).await?;

    Ok(WithId::new(
        Id::new(id.raw()),
        TripDetail {
            route,
            train,
            departure_time: trip.content.departure_time,
            arrival_time: trip.content.arrival_time,
            crew,
            taken_places: taken,
        },
    ))
}

/// Inserts the trip and its crew assignment in one transaction.
pub async fn insert(
    pool: &PgPool,
    trip: &Trip,
    crew: &[Id<Crew>],
) -> Result<WithId<Trip>> {
    let mut tx = pool.begin().await.map_err(convert_error)?;

    let row: TripRow = sqlx::query_as(
        "
        INSERT INTO trips(route_id, train_id, departure_time, arrival_time)
        VALUES ($1, $2, $3, $4)
        RETURNING id, route_id, train_id, departure_time, arrival_time;
        ",
    )
    .bind(trip.route.raw())
    .bind(trip.train.raw())
    .bind(trip.departure_time)
    .bind(trip.arrival_time)
    .fetch_one(&mut *tx)
    .await
    .map_err(convert_error)?;

    set_crew(&mut tx, row.id, crew).await?;

    tx.commit().await.map_err(convert_error)?;
    Ok(with_id(row))
}

/// Replaces the trip record and its crew assignment in one transaction.
pub async fn update(
    pool: &PgPool,
    id: Id<Trip>,
    trip: &Trip,
    crew: &[Id<Crew>],
) -> Result<WithId<Trip>> {
    let mut tx = pool.begin().await.map_err(convert_error)?;

    let row: TripRow = sqlx::query_as(
        "
        UPDATE trips
        SET route_id = $1, train_id = $2, departure_time = $3, arrival_time = $4
        WHERE id = $5
        RETURNING id, route_id, train_id, departure_time, arrival_time;
        ",
    )
    .bind(trip.route.raw())
    .bind(trip.train.raw())
    .bind(trip.departure_time)
    .bind(trip.arrival_time)
    .bind(id.raw())
    .fetch_one(&mut *tx)
    .await
    .map_err(convert_error)?;

    sqlx::query("DELETE FROM trip_crews WHERE trip_id = $1;")
        .bind(row.id)
        .execute(&mut *tx)
        .await
        .map_err(convert_error)?;
    set_crew(&mut tx, row.id, crew).await?;

    tx.commit().await.map_err(convert_error)?;
    Ok(with_id(row))
}

async fn set_crew(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    trip_id: i64,
    crew: &[Id<Crew>],
) -> Result<()> {
    for crew_id in crew {
        sqlx::query(
            "
            INSERT INTO trip_crews(trip_id, crew_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING;
            ",
        )
        .bind(trip_id)
        .bind(crew_id.raw())
        .execute(&mut **tx)
        .await
        .map_err(convert_error)?;
    }
    Ok(())
}

pub async fn delete<'c, E>(executor: E, id: Id<Trip>) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM trips WHERE id = $1;")
        .bind(id.raw())
        .execute(executor)
        .await
        .map_err(convert_error)?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}
