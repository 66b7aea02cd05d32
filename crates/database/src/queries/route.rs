use model::{
    route::{Route, RouteDetail},
    WithId,
};
use sqlx::{Executor, Postgres, QueryBuilder};
use utility::id::Id;

use crate::data_model::{
    route::{RouteDetailRow, RouteRow},
    with_id, with_ids,
};
use crate::error::convert_error;
use crate::{Result, StoreError};

use super::{contains_pattern, push_page, FilterPrefix};

#[derive(Debug, Clone, Default)]
pub struct RouteFilter {
    pub source: Option<String>,
    pub destination: Option<String>,
}

const DETAIL_COLUMNS: &str = "
    r.id,
    r.source_id, ss.name AS source_name,
    ss.latitude AS source_latitude, ss.longitude AS source_longitude,
    r.destination_id, ds.name AS destination_name,
    ds.latitude AS destination_latitude, ds.longitude AS destination_longitude,
    r.distance";

const FROM_CLAUSE: &str = "
    FROM routes r
    JOIN stations ss ON ss.id = r.source_id
    JOIN stations ds ON ds.id = r.destination_id";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &RouteFilter) {
    let mut prefix = FilterPrefix::new();
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
}

pub async fn list_detail<'c, E>(
    executor: E,
    filter: &RouteFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<WithId<RouteDetail>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut builder = QueryBuilder::new("SELECT");
    builder.push(DETAIL_COLUMNS);
    builder.push(FROM_CLAUSE);
    push_filters(&mut builder, filter);
    builder.push(" ORDER BY ss.name, ds.name");
    push_page(&mut builder, limit, offset);

    let rows: Vec<RouteDetailRow> = builder
        .build_query_as()
        .fetch_all(executor)
        .await
        .map_err(convert_error)?;
    Ok(with_ids(rows))
}

pub async fn count<'c, E>(executor: E, filter: &RouteFilter) -> Result<i64>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut builder = QueryBuilder::new("SELECT COUNT(*)");
    builder.push(FROM_CLAUSE);
    push_filters(&mut builder, filter);

    let (count,): (i64,) = builder
        .build_query_as()
        .fetch_one(executor)
        .await
        .map_err(convert_error)?;
    Ok(count)
}

pub async fn get<'c, E>(executor: E, id: Id<Route>) -> Result<WithId<Route>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, source_id, destination_id, distance
        FROM routes
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: RouteRow| with_id(row))
    .map_err(convert_error)
}

pub async fn get_detail<'c, E>(
    executor: E,
    id: Id<Route>,
) -> Result<WithId<RouteDetail>>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut builder = QueryBuilder::new("SELECT");
    builder.push(DETAIL_COLUMNS);
    builder.push(FROM_CLAUSE);
    builder.push(" WHERE r.id = ");
    builder.push_bind(id.raw());

    builder
        .build_query_as()
        .fetch_one(executor)
        .await
        .map(|row: RouteDetailRow| with_id(row))
        .map_err(convert_error)
}

pub async fn insert<'c, E>(executor: E, route: &Route) -> Result<WithId<Route>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO routes(source_id, destination_id, distance)
        VALUES ($1, $2, $3)
        RETURNING id, source_id, destination_id, distance;
        ",
    )
    .bind(route.source.raw())
    .bind(route.destination.raw())
    .bind(route.distance)
    .fetch_one(executor)
    .await
    .map(|row: RouteRow| with_id(row))
    .map_err(convert_error)
}

pub async fn update<'c, E>(
    executor: E,
    id: Id<Route>,
    route: &Route,
) -> Result<WithId<Route>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE routes
        SET source_id = $1, destination_id = $2, distance = $3
        WHERE id = $4
        RETURNING id, source_id, destination_id, distance;
        ",
    )
    .bind(route.source.raw())
    .bind(route.destination.raw())
    .bind(route.distance)
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: RouteRow| with_id(row))
    .map_err(convert_error)
}

pub async fn delete<'c, E>(executor: E, id: Id<Route>) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM routes WHERE id = $1;")
        .bind(id.raw())
        .execute(executor)
        .await
        .map_err(convert_error)?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}
