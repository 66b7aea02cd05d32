use model::{station::Station, WithId};
use sqlx::{Executor, Postgres, QueryBuilder};
use utility::id::Id;

use crate::data_model::{station::StationRow, with_id, with_ids};
use crate::error::convert_error;
use crate::Result;

use super::{contains_pattern, push_page, FilterPrefix};

#[derive(Debug, Clone, Default)]
pub struct StationFilter {
    pub name: Option<String>,
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &StationFilter) {
    let mut prefix = FilterPrefix::new();
    if let Some(name) = &filter.name {
        prefix.push(builder);
        builder.push("name ILIKE ");
        builder.push_bind(contains_pattern(name));
    }
}

pub async fn list<'c, E>(
    executor: E,
    filter: &StationFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<WithId<Station>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut builder =
        QueryBuilder::new("SELECT id, name, latitude, longitude FROM stations");
    push_filters(&mut builder, filter);
    builder.push(" ORDER BY name");
    push_page(&mut builder, limit, offset);

    let rows: Vec<StationRow> = builder
        .build_query_as()
        .fetch_all(executor)
        .await
        .map_err(convert_error)?;
    Ok(with_ids(rows))
}

pub async fn count<'c, E>(executor: E, filter: &StationFilter) -> Result<i64>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM stations");
    push_filters(&mut builder, filter);

    let (count,): (i64,) = builder
        .build_query_as()
        .fetch_one(executor)
        .await
        .map_err(convert_error)?;
    Ok(count)
}

pub async fn get<'c, E>(executor: E, id: Id<Station>) -> Result<WithId<Station>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, name, latitude, longitude
        FROM stations
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: StationRow| with_id(row))
    .map_err(convert_error)
}

pub async fn insert<'c, E>(executor: E, station: &Station) -> Result<WithId<Station>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO stations(name, latitude, longitude)
        VALUES ($1, $2, $3)
        RETURNING id, name, latitude, longitude;
        ",
    )
    .bind(&station.name)
    .bind(station.latitude)
    .bind(station.longitude)
    .fetch_one(executor)
    .await
    .map(|row: StationRow| with_id(row))
    .map_err(convert_error)
}
