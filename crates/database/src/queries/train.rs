use model::{
    train::{Train, TrainDetail},
    WithId,
};
use sqlx::{Executor, Postgres, QueryBuilder};
use utility::id::Id;

use crate::data_model::{
    train::{TrainDetailRow, TrainRow},
    with_id, with_ids,
};
use crate::error::convert_error;
use crate::Result;

use super::{contains_pattern, push_page, FilterPrefix};

#[derive(Debug, Clone, Default)]
pub struct TrainFilter {
    pub train_type: Option<String>,
    pub min_capacity: Option<i64>,
    pub max_capacity: Option<i64>,
}

const DETAIL_COLUMNS: &str = "
    tr.id, tr.name, tr.cargo_num, tr.places_in_cargo,
    tr.train_type_id, tt.name AS train_type_name, tr.image";

const FROM_CLAUSE: &str = "
    FROM trains tr
    JOIN train_types tt ON tt.id = tr.train_type_id";

const CAPACITY: &str = "(tr.cargo_num::BIGINT * tr.places_in_cargo)";

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &TrainFilter) {
    let mut prefix = FilterPrefix::new();
    if let Some(train_type) = &filter.train_type {
        prefix.push(builder);
        builder.push("tt.name ILIKE ");
        builder.push_bind(contains_pattern(train_type));
    }
    if let Some(min_capacity) = filter.min_capacity {
        prefix.push(builder);
        builder.push(CAPACITY);
        builder.push(" >= ");
        builder.push_bind(min_capacity);
    }
    if let Some(max_capacity) = filter.max_capacity {
        prefix.push(builder);
        builder.push(CAPACITY);
        builder.push(" <= ");
        builder.push_bind(max_capacity);
    }
}

pub async fn list_detail<'c, E>(
    executor: E,
    filter: &TrainFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<WithId<TrainDetail>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut builder = QueryBuilder::new("SELECT");
    builder.push(DETAIL_COLUMNS);
    builder.push(FROM_CLAUSE);
    push_filters(&mut builder, filter);
    builder.push(" ORDER BY tr.name, tr.id");
    push_page(&mut builder, limit, offset);

    let rows: Vec<TrainDetailRow> = builder
        .build_query_as()
        .fetch_all(executor)
        .await
        .map_err(convert_error)?;
    Ok(with_ids(rows))
}

pub async fn count<'c, E>(executor: E, filter: &TrainFilter) -> Result<i64>
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

pub async fn get<'c, E>(executor: E, id: Id<Train>) -> Result<WithId<Train>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, name, cargo_num, places_in_cargo, train_type_id, image
        FROM trains
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: TrainRow| with_id(row))
    .map_err(convert_error)
}

pub async fn get_detail<'c, E>(
    executor: E,
    id: Id<Train>,
) -> Result<WithId<TrainDetail>>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut builder = QueryBuilder::new("SELECT");
    builder.push(DETAIL_COLUMNS);
    builder.push(FROM_CLAUSE);
    builder.push(" WHERE tr.id = ");
    builder.push_bind(id.raw());

    builder
        .build_query_as()
        .fetch_one(executor)
        .await
        .map(|row: TrainDetailRow| with_id(row))
        .map_err(convert_error)
}

pub async fn insert<'c, E>(executor: E, train: &Train) -> Result<WithId<Train>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO trains(name, cargo_num, places_in_cargo, train_type_id, image)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, cargo_num, places_in_cargo, train_type_id, image;
        ",
    )
    .bind(&train.name)
    .bind(train.cargo_num)
    .bind(train.places_in_cargo)
    .bind(train.train_type_id.raw())
    .bind(&train.image)
    .fetch_one(executor)
    .await
    .map(|row: TrainRow| with_id(row))
    .map_err(convert_error)
}

pub async fn update<'c, E>(
    executor: E,
    id: Id<Train>,
    train: &Train,
) -> Result<WithId<Train>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE trains
        SET name = $1, cargo_num = $2, places_in_cargo = $3, train_type_id = $4
        WHERE id = $5
        RETURNING id, name, cargo_num, places_in_cargo, train_type_id, image;
        ",
    )
    .bind(&train.name)
    .bind(train.cargo_num)
    .bind(train.places_in_cargo)
    .bind(train.train_type_id.raw())
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: TrainRow| with_id(row))
    .map_err(convert_error)
}

pub async fn set_image<'c, E>(
    executor: E,
    id: Id<Train>,
    image: &str,
) -> Result<WithId<Train>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE trains
        SET image = $1
        WHERE id = $2
        RETURNING id, name, cargo_num, places_in_cargo, train_type_id, image;
        ",
    )
    .bind(image)
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: TrainRow| with_id(row))
    .map_err(convert_error)
}

/// Removes the train and hands back the stored image path so the caller can
/// clean up the file.
pub async fn delete<'c, E>(executor: E, id: Id<Train>) -> Result<Option<String>>
where
    E: Executor<'c, Database = Postgres>,
{
    let (image,): (Option<String>,) =
        sqlx::query_as("DELETE FROM trains WHERE id = $1 RETURNING image;")
            .bind(id.raw())
            .fetch_one(executor)
            .await
            .map_err(convert_error)?;
    Ok(image)
}
