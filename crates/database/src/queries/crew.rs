use model::{crew::Crew, WithId};
use sqlx::{Executor, Postgres, QueryBuilder};
use utility::id::Id;

use crate::data_model::{crew::CrewRow, with_id, with_ids};
use crate::error::convert_error;
use crate::Result;

use super::{contains_pattern, push_page, FilterPrefix};

/// How a `name` query parameter matches against crew members. A single
/// token matches either name part; two tokens match first and last name
/// respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch {
    Either(String),
    Pair { first: String, last: String },
}

impl NameMatch {
    pub fn parse(query: &str) -> Option<Self> {
        let mut tokens = query.split_whitespace();
        let first = tokens.next()?;
        match tokens.next() {
            Some(last) => Some(Self::Pair {
                first: first.to_owned(),
                last: last.to_owned(),
            }),
            None => Some(Self::Either(first.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CrewFilter {
    pub name: Option<NameMatch>,
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &CrewFilter) {
    let mut prefix = FilterPrefix::new();
    match &filter.name {
        Some(NameMatch::Either(token)) => {
            prefix.push(builder);
            builder.push("(first_name ILIKE ");
            builder.push_bind(contains_pattern(token));
            builder.push(" OR last_name ILIKE ");
            builder.push_bind(contains_pattern(token));
            builder.push(")");
        }
        Some(NameMatch::Pair { first, last }) => {
            prefix.push(builder);
            builder.push("first_name ILIKE ");
            builder.push_bind(contains_pattern(first));
            prefix.push(builder);
            builder.push("last_name ILIKE ");
            builder.push_bind(contains_pattern(last));
        }
        None => {}
    }
}

pub async fn list<'c, E>(
    executor: E,
    filter: &CrewFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<WithId<Crew>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut builder =
        QueryBuilder::new("SELECT id, first_name, last_name, image FROM crews");
    push_filters(&mut builder, filter);
    builder.push(" ORDER BY first_name, last_name");
    push_page(&mut builder, limit, offset);

    let rows: Vec<CrewRow> = builder
        .build_query_as()
        .fetch_all(executor)
        .await
        .map_err(convert_error)?;
    Ok(with_ids(rows))
}

pub async fn count<'c, E>(executor: E, filter: &CrewFilter) -> Result<i64>
where
    E: Executor<'c, Database = Postgres>,
{
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM crews");
    push_filters(&mut builder, filter);

    let (count,): (i64,) = builder
        .build_query_as()
        .fetch_one(executor)
        .await
        .map_err(convert_error)?;
    Ok(count)
}

pub async fn get<'c, E>(executor: E, id: Id<Crew>) -> Result<WithId<Crew>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, first_name, last_name, image
        FROM crews
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: CrewRow| with_id(row))
    .map_err(convert_error)
}

pub async fn insert<'c, E>(executor: E, crew: &Crew) -> Result<WithId<Crew>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO crews(first_name, last_name, image)
        VALUES ($1, $2, $3)
        RETURNING id, first_name, last_name, image;
        ",
    )
    .bind(&crew.first_name)
    .bind(&crew.last_name)
    .bind(&crew.image)
    .fetch_one(executor)
    .await
    .map(|row: CrewRow| with_id(row))
    .map_err(convert_error)
}

pub async fn update<'c, E>(
    executor: E,
    id: Id<Crew>,
    crew: &Crew,
) -> Result<WithId<Crew>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE crews
        SET first_name = $1, last_name = $2
        WHERE id = $3
        RETURNING id, first_name, last_name, image;
        ",
    )
    .bind(&crew.first_name)
    .bind(&crew.last_name)
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: CrewRow| with_id(row))
    .map_err(convert_error)
}

pub async fn set_image<'c, E>(
    executor: E,
    id: Id<Crew>,
    image: &str,
) -> Result<WithId<Crew>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE crews
        SET image = $1
        WHERE id = $2
        RETURNING id, first_name, last_name, image;
        ",
    )
    .bind(image)
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: CrewRow| with_id(row))
    .map_err(convert_error)
}

/// Removes the crew member and hands back the stored image path so the
/// caller can clean up the file.
pub async fn delete<'c, E>(executor: E, id: Id<Crew>) -> Result<Option<String>>
where
    E: Executor<'c, Database = Postgres>,
{
    let (image,): (Option<String>,) =
        sqlx::query_as("DELETE FROM crews WHERE id = $1 RETURNING image;")
            .bind(id.raw())
            .fetch_one(executor)
            .await
            .map_err(convert_error)?;
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_token_matches_either_part() {
        assert_eq!(
            NameMatch::parse("anna"),
            Some(NameMatch::Either("anna".to_owned()))
        );
    }

    #[test]
    fn two_tokens_match_first_and_last() {
        assert_eq!(
            NameMatch::parse("anna smith"),
            Some(NameMatch::Pair {
                first: "anna".to_owned(),
                last: "smith".to_owned()
            })
        );
    }

    #[test]
    fn extra_tokens_are_ignored() {
        assert_eq!(
            NameMatch::parse("  anna   smith  jones "),
            Some(NameMatch::Pair {
                first: "anna".to_owned(),
                last: "smith".to_owned()
            })
        );
    }

    #[test]
    fn blank_query_matches_nothing_specific() {
        assert_eq!(NameMatch::parse("   "), None);
        assert_eq!(NameMatch::parse(""), None);
    }
}
