use model::{user::User, WithId};
use sqlx::{Executor, Postgres};
use utility::id::Id;

use crate::data_model::{user::UserRow, with_id};
use crate::error::convert_error;
use crate::Result;

pub async fn insert<'c, E>(
    executor: E,
    email: &str,
    password_digest: &str,
    is_staff: bool,
) -> Result<WithId<User>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO users(email, password_digest, is_staff)
        VALUES ($1, $2, $3)
        RETURNING id, email, password_digest, is_staff;
        ",
    )
    .bind(email)
    .bind(password_digest)
    .bind(is_staff)
    .fetch_one(executor)
    .await
    .map(|row: UserRow| with_id(row))
    .map_err(convert_error)
}

pub async fn get<'c, E>(executor: E, id: Id<User>) -> Result<WithId<User>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, email, password_digest, is_staff
        FROM users
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: UserRow| with_id(row))
    .map_err(convert_error)
}

/// Credential lookup; `None` when no account uses the email.
pub async fn by_email<'c, E>(executor: E, email: &str) -> Result<Option<WithId<User>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, email, password_digest, is_staff
        FROM users
        WHERE email = $1;
        ",
    )
    .bind(email)
    .fetch_optional(executor)
    .await
    .map(|row| row.map(|row: UserRow| with_id(row)))
    .map_err(convert_error)
}
