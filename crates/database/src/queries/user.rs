use locator::database::Result;
use model::{
    user::{User, Username},
    WithId,
};
use sqlx::{Executor, Postgres};
use utility::{geo::DegreeBox, id::Id, let_also::LetAlso};

use crate::data_model::{user::UserRow, with_id, with_ids};

use super::convert_error;

pub async fn get<'c, E>(executor: E, id: &Id<User>) -> Result<WithId<User>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, username
        FROM users
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .and_then(|row: UserRow| with_id(row))
}

pub async fn get_by_username<'c, E>(
    executor: E,
    username: &Username,
) -> Result<WithId<User>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, username
        FROM users
        WHERE username = $1;
        ",
    )
    .bind(username.as_str())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .and_then(|row: UserRow| with_id(row))
}

pub async fn insert<'c, E>(executor: E, user: User) -> Result<WithId<User>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO users(username)
        VALUES ($1)
        RETURNING id, username;
        ",
    )
    .bind(user.username.as_str())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .and_then(|row: UserRow| with_id(row))
}

pub async fn get_in_area<'c, E>(
    executor: E,
    area: &DegreeBox,
) -> Result<Vec<WithId<User>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        WITH latest AS (
            SELECT DISTINCT ON (user_id)
                user_id, latitude, longitude
            FROM
                locations
            ORDER BY
                user_id, date_time DESC, id DESC
        )
        SELECT
            users.id, users.username
        FROM
            users
            JOIN latest ON latest.user_id = users.id
        WHERE
            latest.latitude BETWEEN $1 AND $2
            AND latest.longitude BETWEEN $3 AND $4
        ORDER BY
            users.id;
        ",
    )
    .bind(area.min_latitude)
    .bind(area.max_latitude)
    .bind(area.min_longitude)
    .bind(area.max_longitude)
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|users: Vec<UserRow>| with_ids(users))
}
