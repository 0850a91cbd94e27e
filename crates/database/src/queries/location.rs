use chrono::{DateTime, Utc};
use locator::database::Result;
use model::{location::LocationRecord, user::User, WithId};
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};

use crate::data_model::{location::LocationRow, models, with_id};

use super::convert_error;

pub async fn insert<'c, E>(
    executor: E,
    record: LocationRecord,
) -> Result<WithId<LocationRecord>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO locations(
            user_id,
            latitude,
            longitude,
            date_time
        )
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, latitude, longitude, date_time;
        ",
    )
    .bind(record.user_id.raw())
    .bind(record.coordinate.latitude())
    .bind(record.coordinate.longitude())
    .bind(record.timestamp)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .and_then(|row: LocationRow| with_id(row))
}

pub async fn get_since<'c, E>(
    executor: E,
    user_id: Option<&Id<User>>,
    since: DateTime<Utc>,
) -> Result<Vec<LocationRecord>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, user_id, latitude, longitude, date_time
        FROM
            locations
        WHERE
            date_time >= $1
            AND ($2::BIGINT IS NULL OR user_id = $2)
        ORDER BY
            date_time ASC, id ASC;
        ",
    )
    .bind(since)
    .bind(user_id.map(Id::raw))
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|locations: Vec<LocationRow>| models(locations))
}
