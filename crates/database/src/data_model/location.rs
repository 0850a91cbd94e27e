use chrono::{DateTime, Utc};
use locator::database::{DatabaseError, Result};
use model::{coordinate::Coordinate, location::LocationRecord};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;

/// A location of a user at a point in time.
/// Table: `locations`
#[derive(Debug, Clone, FromRow)]
pub struct LocationRow {
    pub id: i64,
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub date_time: DateTime<Utc>,
}

impl DatabaseRow for LocationRow {
    type Model = LocationRecord;

    fn get_id(&self) -> Id<LocationRecord> {
        Id::new(self.id)
    }

    fn to_model(self) -> Result<LocationRecord> {
        let coordinate =
            Coordinate::new(self.latitude, self.longitude).map_err(DatabaseError::other)?;
        Ok(LocationRecord::new(
            Id::new(self.user_id),
            coordinate,
            self.date_time,
        ))
    }
}
