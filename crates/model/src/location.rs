use chrono::{DateTime, Utc};
use serde::Serialize;
use utility::id::{HasId, Id};

use crate::{
    coordinate::{self, Coordinate},
    user::User,
};

/// Where a user was at a given instant. Records are only ever created, never
/// updated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub user_id: Id<User>,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
}

impl LocationRecord {
    pub fn new(user_id: Id<User>, coordinate: Coordinate, timestamp: DateTime<Utc>) -> Self {
        Self {
            user_id,
            coordinate,
            timestamp,
        }
    }

    /// A record for `user_id` timestamped with the current time.
    pub fn now(user_id: Id<User>, coordinate: Coordinate) -> Self {
        Self::new(user_id, coordinate, Utc::now())
    }
}

impl HasId for LocationRecord {
    type IdType = i64;
}

/// Total distance in kilometers along `records` in their given order.
pub fn distance_traveled(records: &[LocationRecord]) -> f64 {
    coordinate::travel_distance(records.iter().map(|record| record.coordinate))
}
