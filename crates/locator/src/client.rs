use chrono::{DateTime, Utc};
use model::{
    coordinate::Coordinate,
    location::{self, LocationRecord},
    user::{User, Username},
    ValidationError, WithId,
};
use utility::id::Id;

use crate::{
    database::{Database, DatabaseTransaction, LocationRepo, UserRepo},
    RequestError, RequestResult,
};

/// Entry point for all user and location operations. Cheap to clone; every
/// clone shares the underlying database.
#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database,
{
    id: String,
    pub database: D,
}

impl<D> Client<D>
where
    D: Database,
{
    /// `id` names the consumer of this client in log output.
    pub fn new<S>(id: S, database: D) -> Self
    where
        S: Into<String>,
    {
        Self {
            id: id.into(),
            database,
        }
    }

    pub async fn create_user(&self, username: Username) -> RequestResult<WithId<User>> {
        let user = self.database.auto().insert_user(User { username }).await?;
        log::info!(
            "[{}] created user {} ({})",
            self.id,
            user.id,
            user.content.username
        );
        Ok(user)
    }

    pub async fn get_user(&self, id: &Id<User>) -> RequestResult<WithId<User>> {
        Ok(self.database.auto().get_user(id).await?)
    }

    pub async fn user_by_username(
        &self,
        username: &Username,
    ) -> RequestResult<WithId<User>> {
        Ok(self.database.auto().user_by_username(username).await?)
    }

    /// Records `coordinate` as the current location of the user.
    ///
    /// Nothing is written if the user does not exist.
    pub async fn update_location(
        &self,
        user_id: &Id<User>,
        coordinate: Coordinate,
    ) -> RequestResult<WithId<LocationRecord>> {
        let mut transaction = self.database.transaction().await?;
        let user = transaction.get_user(user_id).await?;
        let record = transaction
            .save_location(LocationRecord::now(user.id, coordinate))
            .await?;
        transaction.commit().await?;

        log::debug!(
            "[{}] user {} is now at ({}, {})",
            self.id,
            user_id,
            coordinate.latitude(),
            coordinate.longitude()
        );
        Ok(record)
    }

    /// Finds the users whose latest location is at most `radius_deg` degrees
    /// away from `center` on either axis.
    ///
    /// The radius is an offset in degrees and not a distance, so this searches
    /// a rectangle rather than a circle.
    pub async fn users_in_location(
        &self,
        center: Coordinate,
        radius_deg: f64,
    ) -> RequestResult<Vec<WithId<User>>> {
        if !radius_deg.is_finite() || radius_deg < 0.0 {
            return Err(RequestError::Invalid(ValidationError::InvalidRadius));
        }
        Ok(self
            .database
            .auto()
            .users_in_area(&center.degree_box(radius_deg))
            .await?)
    }

    /// Kilometers traveled since `since`, either by one user or, without a
    /// user, along the combined path of all users.
    pub async fn distance_traveled(
        &self,
        since: DateTime<Utc>,
        user_id: Option<&Id<User>>,
    ) -> RequestResult<f64> {
        let mut auto = self.database.auto();
        if let Some(user_id) = user_id {
            auto.get_user(user_id).await?;
        }
        let records = auto.locations_since(user_id, since).await?;
        let distance = location::distance_traveled(&records);
        log::debug!(
            "[{}] {} locations since {}, {:.3} km",
            self.id,
            records.len(),
            since,
            distance
        );
        Ok(distance)
    }
}
