use std::{error, result};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::{
    location::LocationRecord,
    user::{User, Username},
    WithId,
};
use thiserror::Error;
use utility::{geo::DegreeBox, id::Id};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("entry not found")]
    NotFound,
    #[error("entry conflicts with an existing one")]
    Conflict,
    #[error(transparent)]
    Other(Box<dyn error::Error + Send + Sync>),
}

impl DatabaseError {
    pub fn other<T: error::Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

pub type Result<T> = result::Result<T, DatabaseError>;

#[async_trait]
pub trait UserRepo {
    async fn get_user(&mut self, id: &Id<User>) -> Result<WithId<User>>;

    async fn user_by_username(&mut self, username: &Username) -> Result<WithId<User>>;

    /// Fails with `DatabaseError::Conflict` if the username is taken.
    async fn insert_user(&mut self, user: User) -> Result<WithId<User>>;

    /// Returns all users whose most recent location lies within `area`,
    /// ordered by id. Older locations of a user are not considered.
    async fn users_in_area(&mut self, area: &DegreeBox) -> Result<Vec<WithId<User>>>;
}

#[async_trait]
pub trait LocationRepo {
    async fn save_location(
        &mut self,
        record: LocationRecord,
    ) -> Result<WithId<LocationRecord>>;

    /// Returns all locations recorded at or after `since`, restricted to one
    /// user if `user_id` is given.
    ///
    /// # Ordering
    ///
    /// Implementations must return the records sorted ascending by timestamp,
    /// ties broken by record id. Distance calculations rely on this.
    async fn locations_since(
        &mut self,
        user_id: Option<&Id<User>>,
        since: DateTime<Utc>,
    ) -> Result<Vec<LocationRecord>>;
}

pub trait DatabaseOperations: UserRepo + LocationRepo {}

#[async_trait]
pub trait DatabaseTransaction: DatabaseOperations {
    async fn commit(self) -> Result<()>;
}

pub trait DatabaseAutocommit: DatabaseOperations {}

/// trait to implement a location database.
/// multiple concurrent accesses should be possible by e.g. cloning the database object.
#[async_trait]
pub trait Database: Clone + Send + Sync + Sized {
    type Transaction: DatabaseTransaction + Send;
    type Autocommit: DatabaseAutocommit + Send;

    async fn transaction(&self) -> Result<Self::Transaction>;

    fn auto(&self) -> Self::Autocommit;
}
