//! A database kept entirely in process memory.
//!
//! Used by tests and as a fallback when no PostgreSQL connection is
//! configured. Transactions hold the lock on all tables until they are
//! committed or dropped, so they are fully serialized. They write straight
//! into the tables. Dropping a transaction without committing rolls the
//! tables back to where it started, which is cheap because rows are only
//! ever appended.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::{
    location::LocationRecord,
    user::{User, Username},
    WithId,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use utility::{geo::DegreeBox, id::Id};

use crate::database::{
    Database, DatabaseAutocommit, DatabaseError, DatabaseOperations,
    DatabaseTransaction, LocationRepo, Result, UserRepo,
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<Id<User>, User>,
    locations: Vec<WithId<LocationRecord>>,
    last_user_id: i64,
    last_location_id: i64,
}

/// Position of the tables when a transaction started.
#[derive(Debug, Clone, Copy)]
struct Savepoint {
    last_user_id: i64,
    last_location_id: i64,
    location_count: usize,
}

impl Tables {
    fn savepoint(&self) -> Savepoint {
        Savepoint {
            last_user_id: self.last_user_id,
            last_location_id: self.last_location_id,
            location_count: self.locations.len(),
        }
    }

    fn rollback_to(&mut self, savepoint: Savepoint) {
        // user ids are handed out in ascending order
        let _ = self.users.split_off(&Id::new(savepoint.last_user_id + 1));
        self.locations.truncate(savepoint.location_count);
        self.last_user_id = savepoint.last_user_id;
        self.last_location_id = savepoint.last_location_id;
    }

    fn get_user(&self, id: &Id<User>) -> Result<WithId<User>> {
        self.users
            .get(id)
            .map(|user| WithId::new(*id, user.clone()))
            .ok_or(DatabaseError::NotFound)
    }

    fn user_by_username(&self, username: &Username) -> Result<WithId<User>> {
        self.users
            .iter()
            .find(|(_, user)| &user.username == username)
            .map(|(id, user)| WithId::new(*id, user.clone()))
            .ok_or(DatabaseError::NotFound)
    }

    fn insert_user(&mut self, user: User) -> Result<WithId<User>> {
        if self.user_by_username(&user.username).is_ok() {
            return Err(DatabaseError::Conflict);
        }
        self.last_user_id += 1;
        let id = Id::new(self.last_user_id);
        self.users.insert(id, user.clone());
        Ok(WithId::new(id, user))
    }

    fn latest_location(&self, user_id: &Id<User>) -> Option<&WithId<LocationRecord>> {
        self.locations
            .iter()
            .filter(|record| &record.content.user_id == user_id)
            .max_by_key(|record| (record.content.timestamp, record.id))
    }

    fn users_in_area(&self, area: &DegreeBox) -> Vec<WithId<User>> {
        self.users
            .iter()
            .filter(|(id, _)| {
                self.latest_location(id).is_some_and(|record| {
                    area.contains(
                        record.content.coordinate.latitude(),
                        record.content.coordinate.longitude(),
                    )
                })
            })
            .map(|(id, user)| WithId::new(*id, user.clone()))
            .collect()
    }

    fn save_location(&mut self, record: LocationRecord) -> Result<WithId<LocationRecord>> {
        // mirrors the foreign key of the sql schema
        self.get_user(&record.user_id)?;
        self.last_location_id += 1;
        let record = WithId::new(Id::new(self.last_location_id), record);
        self.locations.push(record.clone());
        Ok(record)
    }

    fn locations_since(
        &self,
        user_id: Option<&Id<User>>,
        since: DateTime<Utc>,
    ) -> Vec<LocationRecord> {
        let mut records = self
            .locations
            .iter()
            .filter(|record| record.content.timestamp >= since)
            .filter(|record| user_id.map_or(true, |id| &record.content.user_id == id))
            .collect::<Vec<_>>();
        records.sort_by_key(|record| (record.content.timestamp, record.id));
        records
            .into_iter()
            .map(|record| record.content.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` with its own timestamp instead of the current time.
    /// Useful to build up a location history.
    pub async fn insert_location(
        &self,
        record: LocationRecord,
    ) -> Result<WithId<LocationRecord>> {
        self.tables.lock().await.save_location(record)
    }

    pub async fn location_count(&self) -> usize {
        self.tables.lock().await.locations.len()
    }
}

pub struct MemoryAutocommit {
    tables: Arc<Mutex<Tables>>,
}

pub struct MemoryTransaction {
    tables: OwnedMutexGuard<Tables>,
    savepoint: Savepoint,
    committed: bool,
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if !self.committed {
            self.tables.rollback_to(self.savepoint);
        }
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    type Transaction = MemoryTransaction;
    type Autocommit = MemoryAutocommit;

    async fn transaction(&self) -> Result<Self::Transaction> {
        let tables = self.tables.clone().lock_owned().await;
        let savepoint = tables.savepoint();
        Ok(MemoryTransaction {
            tables,
            savepoint,
            committed: false,
        })
    }

    fn auto(&self) -> Self::Autocommit {
        MemoryAutocommit {
            tables: self.tables.clone(),
        }
    }
}

#[async_trait]
impl DatabaseTransaction for MemoryTransaction {
    async fn commit(mut self) -> Result<()> {
        self.committed = true;
        Ok(())
    }
}

impl DatabaseOperations for MemoryTransaction {}

impl DatabaseOperations for MemoryAutocommit {}

impl DatabaseAutocommit for MemoryAutocommit {}

#[async_trait]
impl UserRepo for MemoryAutocommit {
    async fn get_user(&mut self, id: &Id<User>) -> Result<WithId<User>> {
        self.tables.lock().await.get_user(id)
    }

    async fn user_by_username(&mut self, username: &Username) -> Result<WithId<User>> {
        self.tables.lock().await.user_by_username(username)
    }

    async fn insert_user(&mut self, user: User) -> Result<WithId<User>> {
        self.tables.lock().await.insert_user(user)
    }

    async fn users_in_area(&mut self, area: &DegreeBox) -> Result<Vec<WithId<User>>> {
        Ok(self.tables.lock().await.users_in_area(area))
    }
}

#[async_trait]
impl LocationRepo for MemoryAutocommit {
    async fn save_location(
        &mut self,
        record: LocationRecord,
    ) -> Result<WithId<LocationRecord>> {
        self.tables.lock().await.save_location(record)
    }

    async fn locations_since(
        &mut self,
        user_id: Option<&Id<User>>,
        since: DateTime<Utc>,
    ) -> Result<Vec<LocationRecord>> {
        Ok(self.tables.lock().await.locations_since(user_id, since))
    }
}

#[async_trait]
impl UserRepo for MemoryTransaction {
    async fn get_user(&mut self, id: &Id<User>) -> Result<WithId<User>> {
        self.tables.get_user(id)
    }

    async fn user_by_username(&mut self, username: &Username) -> Result<WithId<User>> {
        self.tables.user_by_username(username)
    }

    async fn insert_user(&mut self, user: User) -> Result<WithId<User>> {
        self.tables.insert_user(user)
    }

    async fn users_in_area(&mut self, area: &DegreeBox) -> Result<Vec<WithId<User>>> {
        Ok(self.tables.users_in_area(area))
    }
}

#[async_trait]
impl LocationRepo for MemoryTransaction {
    async fn save_location(
        &mut self,
        record: LocationRecord,
    ) -> Result<WithId<LocationRecord>> {
        self.tables.save_location(record)
    }

    async fn locations_since(
        &mut self,
        user_id: Option<&Id<User>>,
        since: DateTime<Utc>,
    ) -> Result<Vec<LocationRecord>> {
        Ok(self.tables.locations_since(user_id, since))
    }
}
