use std::{env, error::Error};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use locator::database::{
    Database, DatabaseAutocommit, DatabaseOperations, DatabaseTransaction,
    LocationRepo, Result, UserRepo,
};
use model::{
    location::LocationRecord,
    user::{User, Username},
    WithId,
};
use queries::convert_error;
use sqlx::Transaction;
use utility::{geo::DegreeBox, id::Id};

pub mod data_model;
pub mod queries;

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn postgres_url(self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

#[derive(Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

pub struct PgDatabaseTransaction<'a> {
    tx: Transaction<'a, sqlx::Postgres>,
}

#[async_trait]
impl<'a> DatabaseTransaction for PgDatabaseTransaction<'a> {
    async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(convert_error)
    }
}

pub struct PgDatabaseAutocommit {
    pool: sqlx::PgPool,
}

impl DatabaseAutocommit for PgDatabaseAutocommit {}

impl PgDatabase {
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> std::result::Result<Self, Box<dyn Error + Send + Sync>> {
        log::info!(
            "connecting to postgres at {}:{}/{}",
            database_connection_info.hostname,
            database_connection_info.port,
            database_connection_info.database
        );
        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { connection: pool })
    }
}

#[async_trait]
impl Database for PgDatabase {
    type Transaction = PgDatabaseTransaction<'static>;
    type Autocommit = PgDatabaseAutocommit;

    fn auto(&self) -> Self::Autocommit {
        PgDatabaseAutocommit {
            pool: self.connection.clone(),
        }
    }

    async fn transaction(&self) -> Result<Self::Transaction> {
        let tx: Transaction<'_, sqlx::Postgres> =
            self.connection.begin().await.map_err(convert_error)?;

        Ok(PgDatabaseTransaction { tx })
    }
}

impl DatabaseOperations for PgDatabaseAutocommit {}

impl<'a> DatabaseOperations for PgDatabaseTransaction<'a> {}

#[async_trait]
impl UserRepo for PgDatabaseAutocommit {
    async fn get_user(&mut self, id: &Id<User>) -> Result<WithId<User>> {
        queries::user::get(&self.pool, id).await
    }

    async fn user_by_username(&mut self, username: &Username) -> Result<WithId<User>> {
        queries::user::get_by_username(&self.pool, username).await
    }

    async fn insert_user(&mut self, user: User) -> Result<WithId<User>> {
        queries::user::insert(&self.pool, user).await
    }

    async fn users_in_area(&mut self, area: &DegreeBox) -> Result<Vec<WithId<User>>> {
        queries::user::get_in_area(&self.pool, area).await
    }
}

#[async_trait]
impl<'a> UserRepo for PgDatabaseTransaction<'a> {
    async fn get_user(&mut self, id: &Id<User>) -> Result<WithId<User>> {
        queries::user::get(&mut *self.tx, id).await
    }

    async fn user_by_username(&mut self, username: &Username) -> Result<WithId<User>> {
        queries::user::get_by_username(&mut *self.tx, username).await
    }

    async fn insert_user(&mut self, user: User) -> Result<WithId<User>> {
        queries::user::insert(&mut *self.tx, user).await
    }

    async fn users_in_area(&mut self, area: &DegreeBox) -> Result<Vec<WithId<User>>> {
        queries::user::get_in_area(&mut *self.tx, area).await
    }
}

#[async_trait]
impl LocationRepo for PgDatabaseAutocommit {
    async fn save_location(
        &mut self,
        record: LocationRecord,
    ) -> Result<WithId<LocationRecord>> {
        queries::location::insert(&self.pool, record).await
    }

    async fn locations_since(
        &mut self,
        user_id: Option<&Id<User>>,
        since: DateTime<Utc>,
    ) -> Result<Vec<LocationRecord>> {
        queries::location::get_since(&self.pool, user_id, since).await
    }
}

#[async_trait]
impl<'a> LocationRepo for PgDatabaseTransaction<'a> {
    async fn save_location(
        &mut self,
        record: LocationRecord,
    ) -> Result<WithId<LocationRecord>> {
        queries::location::insert(&mut *self.tx, record).await
    }

    async fn locations_since(
        &mut self,
        user_id: Option<&Id<User>>,
        since: DateTime<Utc>,
    ) -> Result<Vec<LocationRecord>> {
        queries::location::get_since(&mut *self.tx, user_id, since).await
    }
}
