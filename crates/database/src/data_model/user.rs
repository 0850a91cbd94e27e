use locator::database::{DatabaseError, Result};
use model::user::User;
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;

/// Table: `users`
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
}

impl DatabaseRow for UserRow {
    type Model = User;

    fn get_id(&self) -> Id<User> {
        Id::new(self.id)
    }

    fn to_model(self) -> Result<User> {
        let username = self.username.parse().map_err(DatabaseError::other)?;
        Ok(User { username })
    }
}
