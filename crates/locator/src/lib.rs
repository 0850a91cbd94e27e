use std::error::Error;

use model::ValidationError;
use thiserror::Error;

pub mod client;
pub mod database;
pub mod memory;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("The requested item does not exist.")]
    NotFound,
    #[error("The item conflicts with an existing one.")]
    Conflict,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("store failure: {0}")]
    StoreFailure(Box<dyn Error + Send + Sync>),
}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::NotFound => Self::NotFound,
            database::DatabaseError::Conflict => Self::Conflict,
            database::DatabaseError::Other(why) => Self::StoreFailure(why),
        }
    }
}

pub type RequestResult<O> = Result<O, RequestError>;
