use std::fmt::Debug;

use locator::database::Result;
use model::WithId;
use serde::Serialize;
use utility::id::{HasId, Id};

pub mod location;
pub mod user;

/// A row as returned by a query, convertible into the model it stores.
///
/// Conversions are fallible, because a row might violate invariants of the
/// model which the schema does not enforce.
pub trait DatabaseRow {
    type Model: Serialize + HasId;

    fn get_id(&self) -> Id<Self::Model>;
    fn to_model(self) -> Result<Self::Model>;
}

pub fn with_id<R: DatabaseRow>(row: R) -> Result<WithId<R::Model>>
where
    <R::Model as HasId>::IdType: Debug + Clone + Serialize,
{
    let id = row.get_id();
    row.to_model().map(|model| WithId::new(id, model))
}

pub fn with_ids<R: DatabaseRow>(rows: Vec<R>) -> Result<Vec<WithId<R::Model>>>
where
    <R::Model as HasId>::IdType: Debug + Clone + Serialize,
{
    rows.into_iter().map(with_id).collect()
}

pub fn models<R: DatabaseRow>(rows: Vec<R>) -> Result<Vec<R::Model>> {
    rows.into_iter().map(DatabaseRow::to_model).collect()
}
