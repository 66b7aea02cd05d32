//! Row structs mirroring the table layout, plus their conversions into the
//! domain model.

use model::WithId;
use utility::id::{HasId, Id};

pub mod crew;
pub mod order;
pub mod route;
pub mod station;
pub mod train;
pub mod trip;
pub mod user;

/// A fetched row that knows which entity it stores and under which id.
pub(crate) trait EntityRow {
    type Model: HasId;

    fn id(&self) -> Id<Self::Model>;
    fn into_model(self) -> Self::Model;
}

pub(crate) fn with_id<R: EntityRow>(row: R) -> WithId<R::Model> {
    let id = row.id();
    WithId::new(id, row.into_model())
}

pub(crate) fn with_ids<R: EntityRow>(rows: Vec<R>) -> Vec<WithId<R::Model>> {
    rows.into_iter().map(with_id).collect()
}
