use schemars::JsonSchema;
use serde::Serialize;
use utility::id::{HasId, Id};

pub mod crew;
pub mod error;
pub mod order;
pub mod route;
pub mod station;
pub mod train;
pub mod trip;
pub mod user;
pub mod validate;

pub use error::DomainError;

/// An entity together with the id it is stored under.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WithId<T: HasId> {
    pub id: Id<T>,
    #[serde(flatten)]
    pub content: T,
}

impl<T: HasId> WithId<T> {
    pub fn new(id: Id<T>, content: T) -> Self {
        Self { id, content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::Station;

    #[test]
    fn entities_serialize_flat_with_their_id() {
        let station = WithId::new(
            Id::new(7),
            Station {
                name: "Kiel Hbf".to_owned(),
                latitude: 54.315,
                longitude: 10.132,
            },
        );
        let json = serde_json::to_value(&station).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "Kiel Hbf",
                "latitude": 54.315,
                "longitude": 10.132
            })
        );
    }
}
