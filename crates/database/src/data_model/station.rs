use model::station::Station;
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::EntityRow;

#[derive(Debug, Clone, FromRow)]
pub struct StationRow {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl EntityRow for StationRow {
    type Model = Station;

    fn id(&self) -> Id<Station> {
        Id::new(self.id)
    }

    fn into_model(self) -> Station {
        Station {
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
