use model::route::{Route, RouteDetail};
use model::station::Station;
use model::WithId;
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::EntityRow;

#[derive(Debug, Clone, FromRow)]
pub struct RouteRow {
    pub id: i64,
    pub source_id: i64,
    pub destination_id: i64,
    pub distance: f64,
}

impl EntityRow for RouteRow {
    type Model = Route;

    fn id(&self) -> Id<Route> {
        Id::new(self.id)
    }

    fn into_model(self) -> Route {
        Route {
            source: Id::new(self.source_id),
            destination: Id::new(self.destination_id),
            distance: self.distance,
        }
    }
}

/// A route joined with both of its stations.
#[derive(Debug, Clone, FromRow)]
pub struct RouteDetailRow {
    pub id: i64,
    pub source_id: i64,
    pub source_name: String,
    pub source_latitude: f64,
    pub source_longitude: f64,
    pub destination_id: i64,
    pub destination_name: String,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    pub distance: f64,
}

impl EntityRow for RouteDetailRow {
    type Model = RouteDetail;

    fn id(&self) -> Id<RouteDetail> {
        Id::new(self.id)
    }

    fn into_model(self) -> RouteDetail {
        RouteDetail {
            source: WithId::new(
                Id::new(self.source_id),
                Station {
                    name: self.source_name,
                    latitude: self.source_latitude,
                    longitude: self.source_longitude,
                },
            ),
            destination: WithId::new(
                Id::new(self.destination_id),
                Station {
                    name: self.destination_name,
                    latitude: self.destination_latitude,
                    longitude: self.destination_longitude,
                },
            ),
            distance: self.distance,
        }
    }
}
