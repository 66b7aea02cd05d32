use model::train::{Train, TrainDetail, TrainType};
use model::WithId;
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::EntityRow;

#[derive(Debug, Clone, FromRow)]
pub struct TrainTypeRow {
    pub id: i64,
    pub name: String,
}

impl EntityRow for TrainTypeRow {
    type Model = TrainType;

    fn id(&self) -> Id<TrainType> {
        Id::new(self.id)
    }

    fn into_model(self) -> TrainType {
        TrainType { name: self.name }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TrainRow {
    pub id: i64,
    pub name: String,
    pub cargo_num: i32,
    pub places_in_cargo: i32,
    pub train_type_id: i64,
    pub image: Option<String>,
}

impl EntityRow for TrainRow {
    type Model = Train;

    fn id(&self) -> Id<Train> {
        Id::new(self.id)
    }

    fn into_model(self) -> Train {
        Train {
            name: self.name,
            cargo_num: self.cargo_num,
            places_in_cargo: self.places_in_cargo,
            train_type_id: Id::new(self.train_type_id),
            image: self.image,
        }
    }
}

/// A train joined with its type.
#[derive(Debug, Clone, FromRow)]
pub struct TrainDetailRow {
    pub id: i64,
    pub name: String,
    pub cargo_num: i32,
    pub places_in_cargo: i32,
    pub train_type_id: i64,
    pub train_type_name: String,
    pub image: Option<String>,
}

impl EntityRow for TrainDetailRow {
    type Model = TrainDetail;

    fn id(&self) -> Id<TrainDetail> {
        Id::new(self.id)
    }

    fn into_model(self) -> TrainDetail {
        TrainDetail {
            capacity: self.cargo_num as i64 * self.places_in_cargo as i64,
            name: self.name,
            cargo_num: self.cargo_num,
            places_in_cargo: self.places_in_cargo,
            train_type: WithId::new(
                Id::new(self.train_type_id),
                TrainType {
                    name: self.train_type_name,
                },
            ),
            image: self.image,
        }
    }
}
