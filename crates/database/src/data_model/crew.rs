use model::crew::Crew;
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::EntityRow;

#[derive(Debug, Clone, FromRow)]
pub struct CrewRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
}

impl EntityRow for CrewRow {
    type Model = Crew;

    fn id(&self) -> Id<Crew> {
        Id::new(self.id)
    }

    fn into_model(self) -> Crew {
        Crew {
            first_name: self.first_name,
            last_name: self.last_name,
            image: self.image,
        }
    }
}
