use model::user::User;
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::EntityRow;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_digest: String,
    pub is_staff: bool,
}

impl EntityRow for UserRow {
    type Model = User;

    fn id(&self) -> Id<User> {
        Id::new(self.id)
    }

    fn into_model(self) -> User {
        User {
            email: self.email,
            password_digest: self.password_digest,
            is_staff: self.is_staff,
        }
    }
}
