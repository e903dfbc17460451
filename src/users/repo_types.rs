use sqlx::FromRow;
use uuid::Uuid;

use super::domain::{Role, UnknownRole, User};

/// Raw `users` row; `user_role` is still text here.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub user_role: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
}

impl TryFrom<UserRow> for User {
    type Error = UnknownRole;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            role: r.user_role.parse::<Role>()?,
            first_name: r.first_name,
            last_name: r.last_name,
            position: r.position,
            email: r.email,
            password_hash: r.hashed_password,
            is_active: r.is_active,
        })
    }
}
