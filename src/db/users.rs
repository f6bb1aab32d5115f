//! Database operations for users.

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::error::AppResult;

use super::insert_error;
use crate::models::user::{User, UserRole};

/// New user to insert. The password must already be hashed.
pub struct NewUser<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub role: UserRole,
    pub password_hash: String,
}

/// Insert a new user.
pub async fn insert(db: &DatabaseConnection, user: NewUser<'_>) -> AppResult<User> {
    let now = Utc::now();

    let model = crate::entity::user::ActiveModel {
        id: Set(Uuid::now_v7()),
        email: Set(user.email.to_string()),
        name: Set(user.name.to_string()),
        role: Set(user.role.as_str().to_string()),
        password_hash: Set(user.password_hash),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let inserted = model.insert(db).await.map_err(|e| {
        insert_error(
            e,
            || format!("User {} already exists", user.email),
            "Failed to insert user",
        )
    })?;
    User::try_from(inserted)
}

/// Find a user by (already normalized) email.
pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> AppResult<Option<User>> {
    crate::entity::user::Entity::find()
        .filter(crate::entity::user::Column::Email.eq(email))
        .one(db)
        .await?
        .map(User::try_from)
        .transpose()
}

/// Find a user by ID.
pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> AppResult<Option<User>> {
    crate::entity::user::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(User::try_from)
        .transpose()
}
