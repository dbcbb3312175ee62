use anyhow::Context as _;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use agora_auth_schema::users;

use crate::domain::repository::UserRepository;
use crate::domain::types::AuthUser;
use crate::error::AuthServiceError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }
}

fn user_from_model(m: users::Model) -> AuthUser {
    AuthUser {
        id: i64::from(m.id),
        email: m.email,
        password_hash: m.password,
    }
}
