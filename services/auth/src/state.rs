use std::sync::Arc;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use agora_auth_types::token::TokenKeys;

use crate::config::Settings;
use crate::infra::db::DbUserRepository;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }
}

/// Protected routes validate bearer tokens against the settings in state.
impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        state.settings.token_keys().clone()
    }
}
