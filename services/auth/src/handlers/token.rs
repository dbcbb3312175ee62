use axum::{Form, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use agora_auth_types::identity::CurrentUser;

use crate::domain::types::TokenResponse;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::token::{LoginInput, LoginUseCase};

// ── POST /login ───────────────────────────────────────────────────────────────

/// OAuth2 password-grant form. `username` carries the email address.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        settings: state.settings.clone(),
    };

    let token = usecase
        .execute(LoginInput {
            email: form.username,
            password: form.password,
        })
        .await?;

    Ok((StatusCode::OK, Json(TokenResponse::from(token))))
}

// ── GET /auth/token ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CheckTokenResponse {
    pub user_id: i64,
    pub expires_at: u64,
}

pub async fn check_token(user: CurrentUser) -> Json<CheckTokenResponse> {
    Json(CheckTokenResponse {
        user_id: user.user_id,
        expires_at: user.expires_at,
    })
}
