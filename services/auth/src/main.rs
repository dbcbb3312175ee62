use std::sync::Arc;

use anyhow::Context as _;
use sea_orm::Database;
use tracing::{error, info};

use agora_auth::config::Settings;
use agora_auth::router::build_router;
use agora_auth::state::AppState;
use agora_auth::usecase::token::prepare_login;
use agora_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "refusing to start");
            std::process::exit(1);
        }
    };
    info!(
        db_host = %settings.database().host,
        db_name = %settings.database().name,
        from_url = settings.database_url_provided(),
        algorithm = settings.algorithm(),
        token_minutes = settings.access_token_expire_minutes(),
        "configuration resolved"
    );

    if !prepare_login() {
        error!("placeholder password hash unavailable; unknown logins skip the bcrypt check");
    }

    let db = Database::connect(settings.database_url()?.to_string())
        .await
        .context("failed to connect to database")?;

    let port = settings.port();
    let state = AppState {
        db,
        settings: Arc::new(settings),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.context("server error")
}
