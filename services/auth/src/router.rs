use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use agora_core::health::healthz;
use agora_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::token::{check_token, login};
use crate::state::AppState;

/// Credentialed CORS for any origin: the request's origin, method and headers
/// are echoed back.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        // Login
        .route("/login", post(login))
        // Token
        .route("/auth/token", get(check_token))
        .with_state(state)
        .layer(cors_layer())
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
}
