use axum::Json;
use axum::http::StatusCode;

/// Handler for `GET /healthz`. Reports the crate version alongside the status.
pub async fn healthz() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
