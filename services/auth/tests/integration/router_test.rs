use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use agora_auth::router::build_router;
use agora_auth::state::AppState;
use agora_auth::usecase::token::{issue_access_token, issue_access_token_with_lifetime};
use agora_testing::auth::bearer_value;

use crate::helpers::test_settings;

fn app_state() -> AppState {
    AppState {
        db: DatabaseConnection::Disconnected,
        settings: test_settings(),
    }
}

async fn send(request: Request<Body>) -> Response {
    build_router(app_state()).oneshot(request).await.unwrap()
}

async fn json(resp: Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn check_token_request(authorization: Option<http::HeaderValue>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/auth/token");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn healthz_returns_200_with_request_id() {
    let resp = send(Request::get("/healthz").body(Body::empty()).unwrap()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_echo_incoming_request_id() {
    let request = Request::get("/healthz")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let resp = send(request).await;

    assert_eq!(resp.headers().get("x-request-id").unwrap(), "req-123");
}

#[tokio::test]
async fn check_token_returns_subject_for_valid_bearer() {
    let settings = test_settings();
    let token = issue_access_token(42, &settings).unwrap();

    let resp = send(check_token_request(Some(bearer_value(&token.token)))).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json(resp).await;
    assert_eq!(body["user_id"], 42);
    assert_eq!(body["expires_at"], token.expires_at.timestamp());
}

#[tokio::test]
async fn check_token_rejects_missing_bearer() {
    let resp = send(check_token_request(None)).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn check_token_rejects_expired_and_forged_tokens_identically() {
    let settings = test_settings();
    let expired =
        issue_access_token_with_lifetime(42, settings.token_keys(), Duration::ZERO).unwrap();
    let forged = format!("{}x", issue_access_token(42, &settings).unwrap().token);

    let expired_resp = send(check_token_request(Some(bearer_value(&expired.token)))).await;
    let forged_resp = send(check_token_request(Some(bearer_value(&forged)))).await;

    assert_eq!(expired_resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(forged_resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json(expired_resp).await, json(forged_resp).await);
}

#[tokio::test]
async fn login_hides_persistence_failures() {
    let request = Request::post("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=user%40example.com&password=pw"))
        .unwrap();

    let resp = send(request).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json(resp).await;
    assert_eq!(body["kind"], "INTERNAL");
    assert_eq!(body["detail"], "internal error");
}

#[tokio::test]
async fn login_rejects_missing_form_fields() {
    let request = Request::post("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=user%40example.com"))
        .unwrap();

    let resp = send(request).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn login_preflight_allows_any_origin_with_credentials() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/login")
        .header(header::ORIGIN, "https://app.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let resp = send(request).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://app.example.com"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
        "POST"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
        "content-type"
    );
}
