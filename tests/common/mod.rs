//! Common test utilities

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;

use book_review_api::auth::TokenSigner;
use book_review_api::{api, AppState};

/// Signing secret shared by the app under test and expiry helpers
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Setup test database - truncate tables for a fresh state
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::query("TRUNCATE TABLE reviews, books, users CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to clean up DB");

    pool
}

/// Build the router under test
pub fn test_app(pool: PgPool) -> Router {
    let tokens = TokenSigner::new(TEST_JWT_SECRET, 2 * 24 * 60 * 60);
    api::create_router(AppState::new(pool, tokens))
}

/// Register a user and log in, returning (token, user id as string)
pub async fn register_and_login(app: &Router, name: &str, email: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            None,
            json!({ "name": name, "email": email, "password": "turning-pages-9" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "registration failed");

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({ "email": email, "password": "turning-pages-9" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "login failed");

    let body = body_json(response).await;
    let token = body["token"].as_str().expect("login returns token").to_string();
    let user_id = body["user"]["id"].as_str().expect("login returns user id").to_string();
    (token, user_id)
}

/// Build a JSON request with an optional bearer token
pub fn request_json(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a POST request with a JSON body
pub fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    request_json("POST", uri, token, body)
}

/// Build a bodyless request with an optional bearer token
pub fn request_empty(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Read a response body as JSON
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
