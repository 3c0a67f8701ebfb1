#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use fittrack::config::Config;
use fittrack::db::{create_memory_pool, DbPool};
use fittrack::migrations::run_migrations_for_tests;
use fittrack::models::{User, UserRole};
use fittrack::repositories::{SessionRepository, UserRepository};
use fittrack::state::AppState;

pub const CHEST_ID: &str = "6b0e7f6e-1f7a-4c55-9f0e-0c1d2a3b4c01";
pub const BICEPS_ID: &str = "6b0e7f6e-1f7a-4c55-9f0e-0c1d2a3b4c04";

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: ":memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: Vec::new(),
        cookie_secure: false,
    }
}

pub fn create_test_app(pool: DbPool) -> Router {
    let config = test_config();
    fittrack::routes::create_router(AppState::new(pool, &config), &config)
}

pub async fn create_test_user(
    pool: &DbPool,
    username: &str,
    password: &str,
    role: UserRole,
) -> User {
    let user_repo = UserRepository::new(pool.clone());
    user_repo
        .create(username, None, password, role)
        .await
        .unwrap()
}

pub async fn create_session_cookie(pool: &DbPool, user: &User) -> String {
    let session_repo = SessionRepository::new(pool.clone());
    let token = session_repo.create(&user.id).await.unwrap();
    format!("session={}", token)
}

/// A user with a live session, ready to make requests.
pub async fn login_as(pool: &DbPool, username: &str, role: UserRole) -> (User, String) {
    let user = create_test_user(pool, username, "password123", role).await;
    let cookie = create_session_cookie(pool, &user).await;
    (user, cookie)
}

pub fn extract_cookie_header(set_cookie: &str) -> String {
    // Extract just the cookie name=value part for use in Cookie header
    set_cookie.split(';').next().unwrap_or("").to_string()
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str, cookie: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(cookie), None).await
}

pub async fn post(app: &Router, uri: &str, cookie: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(cookie), Some(body)).await
}

pub async fn put(app: &Router, uri: &str, cookie: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(cookie), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, cookie: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, Some(cookie), None).await
}
