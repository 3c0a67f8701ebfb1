mod common;

use axum::http::StatusCode;
use fittrack::models::UserRole;
use serde_json::json;

#[tokio::test]
async fn test_regular_user_cannot_list_users() {
    let pool = common::setup_test_db();
    let (_, cookie) = common::login_as(&pool, "bob", UserRole::User).await;
    let app = common::create_test_app(pool);

    let (status, body) = common::get(&app, "/users", &cookie).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");
}

#[tokio::test]
async fn test_admin_lists_users_paginated() {
    let pool = common::setup_test_db();
    let (_, cookie) = common::login_as(&pool, "admin", UserRole::Admin).await;
    for name in ["carol", "bob", "dave"] {
        common::create_test_user(&pool, name, "password123", UserRole::User).await;
    }
    let app = common::create_test_app(pool);

    let (status, page) = common::get(
        &app,
        "/users?pageIndex=0&pageSize=2&sortColumn=username&sortOrder=desc",
        &cookie,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalCount"], 4);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["hasNextPage"], true);
    assert_eq!(page["hasPreviousPage"], false);
    assert_eq!(page["data"][0]["username"], "dave");
    assert_eq!(page["data"][1]["username"], "carol");
    assert!(page["data"][0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_admin_creates_user() {
    let pool = common::setup_test_db();
    let (_, cookie) = common::login_as(&pool, "admin", UserRole::Admin).await;
    let app = common::create_test_app(pool);

    let (status, user) = common::post(
        &app,
        "/users",
        &cookie,
        json!({ "username": "newbie", "password": "password123" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["role"], "user");
}

#[tokio::test]
async fn test_user_reads_self_but_not_others() {
    let pool = common::setup_test_db();
    let (alice, cookie) = common::login_as(&pool, "alice", UserRole::User).await;
    let bob = common::create_test_user(&pool, "bob", "password123", UserRole::User).await;
    let app = common::create_test_app(pool);

    let (status, me) = common::get(&app, &format!("/users/{}", alice.id), &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");

    let (status, _) = common::get(&app, &format!("/users/{}", bob.id), &cookie).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = common::get(&app, "/users/by-name/bob", &cookie).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = common::get(&app, "/users/by-name/nobody", &cookie).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_user_id_is_bad_request() {
    let pool = common::setup_test_db();
    let (_, cookie) = common::login_as(&pool, "admin", UserRole::Admin).await;
    let app = common::create_test_app(pool);

    let (status, _) = common::get(&app, "/users/not-a-uuid", &cookie).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_profile() {
    let pool = common::setup_test_db();
    let (alice, cookie) = common::login_as(&pool, "alice", UserRole::User).await;
    let app = common::create_test_app(pool);

    let (status, user) = common::put(
        &app,
        &format!("/users/{}", alice.id),
        &cookie,
        json!({ "email": "alice@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["email"], "alice@example.com");
    assert_eq!(user["username"], "alice");
}

#[tokio::test]
async fn test_change_password_then_login() {
    let pool = common::setup_test_db();
    let (alice, cookie) = common::login_as(&pool, "alice", UserRole::User).await;
    let app = common::create_test_app(pool);

    let (status, _) = common::put(
        &app,
        &format!("/users/{}/password", alice.id),
        &cookie,
        json!({ "currentPassword": "password123", "newPassword": "brand-new-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The session used for the change stays valid.
    let (status, _) = common::get(&app, "/auth/me", &cookie).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::send(
        &app,
        axum::http::Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "brand-new-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_promote_user_requires_admin() {
    let pool = common::setup_test_db();
    let (_, admin_cookie) = common::login_as(&pool, "admin", UserRole::Admin).await;
    let (bob, bob_cookie) = common::login_as(&pool, "bob", UserRole::User).await;
    let app = common::create_test_app(pool);
    let uri = format!("/users/{}/role", bob.id);

    let (status, _) = common::put(&app, &uri, &bob_cookie, json!({ "role": "admin" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, user) = common::put(&app, &uri, &admin_cookie, json!({ "role": "admin" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["role"], "admin");
}

#[tokio::test]
async fn test_delete_user_cascades_sessions() {
    let pool = common::setup_test_db();
    let (_, admin_cookie) = common::login_as(&pool, "admin", UserRole::Admin).await;
    let (bob, bob_cookie) = common::login_as(&pool, "bob", UserRole::User).await;
    let app = common::create_test_app(pool);

    let (status, _) = common::delete(&app, &format!("/users/{}", bob.id), &admin_cookie).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = common::get(&app, "/auth/me", &bob_cookie).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let pool = common::setup_test_db();
    let (admin, cookie) = common::login_as(&pool, "admin", UserRole::Admin).await;
    let app = common::create_test_app(pool);

    let (status, _) = common::delete(&app, &format!("/users/{}", admin.id), &cookie).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
