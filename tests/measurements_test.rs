mod common;

use axum::http::{Method, StatusCode};
use fittrack::models::UserRole;
use serde_json::json;

#[tokio::test]
async fn test_body_weight_flow() {
    let pool = common::setup_test_db();
    let (_, cookie) = common::login_as(&pool, "alice", UserRole::User).await;
    let app = common::create_test_app(pool);

    let (status, _) = common::get(&app, "/body-weights/latest", &cookie).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, first) = common::post(
        &app,
        "/body-weights",
        &cookie,
        json!({ "weight": 82.5, "weightUnit": "kg", "date": "2024-01-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["weightUnit"], "kg");

    common::post(
        &app,
        "/body-weights",
        &cookie,
        json!({ "weight": 180.0, "weightUnit": "lb", "date": "2024-02-01" }),
    )
    .await;

    let (status, latest) = common::get(&app, "/body-weights/latest", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["weightUnit"], "lb");

    let (_, page) = common::get(&app, "/body-weights", &cookie).await;
    assert_eq!(page["totalCount"], 2);
    assert_eq!(page["data"][0]["date"], "2024-02-01");

    let uri = format!("/body-weights/{}", first["id"].as_str().unwrap());
    let (status, updated) = common::put(
        &app,
        &uri,
        &cookie,
        json!({ "weight": 81.0, "weightUnit": "kg", "date": "2024-01-02" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["weight"], 81.0);

    let (status, _) = common::delete(&app, &uri, &cookie).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_body_weight_validation() {
    let pool = common::setup_test_db();
    let (_, cookie) = common::login_as(&pool, "alice", UserRole::User).await;
    let app = common::create_test_app(pool);

    for body in [
        json!({ "weight": -1.0, "weightUnit": "kg", "date": "2024-01-01" }),
        json!({ "weight": 80.0, "weightUnit": "stone", "date": "2024-01-01" }),
        json!({ "weight": 80.0, "weightUnit": "kg", "date": "2999-01-01" }),
        json!({ "weight": 80.0, "weightUnit": "kg", "date": "yesterday" }),
    ] {
        let (status, _) = common::post(&app, "/body-weights", &cookie, body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    }
}

#[tokio::test]
async fn test_muscle_size_flow() {
    let pool = common::setup_test_db();
    let (_, alice) = common::login_as(&pool, "alice", UserRole::User).await;
    let (_, bob) = common::login_as(&pool, "bob", UserRole::User).await;
    let app = common::create_test_app(pool);

    let (status, size) = common::post(
        &app,
        "/muscle-sizes",
        &alice,
        json!({
            "muscleId": common::BICEPS_ID,
            "size": 38.0,
            "sizeUnit": "cm",
            "date": "2024-03-01"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/muscle-sizes/{}", size["id"].as_str().unwrap());

    let (status, list) = common::get(
        &app,
        &format!("/muscle-sizes/by-muscle/{}", common::BICEPS_ID),
        &alice,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = common::get(&app, &uri, &bob).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = common::put(
        &app,
        &uri,
        &alice,
        json!({
            "muscleId": common::BICEPS_ID,
            "size": 15.0,
            "sizeUnit": "in",
            "date": "2024-03-01"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["sizeUnit"], "in");

    let (status, _) = common::delete(&app, &uri, &alice).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_muscle_size_unknown_muscle() {
    let pool = common::setup_test_db();
    let (_, cookie) = common::login_as(&pool, "alice", UserRole::User).await;
    let app = common::create_test_app(pool);

    let (status, body) = common::post(
        &app,
        "/muscle-sizes",
        &cookie,
        json!({
            "muscleId": uuid::Uuid::new_v4().to_string(),
            "size": 38.0,
            "sizeUnit": "cm",
            "date": "2024-03-01"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Muscle not found");
}

#[tokio::test]
async fn test_measurements_require_login() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    for (method, uri, body) in [
        (Method::GET, "/body-weights", None),
        (Method::GET, "/body-weights/latest", None),
        (Method::GET, "/muscle-sizes", None),
    ] {
        let (status, response) = common::send(&app, method, uri, None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(response["error"], "Unauthorized");
    }
}
