mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

#[tokio::test]
async fn test_exercises_require_auth() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/exercises")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_exercises() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let cookie = common::login_cookie(&pool, &user).await;
    common::seed_muscle_group(&pool, "mg1", "Chest");
    common::seed_exercise_type(&pool, "et1", "Barbell");
    let app = common::create_test_app(pool);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/exercises")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"name":"Bench Press","muscle_group_id":"mg1","exercise_type_id":"et1"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = common::body_json(response).await;
    assert_eq!(body["name"], "Bench Press");
    assert_eq!(body["muscle_group"]["name"], "Chest");
    assert_eq!(body["exercise_type"]["name"], "Barbell");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/exercises")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Bench Press");
}

#[tokio::test]
async fn test_create_exercise_requires_name() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let cookie = common::login_cookie(&pool, &user).await;
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/exercises")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"  "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "Exercise name is required");
}

#[tokio::test]
async fn test_create_exercise_rejects_unknown_muscle_group() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let cookie = common::login_cookie(&pool, &user).await;
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/exercises")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"name":"Bench Press","muscle_group_id":"nope"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "Unknown muscle group");
}

#[tokio::test]
async fn test_create_exercise_rejects_duplicate_name() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let cookie = common::login_cookie(&pool, &user).await;
    common::create_test_exercise(&pool, "Bench Press", None, None).await;
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/exercises")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"Bench Press"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "Exercise already exists");
}

#[tokio::test]
async fn test_list_exercises_filtered_by_muscle_group() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let cookie = common::login_cookie(&pool, &user).await;
    common::seed_muscle_group(&pool, "mg1", "Chest");
    common::seed_muscle_group(&pool, "mg2", "Legs");
    common::create_test_exercise(&pool, "Bench Press", Some("mg1"), None).await;
    common::create_test_exercise(&pool, "Squat", Some("mg2"), None).await;
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/exercises?muscle_group_id=mg2")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Squat");
}

#[tokio::test]
async fn test_muscle_groups_nest_their_exercises() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let cookie = common::login_cookie(&pool, &user).await;
    common::seed_muscle_group(&pool, "mg1", "Chest");
    common::seed_muscle_group(&pool, "mg2", "Legs");
    common::create_test_exercise(&pool, "Bench Press", Some("mg1"), None).await;
    common::create_test_exercise(&pool, "Incline Press", Some("mg1"), None).await;
    let app = common::create_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/muscle-groups")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let groups = body.as_array().unwrap();
    assert_eq!(groups.len(), 2);

    let chest = groups.iter().find(|g| g["name"] == "Chest").unwrap();
    assert_eq!(chest["exercises"].as_array().unwrap().len(), 2);
    let legs = groups.iter().find(|g| g["name"] == "Legs").unwrap();
    assert!(legs["exercises"].as_array().unwrap().is_empty());
}
