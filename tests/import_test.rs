mod common;

use std::io::Write;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

use traintrack::import;

const EXERCISES_CSV: &str = "exercise,exercise_type,MuscleGroup\n\
    Bench Press,Barbell,Chest\n\
    Squat,Barbell,Legs\n\
    Row,Cable,Back\n";

const SESSIONS_CSV: &str = "Date,Exercise,Result,Weight,Status\n\
    2024-01-01,Bench Press - Barbell,3x5,100,Completed\n\
    2024-01-01,Squat,3x5,140,Completed\n\
    2024-01-02,Row - Cable,3x10,60,Completed\n\
    2024-01-02,Unknown Move - Cable,,40,Skipped\n";

fn write_csv(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_import_reconciles_and_persists() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let sessions_csv = write_csv(SESSIONS_CSV);
    let exercises_csv = write_csv(EXERCISES_CSV);

    let summary = import::run(&pool, "alice", sessions_csv.path(), exercises_csv.path())
        .await
        .unwrap();

    assert_eq!(summary.rows, 4);
    assert_eq!(summary.sessions_created, 2);
    assert_eq!(summary.entries_created, 4);
    assert_eq!(summary.entries_skipped, 0);
    assert_eq!(summary.unresolved, 1);

    // Suffixed names are stored bare, with their reference data resolved
    let conn = pool.get().unwrap();
    let (group, kind): (Option<String>, Option<String>) = conn
        .query_row(
            "SELECT mg.name, et.name FROM exercises e
             LEFT JOIN muscle_groups mg ON mg.id = e.muscle_group_id
             LEFT JOIN exercise_types et ON et.id = e.exercise_type_id
             WHERE e.name = 'Bench Press'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(group.as_deref(), Some("Chest"));
    assert_eq!(kind.as_deref(), Some("Barbell"));

    // The unresolved row is persisted without reference data
    let (group, kind): (Option<String>, Option<String>) = conn
        .query_row(
            "SELECT muscle_group_id, exercise_type_id FROM exercises WHERE name = 'Unknown Move'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert!(group.is_none());
    assert!(kind.is_none());

    // Imported sessions belong to the requested user
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sessions WHERE user_id = ?",
            [&user.id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_import_twice_is_idempotent() {
    let pool = common::setup_test_db();
    common::create_test_user(&pool, "alice", "password123").await;
    let sessions_csv = write_csv(SESSIONS_CSV);
    let exercises_csv = write_csv(EXERCISES_CSV);

    import::run(&pool, "alice", sessions_csv.path(), exercises_csv.path())
        .await
        .unwrap();
    let second = import::run(&pool, "alice", sessions_csv.path(), exercises_csv.path())
        .await
        .unwrap();

    assert_eq!(second.sessions_created, 0);
    assert_eq!(second.entries_created, 0);
    assert_eq!(second.entries_skipped, 4);

    let conn = pool.get().unwrap();
    let entries: i64 = conn
        .query_row("SELECT COUNT(*) FROM session_entries", [], |row| row.get(0))
        .unwrap();
    assert_eq!(entries, 4);
}

#[tokio::test]
async fn test_imported_sessions_are_served_by_the_api() {
    let pool = common::setup_test_db();
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let cookie = common::login_cookie(&pool, &user).await;
    let sessions_csv = write_csv(SESSIONS_CSV);
    let exercises_csv = write_csv(EXERCISES_CSV);

    import::run(&pool, "alice", sessions_csv.path(), exercises_csv.path())
        .await
        .unwrap();

    let app = common::create_test_app(pool);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/sessions?date_to=2024-01-01")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let sessions = body.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    let entries = sessions[0]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries
        .iter()
        .any(|e| e["exercise"]["name"] == "Bench Press"));
}

#[tokio::test]
async fn test_import_unknown_user_fails() {
    let pool = common::setup_test_db();
    let sessions_csv = write_csv(SESSIONS_CSV);
    let exercises_csv = write_csv(EXERCISES_CSV);

    let err = import::run(&pool, "nobody", sessions_csv.path(), exercises_csv.path())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("unknown user"));
}

#[tokio::test]
async fn test_import_rejects_malformed_reference_data() {
    let pool = common::setup_test_db();
    common::create_test_user(&pool, "alice", "password123").await;
    let sessions_csv = write_csv(SESSIONS_CSV);
    let exercises_csv = write_csv(
        "exercise,exercise_type,MuscleGroup\n\
         Bench Press,,Chest\n",
    );

    let err = import::run(&pool, "alice", sessions_csv.path(), exercises_csv.path())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid reference row"));

    // Nothing was persisted
    let conn = pool.get().unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
