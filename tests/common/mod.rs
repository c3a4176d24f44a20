use axum::Router;
use http_body_util::BodyExt;

use traintrack::db::{create_memory_pool, DbPool};
use traintrack::migrations::run_migrations_for_tests;
use traintrack::models::{ExerciseDetail, User};
use traintrack::repositories::{
    AuthTokenRepository, ExerciseRepository, SessionRepository, UserRepository,
};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    use traintrack::handlers::{auth, exercises, sessions};

    let user_repo = UserRepository::new(pool.clone());
    let token_repo = AuthTokenRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let session_repo = SessionRepository::new(pool.clone());

    let auth_state = auth::AuthState {
        user_repo,
        token_repo: token_repo.clone(),
    };
    let exercises_state = exercises::ExercisesState {
        exercise_repo: exercise_repo.clone(),
    };
    let sessions_state = sessions::SessionsState {
        session_repo,
        exercise_repo,
    };

    traintrack::routes::create_router(auth_state, exercises_state, sessions_state, token_repo)
}

pub async fn create_test_user(pool: &DbPool, username: &str, password: &str) -> User {
    UserRepository::new(pool.clone())
        .create(username, password)
        .await
        .unwrap()
}

/// Value for a `Cookie` header authenticating as the given user.
pub async fn login_cookie(pool: &DbPool, user: &User) -> String {
    let token = AuthTokenRepository::new(pool.clone())
        .create(&user.id)
        .await
        .unwrap();
    format!("session={token}")
}

pub fn seed_muscle_group(pool: &DbPool, id: &str, name: &str) {
    let conn = pool.get().unwrap();
    conn.execute(
        "INSERT INTO muscle_groups (id, name) VALUES (?, ?)",
        rusqlite::params![id, name],
    )
    .unwrap();
}

pub fn seed_exercise_type(pool: &DbPool, id: &str, name: &str) {
    let conn = pool.get().unwrap();
    conn.execute(
        "INSERT INTO exercise_types (id, name) VALUES (?, ?)",
        rusqlite::params![id, name],
    )
    .unwrap();
}

pub async fn create_test_exercise(
    pool: &DbPool,
    name: &str,
    muscle_group_id: Option<&str>,
    exercise_type_id: Option<&str>,
) -> ExerciseDetail {
    ExerciseRepository::new(pool.clone())
        .create(name, muscle_group_id, exercise_type_id)
        .await
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
