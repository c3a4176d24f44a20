use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::handlers::{auth, exercises, health, sessions};
use crate::repositories::AuthTokenRepository;

pub fn create_router(
    auth_state: auth::AuthState,
    exercises_state: exercises::ExercisesState,
    sessions_state: sessions::SessionsState,
    token_repo: AuthTokenRepository,
) -> Router {
    Router::new()
        .route("/health", get(health::check))
        // Auth routes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .with_state(auth_state)
        // Shared reference data
        .route("/api/muscle-groups", get(exercises::muscle_groups))
        .route(
            "/api/exercises",
            get(exercises::list).post(exercises::create),
        )
        .with_state(exercises_state)
        // Per-user session data
        .route(
            "/api/sessions",
            get(sessions::list).post(sessions::create),
        )
        .route("/api/sessions/{id}", get(sessions::show))
        .route("/api/sessions/{id}/entries", post(sessions::add_entry))
        .with_state(sessions_state)
        // Token lookup for the AuthUser extractor
        .layer(Extension(token_repo))
}
