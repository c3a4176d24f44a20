use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CreateSession, CreateSessionEntry, SessionFilters, SessionWithEntries};
use crate::repositories::{ExerciseRepository, SessionRepository};

#[derive(Clone)]
pub struct SessionsState {
    pub session_repo: SessionRepository,
    pub exercise_repo: ExerciseRepository,
}

pub async fn list(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Query(filters): Query<SessionFilters>,
) -> Result<Json<Vec<SessionWithEntries>>> {
    let sessions = state.session_repo.find_for_user(&auth_user.id, filters).await?;

    let mut result = Vec::with_capacity(sessions.len());
    for session in sessions {
        let entries = state.session_repo.find_entries(&session.id).await?;
        result.push(SessionWithEntries::new(session, entries));
    }
    Ok(Json(result))
}

pub async fn create(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Json(form): Json<CreateSession>,
) -> Result<Response> {
    let session = state
        .session_repo
        .create(&auth_user.id, form.date, &form.notes, form.completed)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionWithEntries::new(session, Vec::new())),
    )
        .into_response())
}

pub async fn show(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SessionWithEntries>> {
    let session = state
        .session_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;

    let entries = state.session_repo.find_entries(&session.id).await?;
    Ok(Json(SessionWithEntries::new(session, entries)))
}

pub async fn add_entry(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(form): Json<CreateSessionEntry>,
) -> Result<Response> {
    let session = state
        .session_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;

    if state
        .exercise_repo
        .find_by_id(&form.exercise_id)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest("Unknown exercise".to_string()));
    }

    // Don't allow the same exercise twice in one session
    if state
        .session_repo
        .entry_exists(&session.id, &form.exercise_id)
        .await?
    {
        return Err(AppError::BadRequest(
            "This exercise is already added to the session".to_string(),
        ));
    }

    let entry = state
        .session_repo
        .add_entry(&session.id, &form.exercise_id, &form.weight, &form.status)
        .await?;

    Ok((StatusCode::CREATED, Json(entry)).into_response())
}
