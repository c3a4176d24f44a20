use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CreateExercise, ExerciseDetail, ExerciseFilters, MuscleGroupWithExercises};
use crate::repositories::ExerciseRepository;

#[derive(Clone)]
pub struct ExercisesState {
    pub exercise_repo: ExerciseRepository,
}

pub async fn list(
    State(state): State<ExercisesState>,
    _auth_user: AuthUser,
    Query(filters): Query<ExerciseFilters>,
) -> Result<Json<Vec<ExerciseDetail>>> {
    let exercises = state.exercise_repo.find_all(filters.muscle_group_id).await?;
    Ok(Json(exercises))
}

pub async fn create(
    State(state): State<ExercisesState>,
    _auth_user: AuthUser,
    Json(form): Json<CreateExercise>,
) -> Result<Response> {
    if form.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Exercise name is required".to_string(),
        ));
    }
    if state.exercise_repo.find_by_name(&form.name).await?.is_some() {
        return Err(AppError::BadRequest("Exercise already exists".to_string()));
    }
    if let Some(id) = &form.muscle_group_id {
        if state.exercise_repo.find_muscle_group(id).await?.is_none() {
            return Err(AppError::BadRequest("Unknown muscle group".to_string()));
        }
    }
    if let Some(id) = &form.exercise_type_id {
        if state.exercise_repo.find_exercise_type(id).await?.is_none() {
            return Err(AppError::BadRequest("Unknown exercise type".to_string()));
        }
    }

    let exercise = state
        .exercise_repo
        .create(
            &form.name,
            form.muscle_group_id.as_deref(),
            form.exercise_type_id.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(exercise)).into_response())
}

pub async fn muscle_groups(
    State(state): State<ExercisesState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<MuscleGroupWithExercises>>> {
    let groups = state.exercise_repo.find_muscle_groups_with_exercises().await?;
    Ok(Json(groups))
}
