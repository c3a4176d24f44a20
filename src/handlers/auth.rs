use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::cookies;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{LoginCredentials, RegisterUser, User};
use crate::repositories::{AuthTokenRepository, UserRepository};

#[derive(Clone)]
pub struct AuthState {
    pub user_repo: UserRepository,
    pub token_repo: AuthTokenRepository,
}

pub async fn register(
    State(state): State<AuthState>,
    Json(form): Json<RegisterUser>,
) -> Result<Response> {
    if form.username.trim().is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }
    if form.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if state
        .user_repo
        .find_by_username(&form.username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Username already exists".to_string()));
    }

    let user = state.user_repo.create(&form.username, &form.password).await?;

    Ok((StatusCode::CREATED, Json(user)).into_response())
}

pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Response> {
    let user = state
        .user_repo
        .verify_password(&credentials.username, &credentials.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let token = state.token_repo.create(&user.id).await?;
    let jar = jar.add(cookies::create_session_cookie(&token));

    Ok((jar, Json(user)).into_response())
}

pub async fn logout(State(state): State<AuthState>, jar: CookieJar) -> Result<Response> {
    if let Some(token) = cookies::get_session_token(&jar) {
        state.token_repo.delete(&token).await?;
    }

    let jar = jar.add(cookies::remove_session_cookie());
    Ok((jar, Json(json!({ "message": "Logged out successfully" }))).into_response())
}

pub async fn me(State(state): State<AuthState>, auth_user: AuthUser) -> Result<Json<User>> {
    let user = state
        .user_repo
        .find_by_id(&auth_user.id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(user))
}
