use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::cookies;
use crate::error::AppError;
use crate::repositories::AuthTokenRepository;

/// The authenticated caller, resolved from the `session` cookie against the
/// auth_tokens table. Handlers take this as an extractor; requests without a
/// valid token are rejected with 401 before the handler runs.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token_repo = parts
            .extensions
            .get::<AuthTokenRepository>()
            .cloned()
            .ok_or_else(|| AppError::Internal("auth token repository not configured".to_string()))?;

        let jar = CookieJar::from_headers(&parts.headers);
        let token = cookies::get_session_token(&jar).ok_or(AppError::Unauthorized)?;

        let user = token_repo
            .find_user_by_token(&token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser {
            id: user.id,
            username: user.username,
        })
    }
}
