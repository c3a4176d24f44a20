use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, User};

/// Login tokens backing the `session` cookie. Each token row maps to a user
/// and expires seven days after creation.
#[derive(Clone)]
pub struct AuthTokenRepository {
    pool: DbPool,
}

impl AuthTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new login token for a user. Returns the token value.
    pub async fn create(&self, user_id: &str) -> Result<String> {
        let pool = self.pool.clone();
        let token = Uuid::new_v4().to_string();
        let user_id = user_id.to_string();
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);
        let token_clone = token.clone();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO auth_tokens (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![token_clone, user_id, now, expires_at],
            )?;
            Ok(token_clone)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Resolve a token to its user, if the token is still valid.
    /// Lazily deletes the token if it has expired.
    pub async fn find_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let pool = self.pool.clone();
        let token = token.to_string();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let result: Option<(chrono::DateTime<Utc>, User)> = conn
                .query_row(
                    "SELECT t.expires_at, u.id, u.username, u.password_hash, u.created_at
                     FROM auth_tokens t
                     JOIN users u ON u.id = t.user_id
                     WHERE t.token = ?",
                    [&token],
                    |row| Ok((row.get("expires_at")?, User::from_row(row)?)),
                )
                .optional()?;

            match result {
                Some((expires_at, _)) if expires_at <= now => {
                    // Lazily delete expired token
                    conn.execute("DELETE FROM auth_tokens WHERE token = ?", [&token])?;
                    Ok(None)
                }
                Some((_, user)) => Ok(Some(user)),
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Delete a single token (logout).
    pub async fn delete(&self, token: &str) -> Result<()> {
        let pool = self.pool.clone();
        let token = token.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute("DELETE FROM auth_tokens WHERE token = ?", [&token])?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
