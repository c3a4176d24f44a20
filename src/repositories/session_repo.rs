use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, Session, SessionEntryWithExercise, SessionFilters};

const ENTRY_SELECT: &str = "SELECT se.id, se.weight, se.status,
        e.id AS exercise_id, e.name AS exercise_name, e.legacy_name AS exercise_legacy_name,
        mg.id AS muscle_group_id, mg.name AS muscle_group_name,
        et.id AS exercise_type_id, et.name AS exercise_type_name
 FROM session_entries se
 JOIN exercises e ON e.id = se.exercise_id
 LEFT JOIN muscle_groups mg ON mg.id = e.muscle_group_id
 LEFT JOIN exercise_types et ON et.id = e.exercise_type_id";

#[derive(Clone)]
pub struct SessionRepository {
    pool: DbPool,
}

impl SessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Sessions for one user, newest first, with the list filters translated
    /// into SQL. Exercise and muscle-group filters go through the entry join
    /// and deduplicate with DISTINCT.
    pub async fn find_for_user(
        &self,
        user_id: &str,
        filters: SessionFilters,
    ) -> Result<Vec<Session>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;

            let mut sql = String::from(
                "SELECT DISTINCT s.id, s.user_id, s.date, s.notes, s.completed, s.created_at
                 FROM sessions s",
            );
            if filters.exercise_id.is_some() || filters.muscle_group_id.is_some() {
                sql.push_str(
                    " JOIN session_entries se ON se.session_id = s.id
                      JOIN exercises e ON e.id = se.exercise_id",
                );
            }
            sql.push_str(" WHERE s.user_id = ?");

            let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];
            if let Some(date_from) = filters.date_from {
                sql.push_str(" AND s.date >= ?");
                params.push(Box::new(date_from));
            }
            if let Some(date_to) = filters.date_to {
                sql.push_str(" AND s.date <= ?");
                params.push(Box::new(date_to));
            }
            if let Some(completed) = filters.completed {
                sql.push_str(" AND s.completed = ?");
                params.push(Box::new(completed));
            }
            if let Some(exercise_id) = filters.exercise_id {
                sql.push_str(" AND se.exercise_id = ?");
                params.push(Box::new(exercise_id));
            }
            if let Some(muscle_group_id) = filters.muscle_group_id {
                sql.push_str(" AND e.muscle_group_id = ?");
                params.push(Box::new(muscle_group_id));
            }
            sql.push_str(" ORDER BY s.date DESC");

            let mut stmt = conn.prepare(&sql)?;
            let sessions = stmt
                .query_map(
                    rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
                    Session::from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(sessions)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<Session>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM sessions WHERE id = ? AND user_id = ?")?;
            let result = stmt
                .query_row([&id, &user_id], Session::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(
        &self,
        user_id: &str,
        date: NaiveDate,
        notes: &str,
        completed: bool,
    ) -> Result<Session> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let session = Session {
            id: id.clone(),
            user_id: user_id.to_string(),
            date,
            notes: notes.to_string(),
            completed,
            created_at: now,
        };
        let session_clone = session.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO sessions (id, user_id, date, notes, completed, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    session_clone.id,
                    session_clone.user_id,
                    session_clone.date,
                    session_clone.notes,
                    session_clone.completed,
                    session_clone.created_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(session)
    }

    pub async fn find_entries(&self, session_id: &str) -> Result<Vec<SessionEntryWithExercise>> {
        let pool = self.pool.clone();
        let session_id = session_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let sql = format!("{ENTRY_SELECT} WHERE se.session_id = ? ORDER BY se.created_at, se.id");
            let mut stmt = conn.prepare(&sql)?;
            let entries = stmt
                .query_map([&session_id], SessionEntryWithExercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn entry_exists(&self, session_id: &str, exercise_id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let session_id = session_id.to_string();
        let exercise_id = exercise_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let exists: bool = conn.query_row(
                "SELECT COUNT(*) > 0 FROM session_entries WHERE session_id = ? AND exercise_id = ?",
                [&session_id, &exercise_id],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn add_entry(
        &self,
        session_id: &str,
        exercise_id: &str,
        weight: &str,
        status: &str,
    ) -> Result<SessionEntryWithExercise> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let pool = self.pool.clone();
        let session_id = session_id.to_string();
        let exercise_id = exercise_id.to_string();
        let weight = weight.to_string();
        let status = status.to_string();
        let id_clone = id.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO session_entries (id, session_id, exercise_id, weight, status, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![id_clone, session_id, exercise_id, weight, status, now],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        self.find_entry_by_id(&id)
            .await?
            .ok_or_else(|| AppError::Internal("entry vanished after insert".to_string()))
    }

    pub async fn find_entry_by_id(&self, id: &str) -> Result<Option<SessionEntryWithExercise>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let sql = format!("{ENTRY_SELECT} WHERE se.id = ?");
            let mut stmt = conn.prepare(&sql)?;
            let result = stmt
                .query_row([&id], SessionEntryWithExercise::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
