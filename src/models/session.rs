use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{ExerciseDetail, FromSqliteRow};

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub notes: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for Session {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            notes: row.get("notes")?,
            completed: row.get("completed")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionEntryWithExercise {
    pub id: String,
    pub exercise: ExerciseDetail,
    pub weight: String,
    pub status: String,
}

impl FromSqliteRow for SessionEntryWithExercise {
    /// Expects session_entries joined against exercises (aliased
    /// `exercise_id`/`exercise_name`/`exercise_legacy_name`) which in turn
    /// carry the `muscle_group_*` and `exercise_type_*` aliases used by
    /// [`ExerciseDetail`].
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let muscle_group = match (
            row.get::<_, Option<String>>("muscle_group_id")?,
            row.get::<_, Option<String>>("muscle_group_name")?,
        ) {
            (Some(id), Some(name)) => Some(super::MuscleGroup { id, name }),
            _ => None,
        };
        let exercise_type = match (
            row.get::<_, Option<String>>("exercise_type_id")?,
            row.get::<_, Option<String>>("exercise_type_name")?,
        ) {
            (Some(id), Some(name)) => Some(super::ExerciseType { id, name }),
            _ => None,
        };
        Ok(Self {
            id: row.get("id")?,
            exercise: ExerciseDetail {
                id: row.get("exercise_id")?,
                name: row.get("exercise_name")?,
                legacy_name: row.get("exercise_legacy_name")?,
                muscle_group,
                exercise_type,
            },
            weight: row.get("weight")?,
            status: row.get("status")?,
        })
    }
}

/// A session as served by the API, entries nested within.
#[derive(Debug, Serialize)]
pub struct SessionWithEntries {
    pub id: String,
    pub date: NaiveDate,
    pub notes: String,
    pub completed: bool,
    pub entries: Vec<SessionEntryWithExercise>,
}

impl SessionWithEntries {
    pub fn new(session: Session, entries: Vec<SessionEntryWithExercise>) -> Self {
        Self {
            id: session.id,
            date: session.date,
            notes: session.notes,
            completed: session.completed,
            entries,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSession {
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionEntry {
    pub exercise_id: String,
    pub weight: String,
    pub status: String,
}

/// Query parameters accepted by the session list endpoint, translated into
/// SQL by the repository.
#[derive(Debug, Default, Deserialize)]
pub struct SessionFilters {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub completed: Option<bool>,
    pub exercise_id: Option<String>,
    pub muscle_group_id: Option<String>,
}
