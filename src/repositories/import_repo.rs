use chrono::{NaiveDate, Utc};
use rusqlite::{OptionalExtension, Transaction};
use uuid::Uuid;

use crate::db::DbPool;
use crate::import::{ImportError, ImportSummary, NormalizedRow};

/// Persistence sink for the legacy import. The whole batch runs in a single
/// transaction: every referenced entity is looked up or inserted by its
/// natural key, and an entry identical to one already present is skipped,
/// so re-running an import is a no-op.
#[derive(Clone)]
pub struct ImportRepository {
    pool: DbPool,
}

impl ImportRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn import(
        &self,
        user_id: &str,
        rows: Vec<NormalizedRow>,
    ) -> Result<ImportSummary, ImportError> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            let mut summary = ImportSummary {
                rows: rows.len(),
                ..Default::default()
            };

            for (index, row) in rows.iter().enumerate() {
                let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|_| {
                    ImportError::InvalidDate {
                        row: index + 1,
                        value: row.date.clone(),
                    }
                })?;

                let muscle_group_id = match row.muscle_group.as_deref() {
                    Some(name) => Some(get_or_create_named(&tx, "muscle_groups", name)?),
                    None => None,
                };
                let exercise_type_id = match row.exercise_type.as_deref() {
                    Some(name) => Some(get_or_create_named(&tx, "exercise_types", name)?),
                    None => None,
                };
                let exercise_id = get_or_create_exercise(
                    &tx,
                    &row.exercise,
                    muscle_group_id.as_deref(),
                    exercise_type_id.as_deref(),
                )?;

                let (session_id, created) = get_or_create_session(&tx, &user_id, date)?;
                if created {
                    summary.sessions_created += 1;
                }

                let duplicate: bool = tx.query_row(
                    "SELECT COUNT(*) > 0 FROM session_entries
                     WHERE session_id = ? AND exercise_id = ? AND weight = ? AND status = ?",
                    rusqlite::params![session_id, exercise_id, row.weight, row.status],
                    |r| r.get(0),
                )?;
                if duplicate {
                    summary.entries_skipped += 1;
                    continue;
                }

                tx.execute(
                    "INSERT INTO session_entries (id, session_id, exercise_id, weight, status, created_at)
                     VALUES (?, ?, ?, ?, ?, ?)",
                    rusqlite::params![
                        Uuid::new_v4().to_string(),
                        session_id,
                        exercise_id,
                        row.weight,
                        row.status,
                        Utc::now()
                    ],
                )?;
                summary.entries_created += 1;
            }

            tx.commit()?;
            Ok(summary)
        })
        .await?
    }
}

/// Lookup-or-insert for the two (id, name) reference tables.
fn get_or_create_named(tx: &Transaction, table: &str, name: &str) -> rusqlite::Result<String> {
    let existing: Option<String> = tx
        .query_row(
            &format!("SELECT id FROM {table} WHERE name = ?"),
            [name],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    tx.execute(
        &format!("INSERT INTO {table} (id, name) VALUES (?, ?)"),
        rusqlite::params![id, name],
    )?;
    Ok(id)
}

/// Exercises are keyed by name; an existing exercise keeps its stored group
/// and type even if this batch resolved them differently.
fn get_or_create_exercise(
    tx: &Transaction,
    name: &str,
    muscle_group_id: Option<&str>,
    exercise_type_id: Option<&str>,
) -> rusqlite::Result<String> {
    let existing: Option<String> = tx
        .query_row("SELECT id FROM exercises WHERE name = ?", [name], |row| {
            row.get(0)
        })
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    tx.execute(
        "INSERT INTO exercises (id, name, legacy_name, muscle_group_id, exercise_type_id)
         VALUES (?, ?, ?, ?, ?)",
        rusqlite::params![id, name, name, muscle_group_id, exercise_type_id],
    )?;
    Ok(id)
}

fn get_or_create_session(
    tx: &Transaction,
    user_id: &str,
    date: NaiveDate,
) -> rusqlite::Result<(String, bool)> {
    let existing: Option<String> = tx
        .query_row(
            "SELECT id FROM sessions WHERE user_id = ? AND date = ?",
            rusqlite::params![user_id, date],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok((id, false));
    }

    let id = Uuid::new_v4().to_string();
    tx.execute(
        "INSERT INTO sessions (id, user_id, date, notes, completed, created_at)
         VALUES (?, ?, ?, '', 1, ?)",
        rusqlite::params![id, user_id, date, Utc::now()],
    )?;
    Ok((id, true))
}
