//! One-off import of legacy CSV exports.
//!
//! Pipeline: read the session and exercise-reference CSVs, reconcile
//! exercise names against the reference table, then hand the normalized
//! rows to the transactional sink ([`ImportRepository`]) for idempotent
//! upserts.

pub mod reader;
pub mod reconcile;

use std::path::Path;

use anyhow::Context;
use thiserror::Error;

use crate::db::DbPool;
use crate::repositories::{ImportRepository, UserRepository};

pub use reconcile::{reconcile, NormalizedRow, Reconciliation, ReconcileError};

/// Failures of the persistence stage. Any of these aborts the whole batch;
/// the surrounding transaction rolls back and nothing is persisted.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("row {row}: invalid date {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { row: usize, value: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("import task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Counters reported after an import run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows: usize,
    pub sessions_created: usize,
    pub entries_created: usize,
    pub entries_skipped: usize,
    pub unresolved: usize,
}

/// Run a full import of one legacy session export for the given user.
pub async fn run(
    pool: &DbPool,
    username: &str,
    sessions_path: &Path,
    exercises_path: &Path,
) -> anyhow::Result<ImportSummary> {
    let users = UserRepository::new(pool.clone());
    let user = users
        .find_by_username(username)
        .await?
        .with_context(|| format!("unknown user: {username}"))?;

    let session_rows = reader::read_session_rows(sessions_path)
        .with_context(|| format!("failed to read {}", sessions_path.display()))?;
    let exercise_refs = reader::read_exercise_refs(exercises_path)
        .with_context(|| format!("failed to read {}", exercises_path.display()))?;

    tracing::info!(
        sessions = session_rows.len(),
        references = exercise_refs.len(),
        "Reconciling legacy exercise names"
    );

    let reconciliation = reconcile(&session_rows, &exercise_refs)?;
    if !reconciliation.unresolved.is_empty() {
        tracing::warn!(
            count = reconciliation.unresolved.len(),
            names = ?reconciliation.unresolved_names(),
            "Rows without a reference match; imported without type or muscle group"
        );
    }
    let unresolved = reconciliation.unresolved.len();

    let importer = ImportRepository::new(pool.clone());
    let mut summary = importer.import(&user.id, reconciliation.rows).await?;
    summary.unresolved = unresolved;

    tracing::info!(
        rows = summary.rows,
        sessions_created = summary.sessions_created,
        entries_created = summary.entries_created,
        entries_skipped = summary.entries_skipped,
        unresolved = summary.unresolved,
        "Import finished"
    );

    Ok(summary)
}
