//! CSV readers for the legacy import.
//!
//! Column names are a fixed contract; a file with missing or renamed
//! headers fails here, before any reconciliation runs.

use std::path::Path;

use super::reconcile::{ExerciseRef, SessionRow};

pub fn read_session_rows(path: &Path) -> Result<Vec<SessionRow>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    reader.deserialize().collect()
}

pub fn read_exercise_refs(path: &Path) -> Result<Vec<ExerciseRef>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    reader.deserialize().collect()
}
