//! Legacy exercise reconciliation.
//!
//! Historical CSV exports name exercises in two conventions: an older
//! free-text one ("Bench Press") and a newer one with the equipment type
//! embedded ("Bench Press - Barbell"). Reconciliation resolves every session
//! row against the reference table to a single bare exercise name plus its
//! equipment type and muscle group, where known.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// The closed equipment-type vocabulary. Only these values are recognised
/// when stripping a `" - <Type>"` suffix from a session row's exercise name.
pub const EQUIPMENT_TYPES: &[&str] = &[
    "Barbell",
    "Dumbell",
    "Cable",
    "Machine",
    "Smith",
    "Kettlebell",
    "Body",
    "Erg",
    "Run",
    "Bike",
    "T-Bar",
    "Plate",
];

/// One row of a legacy session export. Field names follow the CSV column
/// contract: `Date,Exercise,Result,Weight,Status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Exercise")]
    pub exercise: String,
    #[serde(rename = "Result")]
    pub result: String,
    /// Opaque: historical exports contain non-numeric values (time stamps,
    /// band colours) that are carried through verbatim.
    #[serde(rename = "Weight")]
    pub weight: String,
    #[serde(rename = "Status")]
    pub status: String,
}

/// One row of the exercise reference table
/// (`exercise,exercise_type,MuscleGroup` columns).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExerciseRef {
    pub exercise: String,
    pub exercise_type: String,
    #[serde(rename = "MuscleGroup")]
    pub muscle_group: String,
}

/// A session row with its exercise name normalised to the bare legacy form
/// and the equipment type / muscle group resolved where a reference matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub date: String,
    pub exercise: String,
    pub exercise_type: Option<String>,
    pub muscle_group: Option<String>,
    pub result: String,
    pub weight: String,
    pub status: String,
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("invalid reference row {index}: {reason}")]
    InvalidReferenceData { index: usize, reason: &'static str },
}

/// The result of one reconciliation pass: one output row per input row, in
/// input order, plus the indices of rows no reference entry matched.
#[derive(Debug)]
pub struct Reconciliation {
    pub rows: Vec<NormalizedRow>,
    pub unresolved: Vec<usize>,
}

impl Reconciliation {
    /// Distinct unmatched exercise names, in order of first appearance.
    pub fn unresolved_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for &index in &self.unresolved {
            let name = self.rows[index].exercise.as_str();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// Remove a trailing `" - <Type>"` suffix when `<Type>` is in the closed
/// vocabulary; otherwise return the name unchanged.
pub fn strip_type_suffix(name: &str) -> &str {
    for equipment in EQUIPMENT_TYPES {
        if let Some(prefix) = name.strip_suffix(equipment) {
            if let Some(bare) = prefix.strip_suffix(" - ") {
                return bare;
            }
        }
    }
    name
}

/// Resolve each session row against the reference table.
///
/// Two lookup stages, in order:
/// 1. the reference's bare `exercise` name against the row's legacy name
///    (suffix stripped);
/// 2. the reference's synthesized full name (`exercise - exercise_type`)
///    against the row's original, unstripped name.
///
/// The matching stage supplies both the equipment type and the muscle group.
/// When reference entries collide on a lookup key, the first occurrence in
/// input order wins. Rows neither stage matches are emitted with both fields
/// empty and recorded as unresolved; that is expected for incrementally
/// maintained reference data, not an error.
pub fn reconcile(
    session_rows: &[SessionRow],
    exercise_refs: &[ExerciseRef],
) -> Result<Reconciliation, ReconcileError> {
    let mut by_name: HashMap<&str, &ExerciseRef> = HashMap::new();
    let mut by_full_name: HashMap<String, &ExerciseRef> = HashMap::new();

    for (index, reference) in exercise_refs.iter().enumerate() {
        if reference.exercise.trim().is_empty() {
            return Err(ReconcileError::InvalidReferenceData {
                index,
                reason: "missing exercise name",
            });
        }
        if reference.exercise_type.trim().is_empty() {
            return Err(ReconcileError::InvalidReferenceData {
                index,
                reason: "missing exercise type",
            });
        }
        by_name.entry(reference.exercise.as_str()).or_insert(reference);
        by_full_name
            .entry(format!("{} - {}", reference.exercise, reference.exercise_type))
            .or_insert(reference);
    }

    let mut rows = Vec::with_capacity(session_rows.len());
    let mut unresolved = Vec::new();

    for (index, session) in session_rows.iter().enumerate() {
        let legacy_name = strip_type_suffix(&session.exercise);
        let matched = by_name
            .get(legacy_name)
            .or_else(|| by_full_name.get(session.exercise.as_str()))
            .copied();

        if matched.is_none() {
            unresolved.push(index);
        }

        rows.push(NormalizedRow {
            date: session.date.clone(),
            exercise: legacy_name.to_string(),
            exercise_type: matched.map(|r| r.exercise_type.clone()),
            muscle_group: matched.and_then(|r| {
                if r.muscle_group.trim().is_empty() {
                    None
                } else {
                    Some(r.muscle_group.clone())
                }
            }),
            result: session.result.clone(),
            weight: session.weight.clone(),
            status: session.status.clone(),
        });
    }

    Ok(Reconciliation { rows, unresolved })
}
