use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize)]
pub struct MuscleGroup {
    pub id: String,
    pub name: String,
}

impl FromSqliteRow for MuscleGroup {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseType {
    pub id: String,
    pub name: String,
}

impl FromSqliteRow for ExerciseType {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }
}

/// Exercise with its muscle group and equipment type resolved, as served by
/// the API. Group and type stay optional: imported rows that never matched
/// the reference table have neither.
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseDetail {
    pub id: String,
    pub name: String,
    pub legacy_name: String,
    pub muscle_group: Option<MuscleGroup>,
    pub exercise_type: Option<ExerciseType>,
}

impl FromSqliteRow for ExerciseDetail {
    /// Expects the exercise joined against muscle_groups and exercise_types
    /// with `muscle_group_id`/`muscle_group_name` and
    /// `exercise_type_id`/`exercise_type_name` column aliases.
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let muscle_group = match (
            row.get::<_, Option<String>>("muscle_group_id")?,
            row.get::<_, Option<String>>("muscle_group_name")?,
        ) {
            (Some(id), Some(name)) => Some(MuscleGroup { id, name }),
            _ => None,
        };
        let exercise_type = match (
            row.get::<_, Option<String>>("exercise_type_id")?,
            row.get::<_, Option<String>>("exercise_type_name")?,
        ) {
            (Some(id), Some(name)) => Some(ExerciseType { id, name }),
            _ => None,
        };
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            legacy_name: row.get("legacy_name")?,
            muscle_group,
            exercise_type,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MuscleGroupWithExercises {
    pub id: String,
    pub name: String,
    pub exercises: Vec<ExerciseDetail>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExercise {
    pub name: String,
    pub muscle_group_id: Option<String>,
    pub exercise_type_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExerciseFilters {
    pub muscle_group_id: Option<String>,
}
