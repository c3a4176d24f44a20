use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    ExerciseDetail, ExerciseType, FromSqliteRow, MuscleGroup, MuscleGroupWithExercises,
};

const EXERCISE_SELECT: &str = "SELECT e.id, e.name, e.legacy_name,
        mg.id AS muscle_group_id, mg.name AS muscle_group_name,
        et.id AS exercise_type_id, et.name AS exercise_type_name
 FROM exercises e
 LEFT JOIN muscle_groups mg ON mg.id = e.muscle_group_id
 LEFT JOIN exercise_types et ON et.id = e.exercise_type_id";

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, muscle_group_id: Option<String>) -> Result<Vec<ExerciseDetail>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut sql = String::from(EXERCISE_SELECT);
            if muscle_group_id.is_some() {
                sql.push_str(" WHERE e.muscle_group_id = ?");
            }
            sql.push_str(" ORDER BY e.name");

            let mut stmt = conn.prepare(&sql)?;
            let exercises = match muscle_group_id {
                Some(group_id) => stmt
                    .query_map([&group_id], ExerciseDetail::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?,
                None => stmt
                    .query_map([], ExerciseDetail::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?,
            };
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<ExerciseDetail>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let sql = format!("{EXERCISE_SELECT} WHERE e.id = ?");
            let mut stmt = conn.prepare(&sql)?;
            let result = stmt.query_row([&id], ExerciseDetail::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<ExerciseDetail>> {
        let pool = self.pool.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let sql = format!("{EXERCISE_SELECT} WHERE e.name = ?");
            let mut stmt = conn.prepare(&sql)?;
            let result = stmt.query_row([&name], ExerciseDetail::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(
        &self,
        name: &str,
        muscle_group_id: Option<&str>,
        exercise_type_id: Option<&str>,
    ) -> Result<ExerciseDetail> {
        let id = Uuid::new_v4().to_string();
        let pool = self.pool.clone();
        let name = name.to_string();
        let muscle_group_id = muscle_group_id.map(|s| s.to_string());
        let exercise_type_id = exercise_type_id.map(|s| s.to_string());
        let id_clone = id.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO exercises (id, name, legacy_name, muscle_group_id, exercise_type_id)
                 VALUES (?, ?, '', ?, ?)",
                rusqlite::params![id_clone, name, muscle_group_id, exercise_type_id],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::Internal("exercise vanished after insert".to_string()))
    }

    pub async fn find_muscle_group(&self, id: &str) -> Result<Option<MuscleGroup>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT id, name FROM muscle_groups WHERE id = ?")?;
            let result = stmt.query_row([&id], MuscleGroup::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_exercise_type(&self, id: &str) -> Result<Option<ExerciseType>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT id, name FROM exercise_types WHERE id = ?")?;
            let result = stmt.query_row([&id], ExerciseType::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Muscle groups with their exercises nested, for the reference listing.
    pub async fn find_muscle_groups_with_exercises(&self) -> Result<Vec<MuscleGroupWithExercises>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT id, name FROM muscle_groups ORDER BY name")?;
            let groups = stmt
                .query_map([], MuscleGroup::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let sql = format!("{EXERCISE_SELECT} WHERE e.muscle_group_id = ? ORDER BY e.name");
            let mut stmt = conn.prepare(&sql)?;
            let mut result = Vec::with_capacity(groups.len());
            for group in groups {
                let exercises = stmt
                    .query_map([&group.id], ExerciseDetail::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                result.push(MuscleGroupWithExercises {
                    id: group.id,
                    name: group.name,
                    exercises,
                });
            }
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
