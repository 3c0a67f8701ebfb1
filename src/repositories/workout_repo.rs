use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::{interact, DbPool};
use crate::error::Result;
use crate::models::{FromSqliteRow, Workout, WorkoutExercise};
use crate::pagination::{fetch_page, Column, Listing, Page, ValidatedPage};

use super::on_duplicate;

pub const WORKOUT_LISTING: Listing = Listing {
    table: "workouts",
    columns: &[
        Column { name: "name", sql: "name" },
        Column { name: "description", sql: "description" },
        Column { name: "createdAt", sql: "created_at" },
    ],
    default_sort: "name",
};

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Workout>> {
        let id = id.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?")?;
            Ok(stmt.query_row([&id], Workout::from_row).optional()?)
        })
        .await
    }

    pub async fn find_by_name(&self, user_id: &str, name: &str) -> Result<Option<Workout>> {
        let user_id = user_id.to_string();
        let name = name.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM workouts WHERE user_id = ? AND name = ?")?;
            Ok(stmt
                .query_row([&user_id, &name], Workout::from_row)
                .optional()?)
        })
        .await
    }

    pub async fn list(&self, user_id: &str, page: ValidatedPage) -> Result<Page<Workout>> {
        let user_id = user_id.to_string();
        interact(&self.pool, move |conn| {
            Ok(fetch_page(
                conn,
                &WORKOUT_LISTING,
                Some(("user_id", user_id.as_str())),
                &page,
            )?)
        })
        .await
    }

    pub async fn create(
        &self,
        user_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Workout> {
        let workout = Workout {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };
        let row = workout.clone();

        interact(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO workouts (id, user_id, name, description, created_at)
                 VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![row.id, row.user_id, row.name, row.description, row.created_at],
            )
            .map_err(on_duplicate("A workout with this name already exists"))?;
            Ok(())
        })
        .await?;

        Ok(workout)
    }

    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        let name = name.to_string();
        let description = description.map(str::to_string);
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE workouts SET name = ?, description = ? WHERE id = ? AND user_id = ?",
                rusqlite::params![name, description, id, user_id],
            )
            .map_err(on_duplicate("A workout with this name already exists"))?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM workouts WHERE id = ? AND user_id = ?",
                rusqlite::params![id, user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    // Exercises in a workout

    pub async fn list_exercises(&self, workout_id: &str) -> Result<Vec<WorkoutExercise>> {
        let workout_id = workout_id.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT e.*, we.position FROM workout_exercises we
                 JOIN exercises e ON e.id = we.exercise_id
                 WHERE we.workout_id = ?
                 ORDER BY we.position",
            )?;
            let exercises = stmt
                .query_map([&workout_id], WorkoutExercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
    }

    pub async fn contains_exercise(&self, workout_id: &str, exercise_id: &str) -> Result<bool> {
        let workout_id = workout_id.to_string();
        let exercise_id = exercise_id.to_string();
        interact(&self.pool, move |conn| {
            let exists: bool = conn.query_row(
                "SELECT COUNT(*) > 0 FROM workout_exercises WHERE workout_id = ? AND exercise_id = ?",
                [&workout_id, &exercise_id],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }

    /// Append an exercise at the end of the workout. Returns its position.
    pub async fn add_exercise(&self, workout_id: &str, exercise_id: &str) -> Result<i64> {
        let workout_id = workout_id.to_string();
        let exercise_id = exercise_id.to_string();
        interact(&self.pool, move |conn| {
            let position: i64 = conn.query_row(
                "SELECT COALESCE(MAX(position), 0) + 1 FROM workout_exercises WHERE workout_id = ?",
                [&workout_id],
                |row| row.get(0),
            )?;
            conn.execute(
                "INSERT INTO workout_exercises (workout_id, exercise_id, position) VALUES (?, ?, ?)",
                rusqlite::params![workout_id, exercise_id, position],
            )
            .map_err(on_duplicate("Exercise is already part of this workout"))?;
            Ok(position)
        })
        .await
    }

    pub async fn remove_exercise(&self, workout_id: &str, exercise_id: &str) -> Result<bool> {
        let workout_id = workout_id.to_string();
        let exercise_id = exercise_id.to_string();
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM workout_exercises WHERE workout_id = ? AND exercise_id = ?",
                [&workout_id, &exercise_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }
}
