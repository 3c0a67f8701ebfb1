use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::{interact, DbPool};
use crate::error::Result;
use crate::models::{Exercise, FromSqliteRow, Muscle};
use crate::pagination::{fetch_page, Column, Listing, Page, ValidatedPage};

use super::on_duplicate;

pub const EXERCISE_LISTING: Listing = Listing {
    table: "exercises",
    columns: &[
        Column { name: "name", sql: "name" },
        Column { name: "description", sql: "description" },
        Column { name: "createdAt", sql: "created_at" },
    ],
    default_sort: "name",
};

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Exercise>> {
        let id = id.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?")?;
            let result = stmt.query_row([&id], Exercise::from_row).optional()?;
            Ok(result)
        })
        .await
    }

    pub async fn find_by_name(&self, user_id: &str, name: &str) -> Result<Option<Exercise>> {
        let user_id = user_id.to_string();
        let name = name.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM exercises WHERE user_id = ? AND name = ?")?;
            let result = stmt
                .query_row([&user_id, &name], Exercise::from_row)
                .optional()?;
            Ok(result)
        })
        .await
    }

    pub async fn list(&self, user_id: &str, page: ValidatedPage) -> Result<Page<Exercise>> {
        let user_id = user_id.to_string();
        interact(&self.pool, move |conn| {
            Ok(fetch_page(
                conn,
                &EXERCISE_LISTING,
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
    ) -> Result<Exercise> {
        let exercise = Exercise {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };
        let exercise_clone = exercise.clone();

        interact(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO exercises (id, user_id, name, description, created_at)
                 VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![
                    exercise_clone.id,
                    exercise_clone.user_id,
                    exercise_clone.name,
                    exercise_clone.description,
                    exercise_clone.created_at
                ],
            )
            .map_err(on_duplicate("An exercise with this name already exists"))?;
            Ok(())
        })
        .await?;

        Ok(exercise)
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
                "UPDATE exercises SET name = ?, description = ? WHERE id = ? AND user_id = ?",
                rusqlite::params![name, description, id, user_id],
            )
            .map_err(on_duplicate("An exercise with this name already exists"))?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM exercises WHERE id = ? AND user_id = ?",
                rusqlite::params![id, user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    // Targeted muscles

    pub async fn list_muscles(&self, exercise_id: &str) -> Result<Vec<Muscle>> {
        let exercise_id = exercise_id.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT m.* FROM exercise_muscles em
                 JOIN muscles m ON m.id = em.muscle_id
                 WHERE em.exercise_id = ?
                 ORDER BY m.name",
            )?;
            let muscles = stmt
                .query_map([&exercise_id], Muscle::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(muscles)
        })
        .await
    }

    /// Link a muscle to an exercise. Returns false if it was already linked.
    pub async fn add_muscle(&self, exercise_id: &str, muscle_id: &str) -> Result<bool> {
        let exercise_id = exercise_id.to_string();
        let muscle_id = muscle_id.to_string();
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "INSERT OR IGNORE INTO exercise_muscles (exercise_id, muscle_id) VALUES (?, ?)",
                [&exercise_id, &muscle_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn remove_muscle(&self, exercise_id: &str, muscle_id: &str) -> Result<bool> {
        let exercise_id = exercise_id.to_string();
        let muscle_id = muscle_id.to_string();
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM exercise_muscles WHERE exercise_id = ? AND muscle_id = ?",
                [&exercise_id, &muscle_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }
}
