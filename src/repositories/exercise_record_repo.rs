use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::{interact, DbPool};
use crate::error::Result;
use crate::models::{ExerciseRecord, FromSqliteRow, WeightUnit};
use crate::pagination::{fetch_page, Column, Listing, Page, ValidatedPage};

pub const EXERCISE_RECORD_LISTING: Listing = Listing {
    table: "exercise_records",
    columns: &[
        Column { name: "exerciseId", sql: "exercise_id" },
        Column { name: "date", sql: "date" },
        Column { name: "weight", sql: "weight" },
        Column { name: "weightUnit", sql: "weight_unit" },
        Column { name: "reps", sql: "reps" },
        Column { name: "sets", sql: "sets" },
        Column { name: "createdAt", sql: "created_at" },
    ],
    default_sort: "date DESC",
};

#[derive(Debug, Clone)]
pub struct ExerciseRecordValues {
    pub exercise_id: String,
    pub date: NaiveDate,
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub reps: i32,
    pub sets: i32,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct ExerciseRecordRepository {
    pool: DbPool,
}

impl ExerciseRecordRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<ExerciseRecord>> {
        let id = id.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM exercise_records WHERE id = ?")?;
            Ok(stmt.query_row([&id], ExerciseRecord::from_row).optional()?)
        })
        .await
    }

    pub async fn list(&self, user_id: &str, page: ValidatedPage) -> Result<Page<ExerciseRecord>> {
        let user_id = user_id.to_string();
        interact(&self.pool, move |conn| {
            Ok(fetch_page(
                conn,
                &EXERCISE_RECORD_LISTING,
                Some(("user_id", user_id.as_str())),
                &page,
            )?)
        })
        .await
    }

    pub async fn list_by_exercise(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Vec<ExerciseRecord>> {
        let user_id = user_id.to_string();
        let exercise_id = exercise_id.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM exercise_records WHERE user_id = ? AND exercise_id = ?
                 ORDER BY date DESC, created_at DESC",
            )?;
            let records = stmt
                .query_map([&user_id, &exercise_id], ExerciseRecord::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
        .await
    }

    /// Heaviest record for an exercise; more reps wins a tie, then the earlier date.
    ///
    /// Pounds are converted to kilograms for the comparison so mixed units rank
    /// correctly.
    pub async fn find_best(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Option<ExerciseRecord>> {
        let user_id = user_id.to_string();
        let exercise_id = exercise_id.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM exercise_records WHERE user_id = ? AND exercise_id = ?
                 ORDER BY CASE weight_unit WHEN 'lb' THEN weight * 0.45359237 ELSE weight END DESC,
                          reps DESC, date ASC
                 LIMIT 1",
            )?;
            Ok(stmt
                .query_row([&user_id, &exercise_id], ExerciseRecord::from_row)
                .optional()?)
        })
        .await
    }

    pub async fn create(
        &self,
        user_id: &str,
        values: ExerciseRecordValues,
    ) -> Result<ExerciseRecord> {
        let record = ExerciseRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            exercise_id: values.exercise_id,
            date: values.date,
            weight: values.weight,
            weight_unit: values.weight_unit,
            reps: values.reps,
            sets: values.sets,
            notes: values.notes,
            created_at: Utc::now(),
        };
        let row = record.clone();

        interact(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO exercise_records
                    (id, user_id, exercise_id, date, weight, weight_unit, reps, sets, notes, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    row.id,
                    row.user_id,
                    row.exercise_id,
                    row.date,
                    row.weight,
                    row.weight_unit.as_str(),
                    row.reps,
                    row.sets,
                    row.notes,
                    row.created_at
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(record)
    }

    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        values: ExerciseRecordValues,
    ) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE exercise_records
                 SET exercise_id = ?, date = ?, weight = ?, weight_unit = ?, reps = ?, sets = ?, notes = ?
                 WHERE id = ? AND user_id = ?",
                rusqlite::params![
                    values.exercise_id,
                    values.date,
                    values.weight,
                    values.weight_unit.as_str(),
                    values.reps,
                    values.sets,
                    values.notes,
                    id,
                    user_id
                ],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM exercise_records WHERE id = ? AND user_id = ?",
                rusqlite::params![id, user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;

    fn setup() -> ExerciseRecordRepository {
        let pool = create_memory_pool().unwrap();
        run_migrations_for_tests(&pool).unwrap();
        {
            let conn = pool.get().unwrap();
            conn.execute_batch(
                "INSERT INTO users (id, username, password_hash, role, created_at)
                     VALUES ('user1', 'user1', 'hash', 'user', datetime('now'));
                 INSERT INTO exercises (id, user_id, name, created_at)
                     VALUES ('squat', 'user1', 'Squat', datetime('now'));",
            )
            .unwrap();
        }
        ExerciseRecordRepository::new(pool)
    }

    fn values(weight: f64, unit: WeightUnit, reps: i32, date: &str) -> ExerciseRecordValues {
        ExerciseRecordValues {
            exercise_id: "squat".to_string(),
            date: date.parse().unwrap(),
            weight,
            weight_unit: unit,
            reps,
            sets: 3,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_best_compares_across_units() {
        let repo = setup();
        repo.create("user1", values(100.0, WeightUnit::Kilograms, 5, "2024-01-01"))
            .await
            .unwrap();
        // 225 lb is about 102 kg
        let heavier = repo
            .create("user1", values(225.0, WeightUnit::Pounds, 3, "2024-01-08"))
            .await
            .unwrap();

        let best = repo.find_best("user1", "squat").await.unwrap().unwrap();
        assert_eq!(best.id, heavier.id);
    }

    #[tokio::test]
    async fn test_best_tie_breaks_on_reps() {
        let repo = setup();
        repo.create("user1", values(100.0, WeightUnit::Kilograms, 3, "2024-01-01"))
            .await
            .unwrap();
        let more_reps = repo
            .create("user1", values(100.0, WeightUnit::Kilograms, 5, "2024-01-08"))
            .await
            .unwrap();

        let best = repo.find_best("user1", "squat").await.unwrap().unwrap();
        assert_eq!(best.id, more_reps.id);
    }

    #[tokio::test]
    async fn test_best_none_without_records() {
        let repo = setup();
        assert!(repo.find_best("user1", "squat").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_newest_first_and_notes_roundtrip() {
        let repo = setup();
        let mut first = values(90.0, WeightUnit::Kilograms, 5, "2024-01-01");
        first.notes = Some("felt heavy".to_string());
        repo.create("user1", first).await.unwrap();
        repo.create("user1", values(95.0, WeightUnit::Kilograms, 5, "2024-01-05"))
            .await
            .unwrap();

        let history = repo.list_by_exercise("user1", "squat").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].weight, 95.0);
        assert_eq!(history[1].notes.as_deref(), Some("felt heavy"));
    }
}
