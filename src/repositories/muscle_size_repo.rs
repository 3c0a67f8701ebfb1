use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::{interact, DbPool};
use crate::error::Result;
use crate::models::{FromSqliteRow, MuscleSize, SizeUnit};
use crate::pagination::{fetch_page, Column, Listing, Page, ValidatedPage};

pub const MUSCLE_SIZE_LISTING: Listing = Listing {
    table: "muscle_sizes",
    columns: &[
        Column { name: "muscleId", sql: "muscle_id" },
        Column { name: "size", sql: "size" },
        Column { name: "sizeUnit", sql: "size_unit" },
        Column { name: "date", sql: "date" },
        Column { name: "createdAt", sql: "created_at" },
    ],
    default_sort: "date DESC",
};

/// Validated values for a muscle size row.
#[derive(Debug, Clone)]
pub struct MuscleSizeValues {
    pub muscle_id: String,
    pub size: f64,
    pub size_unit: SizeUnit,
    pub date: NaiveDate,
}

#[derive(Clone)]
pub struct MuscleSizeRepository {
    pool: DbPool,
}

impl MuscleSizeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<MuscleSize>> {
        let id = id.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM muscle_sizes WHERE id = ?")?;
            Ok(stmt.query_row([&id], MuscleSize::from_row).optional()?)
        })
        .await
    }

    pub async fn list(&self, user_id: &str, page: ValidatedPage) -> Result<Page<MuscleSize>> {
        let user_id = user_id.to_string();
        interact(&self.pool, move |conn| {
            Ok(fetch_page(
                conn,
                &MUSCLE_SIZE_LISTING,
                Some(("user_id", user_id.as_str())),
                &page,
            )?)
        })
        .await
    }

    pub async fn list_by_muscle(&self, user_id: &str, muscle_id: &str) -> Result<Vec<MuscleSize>> {
        let user_id = user_id.to_string();
        let muscle_id = muscle_id.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM muscle_sizes WHERE user_id = ? AND muscle_id = ?
                 ORDER BY date DESC, created_at DESC",
            )?;
            let sizes = stmt
                .query_map([&user_id, &muscle_id], MuscleSize::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(sizes)
        })
        .await
    }

    pub async fn create(&self, user_id: &str, values: MuscleSizeValues) -> Result<MuscleSize> {
        let size = MuscleSize {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            muscle_id: values.muscle_id,
            size: values.size,
            size_unit: values.size_unit,
            date: values.date,
            created_at: Utc::now(),
        };
        let row = size.clone();

        interact(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO muscle_sizes (id, user_id, muscle_id, size, size_unit, date, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    row.id,
                    row.user_id,
                    row.muscle_id,
                    row.size,
                    row.size_unit.as_str(),
                    row.date,
                    row.created_at
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(size)
    }

    pub async fn update(&self, id: &str, user_id: &str, values: MuscleSizeValues) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE muscle_sizes SET muscle_id = ?, size = ?, size_unit = ?, date = ?
                 WHERE id = ? AND user_id = ?",
                rusqlite::params![
                    values.muscle_id,
                    values.size,
                    values.size_unit.as_str(),
                    values.date,
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
                "DELETE FROM muscle_sizes WHERE id = ? AND user_id = ?",
                rusqlite::params![id, user_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }
}
