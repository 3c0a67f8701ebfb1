use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::{interact, DbPool};
use crate::error::Result;
use crate::models::{FromSqliteRow, Muscle};
use crate::pagination::{fetch_page, Column, Listing, Page, ValidatedPage};

use super::on_duplicate;

pub const MUSCLE_LISTING: Listing = Listing {
    table: "muscles",
    columns: &[
        Column { name: "name", sql: "name" },
        Column { name: "muscleGroup", sql: "muscle_group" },
        Column { name: "createdAt", sql: "created_at" },
    ],
    default_sort: "name",
};

#[derive(Clone)]
pub struct MuscleRepository {
    pool: DbPool,
}

impl MuscleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Muscle>> {
        let id = id.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM muscles WHERE id = ?")?;
            Ok(stmt.query_row([&id], Muscle::from_row).optional()?)
        })
        .await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Muscle>> {
        let name = name.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM muscles WHERE name = ?")?;
            Ok(stmt.query_row([&name], Muscle::from_row).optional()?)
        })
        .await
    }

    pub async fn list(&self, page: ValidatedPage) -> Result<Page<Muscle>> {
        interact(&self.pool, move |conn| {
            Ok(fetch_page(conn, &MUSCLE_LISTING, None, &page)?)
        })
        .await
    }

    pub async fn create(&self, name: &str, muscle_group: Option<&str>) -> Result<Muscle> {
        let muscle = Muscle {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            muscle_group: muscle_group.map(str::to_string),
            created_at: Utc::now(),
        };
        let row = muscle.clone();

        interact(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO muscles (id, name, muscle_group, created_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![row.id, row.name, row.muscle_group, row.created_at],
            )
            .map_err(on_duplicate("A muscle with this name already exists"))?;
            Ok(())
        })
        .await?;

        Ok(muscle)
    }

    pub async fn update(&self, id: &str, name: &str, muscle_group: Option<&str>) -> Result<bool> {
        let id = id.to_string();
        let name = name.to_string();
        let muscle_group = muscle_group.map(str::to_string);
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE muscles SET name = ?, muscle_group = ? WHERE id = ?",
                rusqlite::params![name, muscle_group, id],
            )
            .map_err(on_duplicate("A muscle with this name already exists"))?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        interact(&self.pool, move |conn| {
            let rows = conn.execute("DELETE FROM muscles WHERE id = ?", [&id])?;
            Ok(rows > 0)
        })
        .await
    }
}
