use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::{interact, DbPool};
use crate::error::Result;
use crate::models::{BodyWeight, FromSqliteRow, WeightUnit};
use crate::pagination::{fetch_page, Column, Listing, Page, ValidatedPage};

pub const BODY_WEIGHT_LISTING: Listing = Listing {
    table: "body_weights",
    columns: &[
        Column { name: "weight", sql: "weight" },
        Column { name: "weightUnit", sql: "weight_unit" },
        Column { name: "date", sql: "date" },
        Column { name: "createdAt", sql: "created_at" },
    ],
    default_sort: "date DESC",
};

#[derive(Debug, Clone)]
pub struct BodyWeightValues {
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub date: NaiveDate,
}

#[derive(Clone)]
pub struct BodyWeightRepository {
    pool: DbPool,
}

impl BodyWeightRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<BodyWeight>> {
        let id = id.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM body_weights WHERE id = ?")?;
            Ok(stmt.query_row([&id], BodyWeight::from_row).optional()?)
        })
        .await
    }

    pub async fn find_latest(&self, user_id: &str) -> Result<Option<BodyWeight>> {
        let user_id = user_id.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM body_weights WHERE user_id = ?
                 ORDER BY date DESC, created_at DESC LIMIT 1",
            )?;
            Ok(stmt.query_row([&user_id], BodyWeight::from_row).optional()?)
        })
        .await
    }

    pub async fn list(&self, user_id: &str, page: ValidatedPage) -> Result<Page<BodyWeight>> {
        let user_id = user_id.to_string();
        interact(&self.pool, move |conn| {
            Ok(fetch_page(
                conn,
                &BODY_WEIGHT_LISTING,
                Some(("user_id", user_id.as_str())),
                &page,
            )?)
        })
        .await
    }

    pub async fn create(&self, user_id: &str, values: BodyWeightValues) -> Result<BodyWeight> {
        let entry = BodyWeight {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            weight: values.weight,
            weight_unit: values.weight_unit,
            date: values.date,
            created_at: Utc::now(),
        };
        let row = entry.clone();

        interact(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO body_weights (id, user_id, weight, weight_unit, date, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    row.id,
                    row.user_id,
                    row.weight,
                    row.weight_unit.as_str(),
                    row.date,
                    row.created_at
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(entry)
    }

    pub async fn update(&self, id: &str, user_id: &str, values: BodyWeightValues) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE body_weights SET weight = ?, weight_unit = ?, date = ?
                 WHERE id = ? AND user_id = ?",
                rusqlite::params![
                    values.weight,
                    values.weight_unit.as_str(),
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
                "DELETE FROM body_weights WHERE id = ? AND user_id = ?",
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
    use crate::pagination::PageRequest;

    fn setup() -> BodyWeightRepository {
        let pool = create_memory_pool().unwrap();
        run_migrations_for_tests(&pool).unwrap();
        {
            let conn = pool.get().unwrap();
            conn.execute(
                "INSERT INTO users (id, username, password_hash, role, created_at) VALUES ('user1', 'user1', 'hash', 'user', datetime('now'))",
                [],
            )
            .unwrap();
        }
        BodyWeightRepository::new(pool)
    }

    fn values(weight: f64, date: &str) -> BodyWeightValues {
        BodyWeightValues {
            weight,
            weight_unit: WeightUnit::Kilograms,
            date: date.parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_latest_is_by_date_not_insertion() {
        let repo = setup();
        assert!(repo.find_latest("user1").await.unwrap().is_none());

        repo.create("user1", values(80.0, "2024-05-10")).await.unwrap();
        repo.create("user1", values(82.0, "2024-04-01")).await.unwrap();

        let latest = repo.find_latest("user1").await.unwrap().unwrap();
        assert_eq!(latest.weight, 80.0);
    }

    #[tokio::test]
    async fn test_list_defaults_to_newest_first() {
        let repo = setup();
        for (i, date) in ["2024-01-01", "2024-01-02", "2024-01-03"].iter().enumerate() {
            repo.create("user1", values(80.0 + i as f64, date)).await.unwrap();
        }

        let page = PageRequest {
            page_size: Some(2),
            ..Default::default()
        }
        .validate(&BODY_WEIGHT_LISTING)
        .unwrap();
        let first = repo.list("user1", page).await.unwrap();

        assert_eq!(first.total_count, 3);
        assert_eq!(first.total_pages, 2);
        assert!(first.has_next_page);
        assert!(!first.has_previous_page);
        assert_eq!(first.data[0].weight, 82.0);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let repo = setup();
        repo.create("user1", values(80.0, "2024-01-01")).await.unwrap();

        let page = PageRequest {
            page_index: Some(5),
            ..Default::default()
        }
        .validate(&BODY_WEIGHT_LISTING)
        .unwrap();
        let result = repo.list("user1", page).await.unwrap();

        assert!(result.data.is_empty());
        assert_eq!(result.total_count, 1);
        assert!(!result.has_next_page);
        assert!(result.has_previous_page);
    }
}
