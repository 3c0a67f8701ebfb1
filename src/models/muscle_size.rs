use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::from_row::code_column;
use super::{FromSqliteRow, SizeUnit};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleSize {
    pub id: String,
    pub user_id: String,
    pub muscle_id: String,
    pub size: f64,
    pub size_unit: SizeUnit,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for MuscleSize {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            muscle_id: row.get("muscle_id")?,
            size: row.get("size")?,
            size_unit: code_column(row, "size_unit", SizeUnit::parse)?,
            date: row.get("date")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Body of both create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleSizeInput {
    pub muscle_id: String,
    pub size: f64,
    pub size_unit: String,
    pub date: NaiveDate,
}
