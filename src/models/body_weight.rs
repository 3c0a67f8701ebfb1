use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::from_row::code_column;
use super::{FromSqliteRow, WeightUnit};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyWeight {
    pub id: String,
    pub user_id: String,
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for BodyWeight {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            weight: row.get("weight")?,
            weight_unit: code_column(row, "weight_unit", WeightUnit::parse)?,
            date: row.get("date")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyWeightInput {
    pub weight: f64,
    pub weight_unit: String,
    pub date: NaiveDate,
}
