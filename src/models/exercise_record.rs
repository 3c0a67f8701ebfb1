use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::from_row::code_column;
use super::{FromSqliteRow, WeightUnit};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    pub id: String,
    pub user_id: String,
    pub exercise_id: String,
    pub date: NaiveDate,
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub reps: i32,
    pub sets: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for ExerciseRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            exercise_id: row.get("exercise_id")?,
            date: row.get("date")?,
            weight: row.get("weight")?,
            weight_unit: code_column(row, "weight_unit", WeightUnit::parse)?,
            reps: row.get("reps")?,
            sets: row.get("sets")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecordInput {
    pub exercise_id: String,
    pub date: NaiveDate,
    pub weight: f64,
    pub weight_unit: String,
    pub reps: i32,
    pub sets: i32,
    pub notes: Option<String>,
}
