use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Muscle {
    pub id: String,
    pub name: String,
    pub muscle_group: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for Muscle {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            muscle_group: row.get("muscle_group")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMuscle {
    pub name: String,
    pub muscle_group: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMuscle {
    pub name: String,
    pub muscle_group: Option<String>,
}
