use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::{interact, DbPool};
use crate::error::Result;

pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct SessionRepository {
    pool: DbPool,
}

impl SessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new session for a user. Returns the session token.
    pub async fn create(&self, user_id: &str) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let user_id = user_id.to_string();
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(SESSION_TTL_DAYS);

        interact(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![token, user_id, now, expires_at],
            )?;
            Ok(token)
        })
        .await
    }

    /// Find a valid (non-expired) session and return its user_id.
    /// Lazily deletes the session if it has expired.
    pub async fn find_valid(&self, token: &str) -> Result<Option<String>> {
        let token = token.to_string();
        let now = Utc::now();

        interact(&self.pool, move |conn| {
            let result: Option<(String, DateTime<Utc>)> = conn
                .query_row(
                    "SELECT user_id, expires_at FROM sessions WHERE token = ?",
                    [&token],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            match result {
                Some((_, expires_at)) if expires_at <= now => {
                    conn.execute("DELETE FROM sessions WHERE token = ?", [&token])?;
                    Ok(None)
                }
                Some((user_id, _)) => Ok(Some(user_id)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Delete a single session (logout).
    pub async fn delete(&self, token: &str) -> Result<()> {
        let token = token.to_string();
        interact(&self.pool, move |conn| {
            conn.execute("DELETE FROM sessions WHERE token = ?", [&token])?;
            Ok(())
        })
        .await
    }

    /// Delete all sessions for a user except the given token (for password change).
    pub async fn delete_all_for_user_except(&self, user_id: &str, keep_token: &str) -> Result<()> {
        let user_id = user_id.to_string();
        let keep_token = keep_token.to_string();
        interact(&self.pool, move |conn| {
            conn.execute(
                "DELETE FROM sessions WHERE user_id = ? AND token != ?",
                rusqlite::params![user_id, keep_token],
            )?;
            Ok(())
        })
        .await
    }

    /// Batch delete all expired sessions. Returns how many were removed.
    pub async fn cleanup_expired(&self) -> Result<usize> {
        let now = Utc::now();
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM sessions WHERE expires_at <= ?",
                rusqlite::params![now],
            )?;
            Ok(rows)
        })
        .await
    }
}
