use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rand_core::OsRng;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::{interact, DbPool};
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, User, UserRole};
use crate::pagination::{fetch_page, Column, Listing, Page, ValidatedPage};

use super::on_duplicate;

pub const USER_LISTING: Listing = Listing {
    table: "users",
    columns: &[
        Column { name: "username", sql: "username" },
        Column { name: "email", sql: "email" },
        Column { name: "role", sql: "role" },
        Column { name: "createdAt", sql: "created_at" },
    ],
    default_sort: "username",
};

#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        interact(&self.pool, |conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?")?;
            let result = stmt.query_row([&id], User::from_row).optional()?;
            Ok(result)
        })
        .await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();
        interact(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM users WHERE username = ?")?;
            let result = stmt.query_row([&username], User::from_row).optional()?;
            Ok(result)
        })
        .await
    }

    pub async fn list(&self, page: ValidatedPage) -> Result<Page<User>> {
        interact(&self.pool, move |conn| {
            Ok(fetch_page(conn, &USER_LISTING, None, &page)?)
        })
        .await
    }

    pub async fn create(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
        role: UserRole,
    ) -> Result<User> {
        self.insert(username, email, password, Some(role)).await
    }

    /// Insert an account whose role is decided by the same statement: admin
    /// when the table is empty, a regular user otherwise.
    pub async fn create_first_admin(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
    ) -> Result<User> {
        self.insert(username, email, password, None).await
    }

    async fn insert(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
        role: Option<UserRole>,
    ) -> Result<User> {
        let id = Uuid::new_v4().to_string();
        let username = username.to_string();
        let email = email.map(str::to_string);
        let password_hash = hash_password(password)?;
        let created_at = Utc::now();

        interact(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password_hash, role, created_at)
                 SELECT ?1, ?2, ?3, ?4,
                        COALESCE(?5, CASE WHEN EXISTS (SELECT 1 FROM users)
                                          THEN 'user' ELSE 'admin' END),
                        ?6",
                rusqlite::params![
                    id,
                    username,
                    email,
                    password_hash,
                    role.as_ref().map(UserRole::as_str),
                    created_at
                ],
            )
            .map_err(on_duplicate("Username already exists"))?;

            let user = conn.query_row("SELECT * FROM users WHERE id = ?", [&id], User::from_row)?;
            Ok(user)
        })
        .await
    }

    pub async fn verify_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = self.find_by_username(username).await?;

        match user {
            Some(user) => {
                if verify_password(password, &user.password_hash)? {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    pub async fn update_profile(
        &self,
        id: &str,
        username: &str,
        email: Option<&str>,
    ) -> Result<bool> {
        let id = id.to_string();
        let username = username.to_string();
        let email = email.map(str::to_string);
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE users SET username = ?, email = ? WHERE id = ?",
                rusqlite::params![username, email, id],
            )
            .map_err(on_duplicate("Username already exists"))?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn update_password(&self, id: &str, new_password: &str) -> Result<bool> {
        let password_hash = hash_password(new_password)?;
        let id = id.to_string();
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE users SET password_hash = ? WHERE id = ?",
                rusqlite::params![password_hash, id],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn update_role(&self, id: &str, role: UserRole) -> Result<bool> {
        let id = id.to_string();
        interact(&self.pool, move |conn| {
            let rows = conn.execute(
                "UPDATE users SET role = ? WHERE id = ?",
                rusqlite::params![role.as_str(), id],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        interact(&self.pool, move |conn| {
            let rows = conn.execute("DELETE FROM users WHERE id = ?", [&id])?;
            Ok(rows > 0)
        })
        .await
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::PasswordHash)?
        .to_string();
    Ok(password_hash)
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::PasswordHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
