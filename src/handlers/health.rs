use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::db::{interact, DbPool};
use crate::version::GIT_VERSION;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: &'static str,
}

/// Liveness plus a trivial query against the database. Answers 503 when the
/// database cannot be reached.
pub async fn health_check(State(pool): State<DbPool>) -> (StatusCode, Json<HealthResponse>) {
    let database = interact(&pool, |conn| {
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    })
    .await;

    match database {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                version: GIT_VERSION,
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    version: GIT_VERSION,
                    database: "unavailable",
                }),
            )
        }
    }
}
