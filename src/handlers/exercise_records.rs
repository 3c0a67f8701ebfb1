use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::Result;
use crate::extract::{JsonBody, QueryParams};
use crate::middleware::AuthUser;
use crate::models::{ExerciseRecord, ExerciseRecordInput};
use crate::pagination::{Page, PageRequest};
use crate::services::ExerciseRecordService;

pub async fn list(
    State(records): State<ExerciseRecordService>,
    user: AuthUser,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<Json<Page<ExerciseRecord>>> {
    Ok(Json(records.list(&user, &page).await?))
}

pub async fn by_exercise(
    State(records): State<ExerciseRecordService>,
    user: AuthUser,
    Path(exercise_id): Path<String>,
) -> Result<Json<Vec<ExerciseRecord>>> {
    Ok(Json(records.list_by_exercise(&user, &exercise_id).await?))
}

pub async fn best(
    State(records): State<ExerciseRecordService>,
    user: AuthUser,
    Path(exercise_id): Path<String>,
) -> Result<Json<ExerciseRecord>> {
    Ok(Json(records.best_for_exercise(&user, &exercise_id).await?))
}

pub async fn create(
    State(records): State<ExerciseRecordService>,
    user: AuthUser,
    JsonBody(input): JsonBody<ExerciseRecordInput>,
) -> Result<(StatusCode, Json<ExerciseRecord>)> {
    let record = records.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn show(
    State(records): State<ExerciseRecordService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ExerciseRecord>> {
    Ok(Json(records.get(&user, &id).await?))
}

pub async fn update(
    State(records): State<ExerciseRecordService>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ExerciseRecordInput>,
) -> Result<Json<ExerciseRecord>> {
    Ok(Json(records.update(&user, &id, input).await?))
}

pub async fn delete(
    State(records): State<ExerciseRecordService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    records.delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
