//! Body measurements: muscle sizes and body weight.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::Result;
use crate::extract::{JsonBody, QueryParams};
use crate::middleware::AuthUser;
use crate::models::{BodyWeight, BodyWeightInput, MuscleSize, MuscleSizeInput};
use crate::pagination::{Page, PageRequest};
use crate::services::{BodyWeightService, MuscleSizeService};

// Muscle sizes

pub async fn list_muscle_sizes(
    State(sizes): State<MuscleSizeService>,
    user: AuthUser,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<Json<Page<MuscleSize>>> {
    Ok(Json(sizes.list(&user, &page).await?))
}

pub async fn muscle_sizes_by_muscle(
    State(sizes): State<MuscleSizeService>,
    user: AuthUser,
    Path(muscle_id): Path<String>,
) -> Result<Json<Vec<MuscleSize>>> {
    Ok(Json(sizes.list_by_muscle(&user, &muscle_id).await?))
}

pub async fn create_muscle_size(
    State(sizes): State<MuscleSizeService>,
    user: AuthUser,
    JsonBody(input): JsonBody<MuscleSizeInput>,
) -> Result<(StatusCode, Json<MuscleSize>)> {
    let size = sizes.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(size)))
}

pub async fn show_muscle_size(
    State(sizes): State<MuscleSizeService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MuscleSize>> {
    Ok(Json(sizes.get(&user, &id).await?))
}

pub async fn update_muscle_size(
    State(sizes): State<MuscleSizeService>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<MuscleSizeInput>,
) -> Result<Json<MuscleSize>> {
    Ok(Json(sizes.update(&user, &id, input).await?))
}

pub async fn delete_muscle_size(
    State(sizes): State<MuscleSizeService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    sizes.delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Body weights

pub async fn list_body_weights(
    State(weights): State<BodyWeightService>,
    user: AuthUser,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<Json<Page<BodyWeight>>> {
    Ok(Json(weights.list(&user, &page).await?))
}

pub async fn latest_body_weight(
    State(weights): State<BodyWeightService>,
    user: AuthUser,
) -> Result<Json<BodyWeight>> {
    Ok(Json(weights.latest(&user).await?))
}

pub async fn create_body_weight(
    State(weights): State<BodyWeightService>,
    user: AuthUser,
    JsonBody(input): JsonBody<BodyWeightInput>,
) -> Result<(StatusCode, Json<BodyWeight>)> {
    let weight = weights.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(weight)))
}

pub async fn show_body_weight(
    State(weights): State<BodyWeightService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<BodyWeight>> {
    Ok(Json(weights.get(&user, &id).await?))
}

pub async fn update_body_weight(
    State(weights): State<BodyWeightService>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<BodyWeightInput>,
) -> Result<Json<BodyWeight>> {
    Ok(Json(weights.update(&user, &id, input).await?))
}

pub async fn delete_body_weight(
    State(weights): State<BodyWeightService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    weights.delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
