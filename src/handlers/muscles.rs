use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::Result;
use crate::extract::{JsonBody, QueryParams};
use crate::middleware::{AdminUser, AuthUser};
use crate::models::{CreateMuscle, Muscle, UpdateMuscle};
use crate::pagination::{Page, PageRequest};
use crate::services::MuscleService;

pub async fn list(
    State(muscles): State<MuscleService>,
    _user: AuthUser,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<Json<Page<Muscle>>> {
    Ok(Json(muscles.list(&page).await?))
}

pub async fn create(
    State(muscles): State<MuscleService>,
    admin: AdminUser,
    JsonBody(form): JsonBody<CreateMuscle>,
) -> Result<(StatusCode, Json<Muscle>)> {
    let muscle = muscles.create(&admin, form).await?;
    Ok((StatusCode::CREATED, Json(muscle)))
}

pub async fn show(
    State(muscles): State<MuscleService>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Muscle>> {
    Ok(Json(muscles.get(&id).await?))
}

pub async fn show_by_name(
    State(muscles): State<MuscleService>,
    _user: AuthUser,
    Path(name): Path<String>,
) -> Result<Json<Muscle>> {
    Ok(Json(muscles.get_by_name(&name).await?))
}

pub async fn update(
    State(muscles): State<MuscleService>,
    admin: AdminUser,
    Path(id): Path<String>,
    JsonBody(form): JsonBody<UpdateMuscle>,
) -> Result<Json<Muscle>> {
    Ok(Json(muscles.update(&admin, &id, form).await?))
}

pub async fn delete(
    State(muscles): State<MuscleService>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    muscles.delete(&admin, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
