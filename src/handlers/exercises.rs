use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::Result;
use crate::extract::{JsonBody, QueryParams};
use crate::middleware::AuthUser;
use crate::models::{CreateExercise, Exercise, Muscle, UpdateExercise};
use crate::pagination::{Page, PageRequest};
use crate::services::ExerciseService;

pub async fn list(
    State(exercises): State<ExerciseService>,
    user: AuthUser,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<Json<Page<Exercise>>> {
    Ok(Json(exercises.list(&user, &page).await?))
}

pub async fn create(
    State(exercises): State<ExerciseService>,
    user: AuthUser,
    JsonBody(form): JsonBody<CreateExercise>,
) -> Result<(StatusCode, Json<Exercise>)> {
    let exercise = exercises.create(&user, form).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

pub async fn show(
    State(exercises): State<ExerciseService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Exercise>> {
    Ok(Json(exercises.get(&user, &id).await?))
}

pub async fn show_by_name(
    State(exercises): State<ExerciseService>,
    user: AuthUser,
    Path(name): Path<String>,
) -> Result<Json<Exercise>> {
    Ok(Json(exercises.get_by_name(&user, &name).await?))
}

pub async fn update(
    State(exercises): State<ExerciseService>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(form): JsonBody<UpdateExercise>,
) -> Result<Json<Exercise>> {
    Ok(Json(exercises.update(&user, &id, form).await?))
}

pub async fn delete(
    State(exercises): State<ExerciseService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    exercises.delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_muscles(
    State(exercises): State<ExerciseService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Muscle>>> {
    Ok(Json(exercises.list_muscles(&user, &id).await?))
}

pub async fn add_muscle(
    State(exercises): State<ExerciseService>,
    user: AuthUser,
    Path((id, muscle_id)): Path<(String, String)>,
) -> Result<Json<Vec<Muscle>>> {
    Ok(Json(exercises.add_muscle(&user, &id, &muscle_id).await?))
}

pub async fn remove_muscle(
    State(exercises): State<ExerciseService>,
    user: AuthUser,
    Path((id, muscle_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    exercises.remove_muscle(&user, &id, &muscle_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
