use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::Result;
use crate::extract::{JsonBody, QueryParams};
use crate::middleware::AuthUser;
use crate::models::{CreateWorkout, UpdateWorkout, Workout, WorkoutExercise};
use crate::pagination::{Page, PageRequest};
use crate::services::WorkoutService;

pub async fn list(
    State(workouts): State<WorkoutService>,
    user: AuthUser,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<Json<Page<Workout>>> {
    Ok(Json(workouts.list(&user, &page).await?))
}

pub async fn create(
    State(workouts): State<WorkoutService>,
    user: AuthUser,
    JsonBody(form): JsonBody<CreateWorkout>,
) -> Result<(StatusCode, Json<Workout>)> {
    let workout = workouts.create(&user, form).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn show(
    State(workouts): State<WorkoutService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Workout>> {
    Ok(Json(workouts.get(&user, &id).await?))
}

pub async fn show_by_name(
    State(workouts): State<WorkoutService>,
    user: AuthUser,
    Path(name): Path<String>,
) -> Result<Json<Workout>> {
    Ok(Json(workouts.get_by_name(&user, &name).await?))
}

pub async fn update(
    State(workouts): State<WorkoutService>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(form): JsonBody<UpdateWorkout>,
) -> Result<Json<Workout>> {
    Ok(Json(workouts.update(&user, &id, form).await?))
}

pub async fn delete(
    State(workouts): State<WorkoutService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    workouts.delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Exercises in a workout

pub async fn list_exercises(
    State(workouts): State<WorkoutService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<WorkoutExercise>>> {
    Ok(Json(workouts.list_exercises(&user, &id).await?))
}

pub async fn add_exercise(
    State(workouts): State<WorkoutService>,
    user: AuthUser,
    Path((id, exercise_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<Vec<WorkoutExercise>>)> {
    let exercises = workouts.add_exercise(&user, &id, &exercise_id).await?;
    Ok((StatusCode::CREATED, Json(exercises)))
}

pub async fn remove_exercise(
    State(workouts): State<WorkoutService>,
    user: AuthUser,
    Path((id, exercise_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    workouts.remove_exercise(&user, &id, &exercise_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
