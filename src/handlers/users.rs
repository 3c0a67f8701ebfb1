use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::Result;
use crate::extract::{JsonBody, QueryParams};
use crate::middleware::{AdminUser, AuthUser, SessionToken};
use crate::models::{ChangePassword, ChangeRole, CreateUser, UpdateUser, UserDto};
use crate::pagination::{Page, PageRequest};
use crate::services::UserService;

pub async fn list(
    State(users): State<UserService>,
    admin: AdminUser,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<Json<Page<UserDto>>> {
    Ok(Json(users.list(&admin, &page).await?))
}

pub async fn create(
    State(users): State<UserService>,
    admin: AdminUser,
    JsonBody(form): JsonBody<CreateUser>,
) -> Result<(StatusCode, Json<UserDto>)> {
    let user = users.create(&admin, form).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn show(
    State(users): State<UserService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserDto>> {
    Ok(Json(users.get(&user, &id).await?))
}

pub async fn show_by_name(
    State(users): State<UserService>,
    user: AuthUser,
    Path(name): Path<String>,
) -> Result<Json<UserDto>> {
    Ok(Json(users.get_by_name(&user, &name).await?))
}

pub async fn update(
    State(users): State<UserService>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(form): JsonBody<UpdateUser>,
) -> Result<Json<UserDto>> {
    Ok(Json(users.update(&user, &id, form).await?))
}

pub async fn delete(
    State(users): State<UserService>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    users.delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_password(
    State(users): State<UserService>,
    user: AuthUser,
    SessionToken(token): SessionToken,
    Path(id): Path<String>,
    JsonBody(form): JsonBody<ChangePassword>,
) -> Result<StatusCode> {
    users.change_password(&user, &id, form, &token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_role(
    State(users): State<UserService>,
    admin: AdminUser,
    Path(id): Path<String>,
    JsonBody(form): JsonBody<ChangeRole>,
) -> Result<Json<UserDto>> {
    Ok(Json(users.set_role(&admin, &id, form.role).await?))
}
