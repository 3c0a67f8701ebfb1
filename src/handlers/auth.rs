use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::error::Result;
use crate::extract::JsonBody;
use crate::middleware::{AuthUser, SessionToken};
use crate::models::{CreateUser, LoginCredentials, UserDto};
use crate::services::{user_service::LoginOutcome, UserService};
use crate::session::{create_session_cookie, remove_session_cookie};

#[derive(Clone)]
pub struct AuthState {
    pub users: UserService,
    pub cookie_secure: bool,
}

#[derive(Serialize)]
pub struct AuthResponse {
    token: String,
    user: UserDto,
}

impl AuthState {
    fn sign_in(&self, jar: CookieJar, outcome: LoginOutcome) -> (CookieJar, Json<AuthResponse>) {
        let jar = jar.add(create_session_cookie(&outcome.token, self.cookie_secure));
        (
            jar,
            Json(AuthResponse {
                token: outcome.token,
                user: outcome.user,
            }),
        )
    }
}

pub async fn register(
    State(state): State<AuthState>,
    jar: CookieJar,
    JsonBody(form): JsonBody<CreateUser>,
) -> Result<impl IntoResponse> {
    let outcome = state.users.register(form).await?;
    let (jar, body) = state.sign_in(jar, outcome);
    Ok((StatusCode::CREATED, jar, body))
}

pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    JsonBody(credentials): JsonBody<LoginCredentials>,
) -> Result<impl IntoResponse> {
    let outcome = state.users.login(credentials).await?;
    Ok(state.sign_in(jar, outcome))
}

pub async fn logout(
    State(state): State<AuthState>,
    SessionToken(token): SessionToken,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    state.users.logout(&token).await?;
    Ok((StatusCode::NO_CONTENT, jar.add(remove_session_cookie())))
}

pub async fn me(State(users): State<UserService>, user: AuthUser) -> Result<Json<UserDto>> {
    Ok(Json(users.get(&user, &user.id).await?))
}
