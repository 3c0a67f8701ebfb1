use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;

use crate::error::AppError;
use crate::models::UserRole;
use crate::repositories::{SessionRepository, UserRepository};
use crate::session::get_session_token;

/// Everything the auth extractors need to resolve a session.
#[derive(Clone)]
pub struct SessionState {
    pub session_repo: SessionRepository,
    pub user_repo: UserRepository,
}

#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// The session token presented with the request, from the cookie or a bearer header.
#[derive(Clone, Debug)]
pub struct SessionToken(pub String);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        bearer
            .or_else(|| get_session_token(&CookieJar::from_headers(&parts.headers)))
            .map(SessionToken)
            .ok_or(AppError::Unauthorized)
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let SessionToken(token) = SessionToken::from_request_parts(parts, state).await?;
        let sessions = SessionState::from_ref(state);

        let user_id = sessions
            .session_repo
            .find_valid(&token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let user = sessions
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser {
            id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}

/// Admin-only extractor.
pub struct AdminUser(pub AuthUser);

impl std::ops::Deref for AdminUser {
    type Target = AuthUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    SessionState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(AdminUser(user))
    }
}
