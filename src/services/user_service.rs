use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{ChangePassword, CreateUser, LoginCredentials, UpdateUser, UserDto, UserRole};
use crate::pagination::{Page, PageRequest};
use crate::repositories::{user_repo::USER_LISTING, SessionRepository, UserRepository};

use super::validate_id;

pub const MIN_PASSWORD_LEN: usize = 6;
const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=32;

/// A successful login or registration.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserDto,
}

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    sessions: SessionRepository,
}

impl UserService {
    pub fn new(users: UserRepository, sessions: SessionRepository) -> Self {
        Self { users, sessions }
    }

    /// Create an account and log it in. The very first account is an admin.
    pub async fn register(&self, form: CreateUser) -> Result<LoginOutcome> {
        let user = self.insert(form, None).await?;

        let token = self.sessions.create(&user.id).await?;
        Ok(LoginOutcome { token, user })
    }

    /// Admin-created account. It starts as a regular user and is not logged in.
    pub async fn create(&self, actor: &AuthUser, form: CreateUser) -> Result<UserDto> {
        super::ensure_admin(actor)?;
        self.insert(form, Some(UserRole::User)).await
    }

    /// `None` leaves the role to the database: admin for the first account.
    async fn insert(&self, form: CreateUser, role: Option<UserRole>) -> Result<UserDto> {
        let username = validate_username(&form.username)?;
        let email = validate_email(form.email.as_deref())?;
        validate_password(&form.password)?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AppError::Validation("Username already exists".to_string()));
        }

        let user = match role {
            Some(role) => {
                self.users
                    .create(&username, email.as_deref(), &form.password, role)
                    .await?
            }
            None => {
                self.users
                    .create_first_admin(&username, email.as_deref(), &form.password)
                    .await?
            }
        };
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "registered user {}", user.username);
        Ok(user.into())
    }

    pub async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome> {
        let user = self
            .users
            .verify_password(credentials.username.trim(), &credentials.password)
            .await?
            .ok_or_else(|| {
                tracing::info!("failed login for {}", credentials.username);
                AppError::InvalidCredentials
            })?;

        let token = self.sessions.create(&user.id).await?;
        Ok(LoginOutcome {
            token,
            user: user.into(),
        })
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        self.sessions.delete(token).await
    }

    pub async fn get(&self, actor: &AuthUser, id: &str) -> Result<UserDto> {
        validate_id(id, "user")?;
        ensure_self_or_admin(actor, id)?;
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(user.into())
    }

    pub async fn get_by_name(&self, actor: &AuthUser, username: &str) -> Result<UserDto> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        ensure_self_or_admin(actor, &user.id)?;
        Ok(user.into())
    }

    pub async fn list(&self, actor: &AuthUser, request: &PageRequest) -> Result<Page<UserDto>> {
        super::ensure_admin(actor)?;
        let page = request.validate(&USER_LISTING)?;
        Ok(self.users.list(page).await?.map(UserDto::from))
    }

    pub async fn update(&self, actor: &AuthUser, id: &str, form: UpdateUser) -> Result<UserDto> {
        validate_id(id, "user")?;
        if actor.id != id {
            return Err(AppError::Forbidden(
                "You can only edit your own account".to_string(),
            ));
        }
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let username = match form.username.as_deref() {
            Some(name) => validate_username(name)?,
            None => user.username.clone(),
        };
        let email = match form.email.as_deref() {
            Some(email) => validate_email(Some(email))?,
            None => user.email.clone(),
        };

        if !username.eq_ignore_ascii_case(&user.username)
            && self.users.find_by_username(&username).await?.is_some()
        {
            return Err(AppError::Validation("Username already exists".to_string()));
        }

        self.users
            .update_profile(id, &username, email.as_deref())
            .await?;

        let updated = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(updated.into())
    }

    /// Change the caller's password and sign out every other session.
    pub async fn change_password(
        &self,
        actor: &AuthUser,
        id: &str,
        form: ChangePassword,
        current_token: &str,
    ) -> Result<()> {
        validate_id(id, "user")?;
        if actor.id != id {
            return Err(AppError::Forbidden(
                "You can only change your own password".to_string(),
            ));
        }

        if self
            .users
            .verify_password(&actor.username, &form.current_password)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }
        validate_password(&form.new_password)?;

        self.users.update_password(id, &form.new_password).await?;
        self.sessions
            .delete_all_for_user_except(id, current_token)
            .await?;
        tracing::info!(user_id = %id, "password changed");
        Ok(())
    }

    pub async fn set_role(&self, actor: &AuthUser, id: &str, role: UserRole) -> Result<UserDto> {
        super::ensure_admin(actor)?;
        validate_id(id, "user")?;
        if actor.id == id && role != UserRole::Admin {
            return Err(AppError::BadRequest(
                "Cannot remove your own admin role".to_string(),
            ));
        }

        if !self.users.update_role(id, role).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        tracing::info!(user_id = %id, role = role.as_str(), "role changed");

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(user.into())
    }

    pub async fn delete(&self, actor: &AuthUser, id: &str) -> Result<()> {
        validate_id(id, "user")?;
        ensure_self_or_admin(actor, id)?;
        if actor.is_admin() && actor.id == id {
            return Err(AppError::BadRequest(
                "Cannot delete your own account".to_string(),
            ));
        }

        if !self.users.delete(id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        tracing::info!(user_id = %id, "deleted user");
        Ok(())
    }
}

fn ensure_self_or_admin(actor: &AuthUser, id: &str) -> Result<()> {
    if actor.id == id || actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You can only access your own account".to_string(),
        ))
    }
}

fn validate_username(username: &str) -> Result<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }
    if !USERNAME_LEN.contains(&username.chars().count()) {
        return Err(AppError::Validation(format!(
            "Username must be between {} and {} characters",
            USERNAME_LEN.start(),
            USERNAME_LEN.end()
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(AppError::Validation(
            "Username may only contain letters, digits, '_', '.' and '-'".to_string(),
        ));
    }
    Ok(username.to_string())
}

fn validate_email(email: Option<&str>) -> Result<Option<String>> {
    match email.map(str::trim).filter(|e| !e.is_empty()) {
        Some(email) => {
            let valid = email
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
            if !valid {
                return Err(AppError::Validation("Email address is invalid".to_string()));
            }
            Ok(Some(email.to_string()))
        }
        None => Ok(None),
    }
}

fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
