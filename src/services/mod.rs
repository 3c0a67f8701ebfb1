//! Business rules between the HTTP handlers and the repositories.
//!
//! Every service call follows the same steps: check the input, check that the
//! identifiers are well formed, load the entity, check that the caller owns
//! it, then hand off to the repository. All failures come back as
//! [`AppError`] so handlers only ever see one error type.

pub mod body_weight_service;
pub mod exercise_record_service;
pub mod exercise_service;
pub mod muscle_service;
pub mod muscle_size_service;
pub mod user_service;
pub mod workout_service;

pub use body_weight_service::BodyWeightService;
pub use exercise_record_service::ExerciseRecordService;
pub use exercise_service::ExerciseService;
pub use muscle_service::MuscleService;
pub use muscle_size_service::MuscleSizeService;
pub use user_service::UserService;
pub use workout_service::WorkoutService;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{BodyWeight, Exercise, ExerciseRecord, MuscleSize, Workout};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_TEXT_LEN: usize = 1000;

/// An entity that belongs to exactly one user.
pub trait Owned {
    fn owner_id(&self) -> &str;
}

macro_rules! impl_owned {
    ($($ty:ty),*) => {
        $(impl Owned for $ty {
            fn owner_id(&self) -> &str {
                &self.user_id
            }
        })*
    };
}

impl_owned!(Workout, Exercise, MuscleSize, BodyWeight, ExerciseRecord);

/// Reject identifiers that cannot possibly exist.
pub fn validate_id(id: &str, what: &str) -> Result<()> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("Invalid {} id", what)))
}

/// Existence and ownership check for a freshly loaded entity.
pub fn ensure_owned<T: Owned>(found: Option<T>, actor: &AuthUser, what: &str) -> Result<T> {
    let entity = found.ok_or_else(|| AppError::NotFound(format!("{} not found", capitalize(what))))?;
    if entity.owner_id() != actor.id {
        tracing::warn!(user_id = %actor.id, "denied access to another user's {}", what);
        return Err(AppError::Forbidden(format!(
            "You can only access your own {}s",
            what
        )));
    }
    Ok(entity)
}

pub fn ensure_admin(actor: &AuthUser) -> Result<()> {
    if actor.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required".to_string()))
    }
}

/// Trimmed, non-empty, bounded name.
pub fn required_name(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!(
            "{} name is required",
            capitalize(what)
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "{} name must be at most {} characters",
            capitalize(what),
            MAX_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// Trimmed optional free text; blank becomes `None`.
pub fn optional_text(value: Option<&str>, field: &str) -> Result<Option<String>> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) if s.chars().count() > MAX_TEXT_LEN => Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            capitalize(field),
            MAX_TEXT_LEN
        ))),
        Some(s) => Ok(Some(s.to_string())),
        None => Ok(None),
    }
}

pub fn ensure_not_future(date: NaiveDate) -> Result<()> {
    if date > Utc::now().date_naive() {
        return Err(AppError::Validation(
            "Date cannot be in the future".to_string(),
        ));
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn actor(id: &str) -> AuthUser {
        AuthUser {
            id: id.to_string(),
            username: "someone".to_string(),
            role: UserRole::User,
        }
    }

    fn workout(user_id: &str) -> Workout {
        Workout {
            id: "w1".to_string(),
            user_id: user_id.to_string(),
            name: "Push".to_string(),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id(&Uuid::new_v4().to_string(), "workout").is_ok());
        assert!(matches!(
            validate_id("not-a-uuid", "workout"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_ensure_owned() {
        assert!(ensure_owned(Some(workout("u1")), &actor("u1"), "workout").is_ok());
        assert!(matches!(
            ensure_owned(Some(workout("u1")), &actor("u2"), "workout"),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_owned(None::<Workout>, &actor("u1"), "workout"),
            Err(AppError::NotFound(msg)) if msg == "Workout not found"
        ));
    }

    #[test]
    fn test_required_name() {
        assert_eq!(required_name("  Squat ", "exercise").unwrap(), "Squat");
        assert!(required_name("   ", "exercise").is_err());
        assert!(required_name(&"x".repeat(MAX_NAME_LEN + 1), "exercise").is_err());
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(optional_text(Some("  "), "description").unwrap(), None);
        assert_eq!(
            optional_text(Some(" note "), "description").unwrap().as_deref(),
            Some("note")
        );
    }

    #[test]
    fn test_ensure_not_future() {
        let today = Utc::now().date_naive();
        assert!(ensure_not_future(today).is_ok());
        assert!(ensure_not_future(today + chrono::Duration::days(2)).is_err());
    }
}
