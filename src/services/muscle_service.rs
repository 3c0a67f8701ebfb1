use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CreateMuscle, Muscle, UpdateMuscle};
use crate::pagination::{Page, PageRequest};
use crate::repositories::{muscle_repo::MUSCLE_LISTING, MuscleRepository};

use super::{ensure_admin, required_name, validate_id, MAX_NAME_LEN};

/// Muscles are shared reference data: everyone reads, only admins write.
#[derive(Clone)]
pub struct MuscleService {
    muscles: MuscleRepository,
}

impl MuscleService {
    pub fn new(muscles: MuscleRepository) -> Self {
        Self { muscles }
    }

    pub async fn get(&self, id: &str) -> Result<Muscle> {
        validate_id(id, "muscle")?;
        self.muscles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Muscle not found".to_string()))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Muscle> {
        self.muscles
            .find_by_name(name.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("Muscle not found".to_string()))
    }

    pub async fn list(&self, request: &PageRequest) -> Result<Page<Muscle>> {
        let page = request.validate(&MUSCLE_LISTING)?;
        self.muscles.list(page).await
    }

    pub async fn create(&self, actor: &AuthUser, form: CreateMuscle) -> Result<Muscle> {
        ensure_admin(actor)?;
        let name = required_name(&form.name, "muscle")?;
        let group = muscle_group(form.muscle_group.as_deref())?;
        self.ensure_name_free(&name, None).await?;

        let muscle = self.muscles.create(&name, group.as_deref()).await?;
        tracing::info!(muscle_id = %muscle.id, "created muscle {}", muscle.name);
        Ok(muscle)
    }

    pub async fn update(&self, actor: &AuthUser, id: &str, form: UpdateMuscle) -> Result<Muscle> {
        ensure_admin(actor)?;
        let existing = self.get(id).await?;
        let name = required_name(&form.name, "muscle")?;
        let group = muscle_group(form.muscle_group.as_deref())?;
        self.ensure_name_free(&name, Some(&existing.id)).await?;

        if !self.muscles.update(id, &name, group.as_deref()).await? {
            return Err(AppError::NotFound("Muscle not found".to_string()));
        }
        tracing::info!(muscle_id = %id, "updated muscle");

        Ok(Muscle {
            name,
            muscle_group: group,
            ..existing
        })
    }

    /// Deleting a muscle also removes its exercise links and size entries.
    pub async fn delete(&self, actor: &AuthUser, id: &str) -> Result<()> {
        ensure_admin(actor)?;
        validate_id(id, "muscle")?;
        if !self.muscles.delete(id).await? {
            return Err(AppError::NotFound("Muscle not found".to_string()));
        }
        tracing::info!(muscle_id = %id, "deleted muscle");
        Ok(())
    }

    async fn ensure_name_free(&self, name: &str, except_id: Option<&str>) -> Result<()> {
        match self.muscles.find_by_name(name).await? {
            Some(other) if Some(other.id.as_str()) != except_id => Err(AppError::Validation(
                "A muscle with this name already exists".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

fn muscle_group(value: Option<&str>) -> Result<Option<String>> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(group) if group.chars().count() > MAX_NAME_LEN => Err(AppError::Validation(
            format!("Muscle group must be at most {} characters", MAX_NAME_LEN),
        )),
        Some(group) => Ok(Some(group.to_lowercase())),
        None => Ok(None),
    }
}
