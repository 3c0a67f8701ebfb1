use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{MuscleSize, MuscleSizeInput, SizeUnit};
use crate::pagination::{Page, PageRequest};
use crate::repositories::{
    muscle_size_repo::MUSCLE_SIZE_LISTING, MuscleRepository, MuscleSizeRepository,
    MuscleSizeValues,
};

use super::{ensure_not_future, ensure_owned, validate_id};

const MAX_SIZE: f64 = 500.0;

#[derive(Clone)]
pub struct MuscleSizeService {
    sizes: MuscleSizeRepository,
    muscles: MuscleRepository,
}

impl MuscleSizeService {
    pub fn new(sizes: MuscleSizeRepository, muscles: MuscleRepository) -> Self {
        Self { sizes, muscles }
    }

    pub async fn get(&self, actor: &AuthUser, id: &str) -> Result<MuscleSize> {
        validate_id(id, "muscle size")?;
        ensure_owned(self.sizes.find_by_id(id).await?, actor, "muscle size")
    }

    pub async fn list(&self, actor: &AuthUser, request: &PageRequest) -> Result<Page<MuscleSize>> {
        let page = request.validate(&MUSCLE_SIZE_LISTING)?;
        self.sizes.list(&actor.id, page).await
    }

    /// The caller's history for one muscle, newest first.
    pub async fn list_by_muscle(&self, actor: &AuthUser, muscle_id: &str) -> Result<Vec<MuscleSize>> {
        self.require_muscle(muscle_id).await?;
        self.sizes.list_by_muscle(&actor.id, muscle_id).await
    }

    pub async fn create(&self, actor: &AuthUser, input: MuscleSizeInput) -> Result<MuscleSize> {
        let values = self.check(input).await?;
        let size = self.sizes.create(&actor.id, values).await?;
        tracing::info!(user_id = %actor.id, muscle_size_id = %size.id, "recorded muscle size");
        Ok(size)
    }

    pub async fn update(
        &self,
        actor: &AuthUser,
        id: &str,
        input: MuscleSizeInput,
    ) -> Result<MuscleSize> {
        let existing = self.get(actor, id).await?;
        let values = self.check(input).await?;

        if !self.sizes.update(id, &actor.id, values.clone()).await? {
            return Err(AppError::NotFound("Muscle size not found".to_string()));
        }

        Ok(MuscleSize {
            muscle_id: values.muscle_id,
            size: values.size,
            size_unit: values.size_unit,
            date: values.date,
            ..existing
        })
    }

    pub async fn delete(&self, actor: &AuthUser, id: &str) -> Result<()> {
        self.get(actor, id).await?;
        if !self.sizes.delete(id, &actor.id).await? {
            return Err(AppError::NotFound("Muscle size not found".to_string()));
        }
        tracing::info!(user_id = %actor.id, muscle_size_id = %id, "deleted muscle size");
        Ok(())
    }

    async fn check(&self, input: MuscleSizeInput) -> Result<MuscleSizeValues> {
        if !input.size.is_finite() || input.size <= 0.0 || input.size > MAX_SIZE {
            return Err(AppError::Validation(format!(
                "Size must be greater than 0 and at most {}",
                MAX_SIZE
            )));
        }
        let size_unit = SizeUnit::parse(&input.size_unit).ok_or_else(|| {
            AppError::Validation(format!("Unknown size unit '{}'", input.size_unit))
        })?;
        ensure_not_future(input.date)?;
        self.require_muscle(&input.muscle_id).await?;

        Ok(MuscleSizeValues {
            muscle_id: input.muscle_id,
            size: input.size,
            size_unit,
            date: input.date,
        })
    }

    async fn require_muscle(&self, muscle_id: &str) -> Result<()> {
        validate_id(muscle_id, "muscle")?;
        match self.muscles.find_by_id(muscle_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Muscle not found".to_string())),
        }
    }
}
