use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CreateExercise, Exercise, Muscle, UpdateExercise};
use crate::pagination::{Page, PageRequest};
use crate::repositories::{exercise_repo::EXERCISE_LISTING, ExerciseRepository, MuscleRepository};

use super::{ensure_owned, optional_text, required_name, validate_id};

#[derive(Clone)]
pub struct ExerciseService {
    exercises: ExerciseRepository,
    muscles: MuscleRepository,
}

impl ExerciseService {
    pub fn new(exercises: ExerciseRepository, muscles: MuscleRepository) -> Self {
        Self { exercises, muscles }
    }

    pub async fn get(&self, actor: &AuthUser, id: &str) -> Result<Exercise> {
        validate_id(id, "exercise")?;
        ensure_owned(self.exercises.find_by_id(id).await?, actor, "exercise")
    }

    pub async fn get_by_name(&self, actor: &AuthUser, name: &str) -> Result<Exercise> {
        self.exercises
            .find_by_name(&actor.id, name.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))
    }

    pub async fn list(&self, actor: &AuthUser, request: &PageRequest) -> Result<Page<Exercise>> {
        let page = request.validate(&EXERCISE_LISTING)?;
        self.exercises.list(&actor.id, page).await
    }

    pub async fn create(&self, actor: &AuthUser, form: CreateExercise) -> Result<Exercise> {
        let name = required_name(&form.name, "exercise")?;
        let description = optional_text(form.description.as_deref(), "description")?;
        if self
            .exercises
            .find_by_name(&actor.id, &name)
            .await?
            .is_some()
        {
            return Err(AppError::Validation(
                "An exercise with this name already exists".to_string(),
            ));
        }

        let exercise = self
            .exercises
            .create(&actor.id, &name, description.as_deref())
            .await?;
        tracing::info!(user_id = %actor.id, exercise_id = %exercise.id, "created exercise {}", exercise.name);
        Ok(exercise)
    }

    pub async fn update(
        &self,
        actor: &AuthUser,
        id: &str,
        form: UpdateExercise,
    ) -> Result<Exercise> {
        let existing = self.get(actor, id).await?;
        let name = required_name(&form.name, "exercise")?;
        let description = optional_text(form.description.as_deref(), "description")?;

        if let Some(other) = self.exercises.find_by_name(&actor.id, &name).await? {
            if other.id != existing.id {
                return Err(AppError::Validation(
                    "An exercise with this name already exists".to_string(),
                ));
            }
        }

        if !self
            .exercises
            .update(id, &actor.id, &name, description.as_deref())
            .await?
        {
            return Err(AppError::NotFound("Exercise not found".to_string()));
        }
        tracing::info!(user_id = %actor.id, exercise_id = %id, "updated exercise");

        Ok(Exercise {
            name,
            description,
            ..existing
        })
    }

    /// Deleting an exercise also drops it from workouts and removes its records.
    pub async fn delete(&self, actor: &AuthUser, id: &str) -> Result<()> {
        self.get(actor, id).await?;
        if !self.exercises.delete(id, &actor.id).await? {
            return Err(AppError::NotFound("Exercise not found".to_string()));
        }
        tracing::info!(user_id = %actor.id, exercise_id = %id, "deleted exercise");
        Ok(())
    }

    pub async fn list_muscles(&self, actor: &AuthUser, exercise_id: &str) -> Result<Vec<Muscle>> {
        self.get(actor, exercise_id).await?;
        self.exercises.list_muscles(exercise_id).await
    }

    /// Tag an exercise with a muscle it works. Tagging twice is a no-op.
    pub async fn add_muscle(
        &self,
        actor: &AuthUser,
        exercise_id: &str,
        muscle_id: &str,
    ) -> Result<Vec<Muscle>> {
        self.get(actor, exercise_id).await?;
        self.require_muscle(muscle_id).await?;

        if self.exercises.add_muscle(exercise_id, muscle_id).await? {
            tracing::debug!(exercise_id = %exercise_id, muscle_id = %muscle_id, "tagged exercise");
        }
        self.exercises.list_muscles(exercise_id).await
    }

    pub async fn remove_muscle(
        &self,
        actor: &AuthUser,
        exercise_id: &str,
        muscle_id: &str,
    ) -> Result<()> {
        self.get(actor, exercise_id).await?;
        validate_id(muscle_id, "muscle")?;
        if !self.exercises.remove_muscle(exercise_id, muscle_id).await? {
            return Err(AppError::NotFound(
                "Muscle is not linked to this exercise".to_string(),
            ));
        }
        Ok(())
    }

    async fn require_muscle(&self, muscle_id: &str) -> Result<Muscle> {
        validate_id(muscle_id, "muscle")?;
        self.muscles
            .find_by_id(muscle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Muscle not found".to_string()))
    }
}
