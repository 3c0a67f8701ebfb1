use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CreateWorkout, UpdateWorkout, Workout, WorkoutExercise};
use crate::pagination::{Page, PageRequest};
use crate::repositories::{workout_repo::WORKOUT_LISTING, ExerciseRepository, WorkoutRepository};

use super::{ensure_owned, optional_text, required_name, validate_id};

#[derive(Clone)]
pub struct WorkoutService {
    workouts: WorkoutRepository,
    exercises: ExerciseRepository,
}

impl WorkoutService {
    pub fn new(workouts: WorkoutRepository, exercises: ExerciseRepository) -> Self {
        Self {
            workouts,
            exercises,
        }
    }

    pub async fn get(&self, actor: &AuthUser, id: &str) -> Result<Workout> {
        validate_id(id, "workout")?;
        ensure_owned(self.workouts.find_by_id(id).await?, actor, "workout")
    }

    pub async fn get_by_name(&self, actor: &AuthUser, name: &str) -> Result<Workout> {
        self.workouts
            .find_by_name(&actor.id, name.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))
    }

    pub async fn list(&self, actor: &AuthUser, request: &PageRequest) -> Result<Page<Workout>> {
        let page = request.validate(&WORKOUT_LISTING)?;
        self.workouts.list(&actor.id, page).await
    }

    pub async fn create(&self, actor: &AuthUser, form: CreateWorkout) -> Result<Workout> {
        let name = required_name(&form.name, "workout")?;
        let description = optional_text(form.description.as_deref(), "description")?;
        self.ensure_name_free(actor, &name, None).await?;

        let workout = self
            .workouts
            .create(&actor.id, &name, description.as_deref())
            .await?;
        tracing::info!(user_id = %actor.id, workout_id = %workout.id, "created workout");
        Ok(workout)
    }

    pub async fn update(&self, actor: &AuthUser, id: &str, form: UpdateWorkout) -> Result<Workout> {
        let existing = self.get(actor, id).await?;
        let name = required_name(&form.name, "workout")?;
        let description = optional_text(form.description.as_deref(), "description")?;
        self.ensure_name_free(actor, &name, Some(&existing.id))
            .await?;

        if !self
            .workouts
            .update(id, &actor.id, &name, description.as_deref())
            .await?
        {
            return Err(AppError::NotFound("Workout not found".to_string()));
        }
        tracing::info!(user_id = %actor.id, workout_id = %id, "updated workout");

        Ok(Workout {
            name,
            description,
            ..existing
        })
    }

    pub async fn delete(&self, actor: &AuthUser, id: &str) -> Result<()> {
        self.get(actor, id).await?;
        if !self.workouts.delete(id, &actor.id).await? {
            return Err(AppError::NotFound("Workout not found".to_string()));
        }
        tracing::info!(user_id = %actor.id, workout_id = %id, "deleted workout");
        Ok(())
    }

    pub async fn list_exercises(
        &self,
        actor: &AuthUser,
        workout_id: &str,
    ) -> Result<Vec<WorkoutExercise>> {
        self.get(actor, workout_id).await?;
        self.workouts.list_exercises(workout_id).await
    }

    /// Append one of the caller's exercises to one of their workouts.
    pub async fn add_exercise(
        &self,
        actor: &AuthUser,
        workout_id: &str,
        exercise_id: &str,
    ) -> Result<Vec<WorkoutExercise>> {
        self.get(actor, workout_id).await?;
        validate_id(exercise_id, "exercise")?;
        ensure_owned(
            self.exercises.find_by_id(exercise_id).await?,
            actor,
            "exercise",
        )?;

        if self
            .workouts
            .contains_exercise(workout_id, exercise_id)
            .await?
        {
            return Err(AppError::BadRequest(
                "Exercise is already part of this workout".to_string(),
            ));
        }

        let position = self.workouts.add_exercise(workout_id, exercise_id).await?;
        tracing::debug!(workout_id = %workout_id, exercise_id = %exercise_id, position, "added exercise to workout");
        self.workouts.list_exercises(workout_id).await
    }

    pub async fn remove_exercise(
        &self,
        actor: &AuthUser,
        workout_id: &str,
        exercise_id: &str,
    ) -> Result<()> {
        self.get(actor, workout_id).await?;
        validate_id(exercise_id, "exercise")?;
        if !self
            .workouts
            .remove_exercise(workout_id, exercise_id)
            .await?
        {
            return Err(AppError::NotFound(
                "Exercise is not part of this workout".to_string(),
            ));
        }
        Ok(())
    }

    async fn ensure_name_free(
        &self,
        actor: &AuthUser,
        name: &str,
        except_id: Option<&str>,
    ) -> Result<()> {
        match self.workouts.find_by_name(&actor.id, name).await? {
            Some(other) if Some(other.id.as_str()) != except_id => Err(AppError::Validation(
                "A workout with this name already exists".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbPool;
    use crate::models::UserRole;
    use crate::services::test_support::{create_actor, setup_test_db};

    fn service(pool: &DbPool) -> WorkoutService {
        WorkoutService::new(
            WorkoutRepository::new(pool.clone()),
            ExerciseRepository::new(pool.clone()),
        )
    }

    fn form(name: &str) -> CreateWorkout {
        CreateWorkout {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = setup_test_db();
        let actor = create_actor(&pool, "alice", UserRole::User).await;
        let service = service(&pool);

        let created = service.create(&actor, form("  Push Day ")).await.unwrap();
        assert_eq!(created.name, "Push Day");

        let found = service.get(&actor, &created.id).await.unwrap();
        assert_eq!(found.id, created.id);

        let by_name = service.get_by_name(&actor, "push day").await.unwrap();
        assert_eq!(by_name.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let pool = setup_test_db();
        let actor = create_actor(&pool, "alice", UserRole::User).await;
        let service = service(&pool);

        service.create(&actor, form("Legs")).await.unwrap();
        let result = service.create(&actor, form("LEGS")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_other_users_workout_is_forbidden() {
        let pool = setup_test_db();
        let alice = create_actor(&pool, "alice", UserRole::User).await;
        let bob = create_actor(&pool, "bob", UserRole::User).await;
        let service = service(&pool);

        let workout = service.create(&alice, form("Pull")).await.unwrap();
        assert!(matches!(
            service.get(&bob, &workout.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete(&bob, &workout.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.get_by_name(&bob, "Pull").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_own_name() {
        let pool = setup_test_db();
        let actor = create_actor(&pool, "alice", UserRole::User).await;
        let service = service(&pool);

        let workout = service.create(&actor, form("Push")).await.unwrap();
        let updated = service
            .update(
                &actor,
                &workout.id,
                UpdateWorkout {
                    name: "Push".to_string(),
                    description: Some("chest and triceps".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("chest and triceps"));
    }

    #[tokio::test]
    async fn test_invalid_id_is_validation_error() {
        let pool = setup_test_db();
        let actor = create_actor(&pool, "alice", UserRole::User).await;
        assert!(matches!(
            service(&pool).get(&actor, "nope").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_add_and_remove_exercise() {
        let pool = setup_test_db();
        let actor = create_actor(&pool, "alice", UserRole::User).await;
        let service = service(&pool);
        let exercises = ExerciseRepository::new(pool.clone());

        let workout = service.create(&actor, form("Push")).await.unwrap();
        let bench = exercises
            .create(&actor.id, "Bench Press", None)
            .await
            .unwrap();
        let dips = exercises.create(&actor.id, "Dips", None).await.unwrap();

        service
            .add_exercise(&actor, &workout.id, &bench.id)
            .await
            .unwrap();
        let listed = service
            .add_exercise(&actor, &workout.id, &dips.id)
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].exercise.name, "Bench Press");
        assert_eq!(listed[1].position, 2);

        assert!(matches!(
            service.add_exercise(&actor, &workout.id, &bench.id).await,
            Err(AppError::BadRequest(_))
        ));

        service
            .remove_exercise(&actor, &workout.id, &bench.id)
            .await
            .unwrap();
        let listed = service.list_exercises(&actor, &workout.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(matches!(
            service.remove_exercise(&actor, &workout.id, &bench.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cannot_add_someone_elses_exercise() {
        let pool = setup_test_db();
        let alice = create_actor(&pool, "alice", UserRole::User).await;
        let bob = create_actor(&pool, "bob", UserRole::User).await;
        let service = service(&pool);

        let workout = service.create(&alice, form("Push")).await.unwrap();
        let foreign = ExerciseRepository::new(pool.clone())
            .create(&bob.id, "Curl", None)
            .await
            .unwrap();

        assert!(matches!(
            service.add_exercise(&alice, &workout.id, &foreign.id).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_user() {
        let pool = setup_test_db();
        let alice = create_actor(&pool, "alice", UserRole::User).await;
        let bob = create_actor(&pool, "bob", UserRole::User).await;
        let service = service(&pool);

        service.create(&alice, form("A")).await.unwrap();
        service.create(&alice, form("B")).await.unwrap();
        service.create(&bob, form("C")).await.unwrap();

        let page = service
            .list(&alice, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_count, 2);
        assert!(page.data.iter().all(|w| w.user_id == alice.id));
    }
}
