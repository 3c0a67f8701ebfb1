use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{ExerciseRecord, ExerciseRecordInput, WeightUnit};
use crate::pagination::{Page, PageRequest};
use crate::repositories::{
    exercise_record_repo::EXERCISE_RECORD_LISTING, ExerciseRecordRepository, ExerciseRecordValues,
    ExerciseRepository,
};

use super::{ensure_not_future, ensure_owned, optional_text, validate_id};

const MAX_LIFT_WEIGHT: f64 = 2000.0;
const MAX_REPS: i32 = 1000;
const MAX_SETS: i32 = 100;

#[derive(Clone)]
pub struct ExerciseRecordService {
    records: ExerciseRecordRepository,
    exercises: ExerciseRepository,
}

impl ExerciseRecordService {
    pub fn new(records: ExerciseRecordRepository, exercises: ExerciseRepository) -> Self {
        Self { records, exercises }
    }

    pub async fn get(&self, actor: &AuthUser, id: &str) -> Result<ExerciseRecord> {
        validate_id(id, "exercise record")?;
        ensure_owned(self.records.find_by_id(id).await?, actor, "exercise record")
    }

    pub async fn list(
        &self,
        actor: &AuthUser,
        request: &PageRequest,
    ) -> Result<Page<ExerciseRecord>> {
        let page = request.validate(&EXERCISE_RECORD_LISTING)?;
        self.records.list(&actor.id, page).await
    }

    pub async fn list_by_exercise(
        &self,
        actor: &AuthUser,
        exercise_id: &str,
    ) -> Result<Vec<ExerciseRecord>> {
        self.require_exercise(actor, exercise_id).await?;
        self.records.list_by_exercise(&actor.id, exercise_id).await
    }

    /// The caller's personal best for an exercise.
    pub async fn best_for_exercise(
        &self,
        actor: &AuthUser,
        exercise_id: &str,
    ) -> Result<ExerciseRecord> {
        self.require_exercise(actor, exercise_id).await?;
        self.records
            .find_best(&actor.id, exercise_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No records for this exercise".to_string()))
    }

    pub async fn create(
        &self,
        actor: &AuthUser,
        input: ExerciseRecordInput,
    ) -> Result<ExerciseRecord> {
        let values = self.check(actor, input).await?;
        let record = self.records.create(&actor.id, values).await?;
        tracing::info!(
            user_id = %actor.id,
            exercise_id = %record.exercise_id,
            weight = record.weight,
            reps = record.reps,
            "logged exercise record"
        );
        Ok(record)
    }

    pub async fn update(
        &self,
        actor: &AuthUser,
        id: &str,
        input: ExerciseRecordInput,
    ) -> Result<ExerciseRecord> {
        let existing = self.get(actor, id).await?;
        let values = self.check(actor, input).await?;

        if !self.records.update(id, &actor.id, values.clone()).await? {
            return Err(AppError::NotFound("Exercise record not found".to_string()));
        }

        Ok(ExerciseRecord {
            exercise_id: values.exercise_id,
            date: values.date,
            weight: values.weight,
            weight_unit: values.weight_unit,
            reps: values.reps,
            sets: values.sets,
            notes: values.notes,
            ..existing
        })
    }

    pub async fn delete(&self, actor: &AuthUser, id: &str) -> Result<()> {
        self.get(actor, id).await?;
        if !self.records.delete(id, &actor.id).await? {
            return Err(AppError::NotFound("Exercise record not found".to_string()));
        }
        tracing::info!(user_id = %actor.id, record_id = %id, "deleted exercise record");
        Ok(())
    }

    async fn check(&self, actor: &AuthUser, input: ExerciseRecordInput) -> Result<ExerciseRecordValues> {
        if !input.weight.is_finite() || input.weight < 0.0 || input.weight > MAX_LIFT_WEIGHT {
            return Err(AppError::Validation(format!(
                "Weight must be between 0 and {}",
                MAX_LIFT_WEIGHT
            )));
        }
        if !(1..=MAX_REPS).contains(&input.reps) {
            return Err(AppError::Validation(format!(
                "Reps must be between 1 and {}",
                MAX_REPS
            )));
        }
        if !(1..=MAX_SETS).contains(&input.sets) {
            return Err(AppError::Validation(format!(
                "Sets must be between 1 and {}",
                MAX_SETS
            )));
        }
        let weight_unit = WeightUnit::parse(&input.weight_unit).ok_or_else(|| {
            AppError::Validation(format!("Unknown weight unit '{}'", input.weight_unit))
        })?;
        ensure_not_future(input.date)?;
        let notes = optional_text(input.notes.as_deref(), "notes")?;
        self.require_exercise(actor, &input.exercise_id).await?;

        Ok(ExerciseRecordValues {
            exercise_id: input.exercise_id,
            date: input.date,
            weight: input.weight,
            weight_unit,
            reps: input.reps,
            sets: input.sets,
            notes,
        })
    }

    async fn require_exercise(&self, actor: &AuthUser, exercise_id: &str) -> Result<()> {
        validate_id(exercise_id, "exercise")?;
        ensure_owned(
            self.exercises.find_by_id(exercise_id).await?,
            actor,
            "exercise",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbPool;
    use crate::models::{Exercise, UserRole};
    use crate::services::test_support::{create_actor, setup_test_db};
    use chrono::NaiveDate;

    fn service(pool: &DbPool) -> ExerciseRecordService {
        ExerciseRecordService::new(
            ExerciseRecordRepository::new(pool.clone()),
            ExerciseRepository::new(pool.clone()),
        )
    }

    async fn exercise(pool: &DbPool, actor: &AuthUser, name: &str) -> Exercise {
        ExerciseRepository::new(pool.clone())
            .create(&actor.id, name, None)
            .await
            .unwrap()
    }

    fn input(exercise_id: &str, weight: f64, unit: &str, reps: i32) -> ExerciseRecordInput {
        ExerciseRecordInput {
            exercise_id: exercise_id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            weight,
            weight_unit: unit.to_string(),
            reps,
            sets: 3,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_best_compares_across_units() {
        let pool = setup_test_db();
        let actor = create_actor(&pool, "alice", UserRole::User).await;
        let bench = exercise(&pool, &actor, "Bench Press").await;
        let service = service(&pool);

        service
            .create(&actor, input(&bench.id, 100.0, "kg", 5))
            .await
            .unwrap();
        // 225 lb is about 102 kg.
        let heaviest = service
            .create(&actor, input(&bench.id, 225.0, "lb", 3))
            .await
            .unwrap();
        service
            .create(&actor, input(&bench.id, 200.0, "lb", 8))
            .await
            .unwrap();

        let best = service.best_for_exercise(&actor, &bench.id).await.unwrap();
        assert_eq!(best.id, heaviest.id);
    }

    #[tokio::test]
    async fn test_best_without_records_is_not_found() {
        let pool = setup_test_db();
        let actor = create_actor(&pool, "alice", UserRole::User).await;
        let squat = exercise(&pool, &actor, "Squat").await;

        assert!(matches!(
            service(&pool).best_for_exercise(&actor, &squat.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_invalid_values() {
        let pool = setup_test_db();
        let actor = create_actor(&pool, "alice", UserRole::User).await;
        let squat = exercise(&pool, &actor, "Squat").await;
        let service = service(&pool);

        for bad in [
            input(&squat.id, -1.0, "kg", 5),
            input(&squat.id, 100.0, "kg", 0),
            input(&squat.id, 100.0, "grams", 5),
        ] {
            assert!(matches!(
                service.create(&actor, bad).await,
                Err(AppError::Validation(_))
            ));
        }

        let mut no_sets = input(&squat.id, 100.0, "kg", 5);
        no_sets.sets = 0;
        assert!(service.create(&actor, no_sets).await.is_err());
    }

    #[tokio::test]
    async fn test_cannot_log_against_foreign_exercise() {
        let pool = setup_test_db();
        let alice = create_actor(&pool, "alice", UserRole::User).await;
        let bob = create_actor(&pool, "bob", UserRole::User).await;
        let bobs = exercise(&pool, &bob, "Curl").await;

        assert!(matches!(
            service(&pool)
                .create(&alice, input(&bobs.id, 20.0, "kg", 10))
                .await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_list_by_exercise() {
        let pool = setup_test_db();
        let actor = create_actor(&pool, "alice", UserRole::User).await;
        let squat = exercise(&pool, &actor, "Squat").await;
        let deadlift = exercise(&pool, &actor, "Deadlift").await;
        let service = service(&pool);

        let record = service
            .create(&actor, input(&squat.id, 120.0, "kg", 5))
            .await
            .unwrap();
        let mut moved = input(&deadlift.id, 150.0, "kg", 3);
        moved.notes = Some(" felt heavy ".to_string());
        let updated = service.update(&actor, &record.id, moved).await.unwrap();
        assert_eq!(updated.exercise_id, deadlift.id);
        assert_eq!(updated.notes.as_deref(), Some("felt heavy"));

        assert!(service
            .list_by_exercise(&actor, &squat.id)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            service
                .list_by_exercise(&actor, &deadlift.id)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
