use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{BodyWeight, BodyWeightInput, WeightUnit};
use crate::pagination::{Page, PageRequest};
use crate::repositories::{body_weight_repo::BODY_WEIGHT_LISTING, BodyWeightRepository, BodyWeightValues};

use super::{ensure_not_future, ensure_owned, validate_id};

const MAX_BODY_WEIGHT: f64 = 1000.0;

#[derive(Clone)]
pub struct BodyWeightService {
    weights: BodyWeightRepository,
}

impl BodyWeightService {
    pub fn new(weights: BodyWeightRepository) -> Self {
        Self { weights }
    }

    pub async fn get(&self, actor: &AuthUser, id: &str) -> Result<BodyWeight> {
        validate_id(id, "body weight")?;
        ensure_owned(self.weights.find_by_id(id).await?, actor, "body weight")
    }

    pub async fn latest(&self, actor: &AuthUser) -> Result<BodyWeight> {
        self.weights
            .find_latest(&actor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("No body weight recorded yet".to_string()))
    }

    pub async fn list(&self, actor: &AuthUser, request: &PageRequest) -> Result<Page<BodyWeight>> {
        let page = request.validate(&BODY_WEIGHT_LISTING)?;
        self.weights.list(&actor.id, page).await
    }

    pub async fn create(&self, actor: &AuthUser, input: BodyWeightInput) -> Result<BodyWeight> {
        let values = check(input)?;
        let weight = self.weights.create(&actor.id, values).await?;
        tracing::info!(user_id = %actor.id, body_weight_id = %weight.id, "recorded body weight");
        Ok(weight)
    }

    pub async fn update(
        &self,
        actor: &AuthUser,
        id: &str,
        input: BodyWeightInput,
    ) -> Result<BodyWeight> {
        let existing = self.get(actor, id).await?;
        let values = check(input)?;

        if !self.weights.update(id, &actor.id, values.clone()).await? {
            return Err(AppError::NotFound("Body weight not found".to_string()));
        }

        Ok(BodyWeight {
            weight: values.weight,
            weight_unit: values.weight_unit,
            date: values.date,
            ..existing
        })
    }

    pub async fn delete(&self, actor: &AuthUser, id: &str) -> Result<()> {
        self.get(actor, id).await?;
        if !self.weights.delete(id, &actor.id).await? {
            return Err(AppError::NotFound("Body weight not found".to_string()));
        }
        tracing::info!(user_id = %actor.id, body_weight_id = %id, "deleted body weight");
        Ok(())
    }
}

fn check(input: BodyWeightInput) -> Result<BodyWeightValues> {
    if !input.weight.is_finite() || input.weight <= 0.0 || input.weight >= MAX_BODY_WEIGHT {
        return Err(AppError::Validation(format!(
            "Weight must be greater than 0 and less than {}",
            MAX_BODY_WEIGHT
        )));
    }
    let weight_unit = WeightUnit::parse(&input.weight_unit).ok_or_else(|| {
        AppError::Validation(format!("Unknown weight unit '{}'", input.weight_unit))
    })?;
    ensure_not_future(input.date)?;

    Ok(BodyWeightValues {
        weight: input.weight,
        weight_unit,
        date: input.date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::services::test_support::{create_actor, setup_test_db};
    use chrono::NaiveDate;

    fn input(weight: f64, unit: &str, day: u32) -> BodyWeightInput {
        BodyWeightInput {
            weight,
            weight_unit: unit.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_latest_follows_date() {
        let pool = setup_test_db();
        let actor = create_actor(&pool, "alice", UserRole::User).await;
        let service = BodyWeightService::new(BodyWeightRepository::new(pool));

        assert!(matches!(
            service.latest(&actor).await,
            Err(AppError::NotFound(_))
        ));

        service.create(&actor, input(80.0, "kg", 10)).await.unwrap();
        service.create(&actor, input(79.2, "kg", 20)).await.unwrap();
        service.create(&actor, input(176.0, "lb", 1)).await.unwrap();

        let latest = service.latest(&actor).await.unwrap();
        assert_eq!(latest.weight, 79.2);
    }

    #[tokio::test]
    async fn test_rejects_bad_weight_and_unit() {
        let pool = setup_test_db();
        let actor = create_actor(&pool, "alice", UserRole::User).await;
        let service = BodyWeightService::new(BodyWeightRepository::new(pool));

        for bad in [
            input(0.0, "kg", 1),
            input(1000.0, "kg", 1),
            input(f64::NAN, "kg", 1),
            input(80.0, "stone", 1),
        ] {
            assert!(matches!(
                service.create(&actor, bad).await,
                Err(AppError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_update_converts_unit_string() {
        let pool = setup_test_db();
        let actor = create_actor(&pool, "alice", UserRole::User).await;
        let service = BodyWeightService::new(BodyWeightRepository::new(pool));

        let entry = service.create(&actor, input(80.0, "kg", 1)).await.unwrap();
        let updated = service
            .update(&actor, &entry.id, input(175.5, "LBS", 2))
            .await
            .unwrap();
        assert_eq!(updated.weight_unit, WeightUnit::Pounds);
        assert_eq!(updated.created_at, entry.created_at);
    }

    #[tokio::test]
    async fn test_other_users_entry_forbidden() {
        let pool = setup_test_db();
        let alice = create_actor(&pool, "alice", UserRole::User).await;
        let bob = create_actor(&pool, "bob", UserRole::User).await;
        let service = BodyWeightService::new(BodyWeightRepository::new(pool));

        let entry = service.create(&alice, input(60.0, "kg", 1)).await.unwrap();
        assert!(matches!(
            service.delete(&bob, &entry.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.latest(&bob).await,
            Err(AppError::NotFound(_))
        ));
    }
}
