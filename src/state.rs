use axum::extract::FromRef;

use crate::config::Config;
use crate::db::DbPool;
use crate::handlers::auth::AuthState;
use crate::middleware::SessionState;
use crate::repositories::{
    BodyWeightRepository, ExerciseRecordRepository, ExerciseRepository, MuscleRepository,
    MuscleSizeRepository, SessionRepository, UserRepository, WorkoutRepository,
};
use crate::services::{
    BodyWeightService, ExerciseRecordService, ExerciseService, MuscleService, MuscleSizeService,
    UserService, WorkoutService,
};

/// Router state. Handlers pull out just the service they need via `FromRef`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: DbPool,
    pub sessions: SessionState,
    pub auth: AuthState,
    pub users: UserService,
    pub workouts: WorkoutService,
    pub exercises: ExerciseService,
    pub muscles: MuscleService,
    pub muscle_sizes: MuscleSizeService,
    pub body_weights: BodyWeightService,
    pub exercise_records: ExerciseRecordService,
}

impl AppState {
    pub fn new(pool: DbPool, config: &Config) -> Self {
        let user_repo = UserRepository::new(pool.clone());
        let session_repo = SessionRepository::new(pool.clone());
        let workout_repo = WorkoutRepository::new(pool.clone());
        let exercise_repo = ExerciseRepository::new(pool.clone());
        let muscle_repo = MuscleRepository::new(pool.clone());

        let users = UserService::new(user_repo.clone(), session_repo.clone());

        Self {
            db: pool.clone(),
            sessions: SessionState {
                session_repo,
                user_repo,
            },
            auth: AuthState {
                users: users.clone(),
                cookie_secure: config.cookie_secure,
            },
            users,
            workouts: WorkoutService::new(workout_repo, exercise_repo.clone()),
            exercises: ExerciseService::new(exercise_repo.clone(), muscle_repo.clone()),
            muscles: MuscleService::new(muscle_repo.clone()),
            muscle_sizes: MuscleSizeService::new(
                MuscleSizeRepository::new(pool.clone()),
                muscle_repo,
            ),
            body_weights: BodyWeightService::new(BodyWeightRepository::new(pool.clone())),
            exercise_records: ExerciseRecordService::new(
                ExerciseRecordRepository::new(pool),
                exercise_repo,
            ),
        }
    }
}
