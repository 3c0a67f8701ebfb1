pub mod body_weight_repo;
pub mod exercise_record_repo;
pub mod exercise_repo;
pub mod muscle_repo;
pub mod muscle_size_repo;
pub mod session_repo;
pub mod user_repo;
pub mod workout_repo;

pub use body_weight_repo::{BodyWeightRepository, BodyWeightValues};
pub use exercise_record_repo::{ExerciseRecordRepository, ExerciseRecordValues};
pub use exercise_repo::ExerciseRepository;
pub use muscle_repo::MuscleRepository;
pub use muscle_size_repo::{MuscleSizeRepository, MuscleSizeValues};
pub use session_repo::SessionRepository;
pub use user_repo::UserRepository;
pub use workout_repo::WorkoutRepository;

use rusqlite::ffi;

use crate::error::AppError;

/// Turn a UNIQUE or PRIMARY KEY violation into a validation error with `message`.
pub(crate) fn on_duplicate(message: &'static str) -> impl Fn(rusqlite::Error) -> AppError {
    move |err| match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(
                failure.extended_code,
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            ) =>
        {
            AppError::Validation(message.to_string())
        }
        _ => AppError::Database(err),
    }
}
