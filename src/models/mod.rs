pub mod body_weight;
pub mod exercise;
pub mod exercise_record;
pub mod from_row;
pub mod muscle;
pub mod muscle_size;
pub mod units;
pub mod user;
pub mod workout;

pub use body_weight::{BodyWeight, BodyWeightInput};
pub use exercise::{CreateExercise, Exercise, UpdateExercise, WorkoutExercise};
pub use exercise_record::{ExerciseRecord, ExerciseRecordInput};
pub use from_row::FromSqliteRow;
pub use muscle::{CreateMuscle, Muscle, UpdateMuscle};
pub use muscle_size::{MuscleSize, MuscleSizeInput};
pub use units::{SizeUnit, WeightUnit};
pub use user::{
    ChangePassword, ChangeRole, CreateUser, LoginCredentials, UpdateUser, User, UserDto, UserRole,
};
pub use workout::{CreateWorkout, UpdateWorkout, Workout};
