pub mod auth;
pub mod exercise_records;
pub mod exercises;
pub mod health;
pub mod measurements;
pub mod muscles;
pub mod users;
pub mod workouts;
