use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::handlers::{
    auth, exercise_records, exercises, health, measurements, muscles, users, workouts,
};
use crate::state::AppState;

pub fn create_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        // Auth routes
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // User routes
        .route("/users", get(users::list).post(users::create))
        .route("/users/by-name/{name}", get(users::show_by_name))
        .route(
            "/users/{id}",
            get(users::show).put(users::update).delete(users::delete),
        )
        .route("/users/{id}/password", put(users::change_password))
        .route("/users/{id}/role", put(users::change_role))
        // Workout routes
        .route("/workouts", get(workouts::list).post(workouts::create))
        .route("/workouts/by-name/{name}", get(workouts::show_by_name))
        .route(
            "/workouts/{id}",
            get(workouts::show)
                .put(workouts::update)
                .delete(workouts::delete),
        )
        .route("/workouts/{id}/exercises", get(workouts::list_exercises))
        .route(
            "/workouts/{id}/exercises/{exercise_id}",
            post(workouts::add_exercise).delete(workouts::remove_exercise),
        )
        // Exercise routes
        .route("/exercises", get(exercises::list).post(exercises::create))
        .route("/exercises/by-name/{name}", get(exercises::show_by_name))
        .route(
            "/exercises/{id}",
            get(exercises::show)
                .put(exercises::update)
                .delete(exercises::delete),
        )
        .route("/exercises/{id}/muscles", get(exercises::list_muscles))
        .route(
            "/exercises/{id}/muscles/{muscle_id}",
            post(exercises::add_muscle).delete(exercises::remove_muscle),
        )
        // Muscle routes
        .route("/muscles", get(muscles::list).post(muscles::create))
        .route("/muscles/by-name/{name}", get(muscles::show_by_name))
        .route(
            "/muscles/{id}",
            get(muscles::show)
                .put(muscles::update)
                .delete(muscles::delete),
        )
        // Measurement routes
        .route(
            "/muscle-sizes",
            get(measurements::list_muscle_sizes).post(measurements::create_muscle_size),
        )
        .route(
            "/muscle-sizes/by-muscle/{muscle_id}",
            get(measurements::muscle_sizes_by_muscle),
        )
        .route(
            "/muscle-sizes/{id}",
            get(measurements::show_muscle_size)
                .put(measurements::update_muscle_size)
                .delete(measurements::delete_muscle_size),
        )
        .route(
            "/body-weights",
            get(measurements::list_body_weights).post(measurements::create_body_weight),
        )
        .route("/body-weights/latest", get(measurements::latest_body_weight))
        .route(
            "/body-weights/{id}",
            get(measurements::show_body_weight)
                .put(measurements::update_body_weight)
                .delete(measurements::delete_body_weight),
        )
        // Exercise record routes
        .route(
            "/exercise-records",
            get(exercise_records::list).post(exercise_records::create),
        )
        .route(
            "/exercise-records/by-exercise/{exercise_id}",
            get(exercise_records::by_exercise),
        )
        .route(
            "/exercise-records/by-exercise/{exercise_id}/best",
            get(exercise_records::best),
        )
        .route(
            "/exercise-records/{id}",
            get(exercise_records::show)
                .put(exercise_records::update)
                .delete(exercise_records::delete),
        )
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when none are configured. Credentialed (cookie) requests need an
/// explicit origin list.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        layer.allow_origin(AllowOrigin::any())
    } else {
        layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}
