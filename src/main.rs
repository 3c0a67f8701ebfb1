use std::time::Duration;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fittrack::config::Config;
use fittrack::repositories::SessionRepository;
use fittrack::state::AppState;
use fittrack::{db, migrations, routes, version};

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fittrack=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!(version = version::GIT_VERSION, "Connecting to database: {}", config.database_url);

    let pool = db::create_pool(&config.database_url)?;
    migrations::run_migrations(&pool)?;

    spawn_session_cleanup(SessionRepository::new(pool.clone()));

    let app = routes::create_router(AppState::new(pool, &config), &config);

    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Periodically purge expired sessions.
fn spawn_session_cleanup(sessions: SessionRepository) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match sessions.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!("Removed {} expired sessions", removed),
                Err(e) => tracing::warn!("Session cleanup failed: {}", e),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
