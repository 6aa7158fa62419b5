use polostats::{
    preferences::{InMemoryPreferencesRepository, PostgresPreferencesRepository},
    routes,
    stats::{InMemoryStatsRepository, PostgresStatsRepository},
    AppConfig, AppState,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polostats=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting water polo stats server");

    let config = AppConfig::from_env();

    let app_state = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await?;
            info!(max_connections = config.max_connections, "Connected to PostgreSQL");

            AppState::new(
                Arc::new(PostgresStatsRepository::new(pool.clone())),
                Arc::new(PostgresPreferencesRepository::new(pool)),
            )
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory repositories");
            AppState::new(
                Arc::new(InMemoryStatsRepository::new()),
                Arc::new(InMemoryPreferencesRepository::new()),
            )
        }
    };

    let app = routes::app(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
