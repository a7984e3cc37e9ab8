use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::app::build_router;
use api::gql::build_schema;
use api::services::spawn_cache_sweeper;
use api::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .idle_timeout(Some(Duration::from_secs(600))) // 10 minutes
        .max_lifetime(Some(Duration::from_secs(1800))) // 30 minutes
        .connect(&config.database_url)
        .await?;
    tracing::info!(
        "Connected to Postgres with max {} connections",
        config.database_max_connections
    );

    if config.skip_migrations {
        tracing::info!("Skipping database migrations (SKIP_MIGRATIONS=true)");
    } else {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../../migrations").run(&pool).await?;
        tracing::info!("Database migrations completed successfully");
    }

    let port = config.port;
    let state = AppState::new(pool, config);
    tracing::info!(
        "Search cache TTL is {}s",
        state.search().cache().ttl().as_secs()
    );

    let schema = build_schema(state.clone());

    let _sweeper_handle = spawn_cache_sweeper(state.clone());
    tracing::info!("Search cache sweeper started");

    let app = build_router(state, schema);

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
