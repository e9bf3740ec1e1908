use league_server::{
    api::AppState,
    config,
    create_app,
    db::{self, SqliteRepository},
    league::{LeagueManager, MatchSimulator},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load config
    let config = config::Config::from_env()?;
    tracing::info!("Starting league server on {}", config.server_addr());

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    // Run migrations and seed the roster
    db::run_migrations(&pool).await?;
    db::seed_teams(&pool).await?;

    let simulator = match config.rng_seed {
        Some(seed) => {
            tracing::info!("Simulating with fixed seed {}", seed);
            MatchSimulator::seeded(seed)
        }
        None => MatchSimulator::from_entropy(),
    };

    let shutdown = CancellationToken::new();
    let league = LeagueManager::new(SqliteRepository::new(pool), simulator);
    let state = Arc::new(AppState::new(league, shutdown.clone()));

    let app = create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server_addr()).await?;
    tracing::info!("Server listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
    shutdown.cancel();
}
