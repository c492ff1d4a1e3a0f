//! Bookshelf server - library catalog of authors and books

use anyhow::Context;
use axum::{extract::Request, ServiceExt};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tower::Layer;

use bookshelf_server::{
    api,
    config::{AppConfig, DatabaseConfig, StoreBackend},
    logging,
    repository::Repository,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    logging::init(&config.logging);

    tracing::info!("Starting Bookshelf Server v{}", env!("CARGO_PKG_VERSION"));

    let repository = connect(&config.database).await?;

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState::new(config, repository);

    // Method override has to run before routing picks a handler
    let app = axum::middleware::map_request(api::method_override).layer(api::create_router(state));

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}

/// Open the configured catalog store
async fn connect(database: &DatabaseConfig) -> anyhow::Result<Repository> {
    match database.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store, data is lost on shutdown");
            Ok(Repository::memory())
        }
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .min_connections(database.min_connections)
                .connect(&database.url)
                .await
                .context("Failed to connect to database")?;

            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            tracing::info!("Database migrations completed");

            Ok(Repository::postgres(pool))
        }
    }
}
