use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ceylon_api::{app_with_origins, AppState, AuthConfig};
use ceylon_core::memory::{InMemoryBookingRepository, InMemoryCatalogRepository};
use ceylon_core::{BookingRepository, CatalogRepository};
use ceylon_store::{seed, Config, DbClient, PgBookingRepository, PgCatalogRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ceylon_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Ceylon API on port {}", config.server.port);

    let (catalog_repo, booking_repo): (Arc<dyn CatalogRepository>, Arc<dyn BookingRepository>) =
        if config.database.is_memory() {
            let catalog = Arc::new(InMemoryCatalogRepository::new());
            let seeded = seed::seed_catalog(catalog.as_ref()).await?;
            tracing::warn!("Using in-memory storage with {} sample catalog items; data is lost on exit", seeded);
            let bookings: Arc<dyn BookingRepository> = Arc::new(InMemoryBookingRepository::new());
            (catalog as Arc<dyn CatalogRepository>, bookings)
        } else {
            let db = DbClient::new(&config.database.url, config.database.max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;
            let catalog: Arc<dyn CatalogRepository> = Arc::new(PgCatalogRepository::new(db.pool.clone()));
            let bookings: Arc<dyn BookingRepository> = Arc::new(PgBookingRepository::new(db.pool.clone()));
            (catalog, bookings)
        };

    let state = AppState::new(
        catalog_repo,
        booking_repo,
        config.pricing.clone(),
        AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    );

    let app = app_with_origins(state, &config.server.allowed_origins);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
