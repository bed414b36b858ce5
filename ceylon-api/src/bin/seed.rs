//! Replaces the catalog tables with the fixed sample data.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ceylon_store::{seed, Config, DbClient, PgCatalogRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ceylon_store=info,ceylon_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    if config.database.is_memory() {
        anyhow::bail!("database.url is 'memory'; point CEYLON__DATABASE__URL at Postgres to seed");
    }

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    let repo = PgCatalogRepository::new(db.pool.clone());
    let created = seed::seed_catalog(&repo).await?;
    tracing::info!("Seeded {} catalog items", created);
    Ok(())
}
