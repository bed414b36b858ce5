use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;

use ceylon_core::RepositoryError;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations").run(&self.pool).await?;
        info!("Migrations completed successfully.");
        Ok(())
    }
}

/// Maps a driver error onto the repository taxonomy. Unique violations
/// (reference collisions) surface as `Duplicate`.
pub(crate) fn db_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let constraint = db.constraint().unwrap_or("unique").to_string();
            return RepositoryError::Duplicate(constraint);
        }
    }
    RepositoryError::Backend(Box::new(err))
}

/// A stored column that no longer parses into its domain type.
pub(crate) fn corrupt(column: &str, value: &str) -> RepositoryError {
    RepositoryError::Backend(format!("unreadable {column} value '{value}'").into())
}
