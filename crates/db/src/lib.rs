//! SeaORM connection factory and migration tooling for folio.

pub mod entities;
mod migrate;

pub use migrate::apply_migrations;

use anyhow::Context;
use folio_kernel::settings::DatabaseSettings;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Open a connection pool against the configured database and verify it.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .max_connections(settings.max_connections)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to database at {}", settings.url))?;

    db.ping().await.context("database ping failed")?;

    tracing::info!(url = %settings.url, "database connection established");

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_establishes_sqlite_pool() {
        let settings = DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };

        let db = connect(&settings).await.unwrap();
        assert!(db.ping().await.is_ok());
    }

    #[tokio::test]
    async fn connect_reports_unreachable_database() {
        let settings = DatabaseSettings {
            url: "sqlite://this/path/does/not/exist/folio.db".to_string(),
            max_connections: 1,
        };

        let err = connect(&settings).await.unwrap_err();
        assert!(err.to_string().contains("failed to connect"));
    }
}
