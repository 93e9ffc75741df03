//! Shared helpers for module tests.

use folio_kernel::ModuleRegistry;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Spins up a fresh in-memory SQLite database with the full schema applied.
///
/// The pool is capped at one connection: every new in-memory SQLite
/// connection would otherwise be a brand new empty database.
pub(crate) async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();

    let mut registry = ModuleRegistry::new();
    crate::modules::register_all(&mut registry);
    folio_db::apply_migrations(&db, &registry.collect_migrations())
        .await
        .unwrap();

    db
}
