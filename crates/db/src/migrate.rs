//! Startup migration runner with an applied-migrations ledger.

use std::collections::HashSet;

use anyhow::Context;
use folio_kernel::Migration;
use sea_orm::sea_query::{Alias, Query};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

const LEDGER_TABLE: &str = "schema_migrations";

const LEDGER_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    module TEXT NOT NULL,
    migration_id TEXT NOT NULL,
    applied_at TEXT NOT NULL,
    PRIMARY KEY (module, migration_id)
)";

/// Apply every not-yet-applied migration in the given order.
///
/// Applied (module, id) pairs are recorded in the `schema_migrations` ledger
/// so each migration runs exactly once across restarts.
pub async fn apply_migrations(
    db: &DatabaseConnection,
    migrations: &[(String, Migration)],
) -> anyhow::Result<()> {
    let backend = db.get_database_backend();

    db.execute_unprepared(LEDGER_DDL)
        .await
        .context("failed to create migration ledger")?;

    let rows = db
        .query_all(Statement::from_string(
            backend,
            format!("SELECT module, migration_id FROM {LEDGER_TABLE}"),
        ))
        .await
        .context("failed to read migration ledger")?;

    let mut applied = HashSet::new();
    for row in &rows {
        let module: String = row.try_get("", "module")?;
        let migration_id: String = row.try_get("", "migration_id")?;
        applied.insert((module, migration_id));
    }

    for (module, migration) in migrations {
        if applied.contains(&(module.clone(), migration.id.to_string())) {
            continue;
        }

        tracing::info!(module = %module, migration = migration.id, "applying migration");

        db.execute_unprepared(migration.up)
            .await
            .with_context(|| format!("migration '{}/{}' failed", module, migration.id))?;

        let applied_at = time::OffsetDateTime::now_utc().to_string();
        let record = Query::insert()
            .into_table(Alias::new(LEDGER_TABLE))
            .columns([
                Alias::new("module"),
                Alias::new("migration_id"),
                Alias::new("applied_at"),
            ])
            .values_panic([
                module.as_str().into(),
                migration.id.into(),
                applied_at.into(),
            ])
            .to_owned();

        db.execute(backend.build(&record))
            .await
            .with_context(|| format!("failed to record migration '{}/{}'", module, migration.id))?;
    }

    Ok(())
}
