use anyhow::Context;
use folio_app::modules;
use folio_kernel::settings::Settings;
use folio_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load FOLIO settings")?;

    folio_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "folio-app bootstrap starting"
    );

    let db = folio_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };

    registry.init_all(&ctx).await?;
    folio_db::apply_migrations(&db, &registry.collect_migrations()).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("folio-app bootstrap complete");

    folio_http::start_server(&registry, &settings, &db).await?;

    registry.stop_all().await?;
    tracing::info!("folio-app shutdown complete");

    Ok(())
}
