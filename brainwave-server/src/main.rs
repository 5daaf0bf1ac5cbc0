use anyhow::Context;
use brainwave_server::{AppConfig, AppState, build_app, migrations::Migrator, observability};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; anything else is worth a warning
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Warning: Failed to load .env file: {e}");
    }

    let config = AppConfig::load()?;
    observability::init_tracing(&config.log_level);

    let db = Database::connect(&config.database_url)
        .await
        .with_context(|| format!("connecting to {}", config.database_url))?;
    Migrator::up(&db, None).await.context("running migrations")?;

    let port = config.port;
    let app = build_app(AppState::new(db, config)?);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding port {port}"))?;
    tracing::info!(port, "Brainwave listening");
    axum::serve(listener, app).await?;
    Ok(())
}
