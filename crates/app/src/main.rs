use migration::{Migrator, MigratorTrait};

use crate::{error::Result, settings::Database};

mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "fairshare={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let timezone = settings.timezone()?;
    tracing::info!(%timezone, database = ?settings.server.database, "starting");

    let db = connect_database(&settings.server.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    let listener = tokio::net::TcpListener::bind(settings.address()).await?;
    server::run_with_listener(engine, timezone, listener).await?;

    Ok(())
}

async fn connect_database(config: &Database) -> Result<sea_orm::DatabaseConnection> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
