//! Seeds the sample fleet, or with `--clear` removes every robot.

use rpa_monitor::{config::AppConfig, migrator, seed};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    rpa_monitor::telemetry::init_telemetry("rpa-monitor-seed")?;

    let config = AppConfig::from_env()?;
    let db = Database::connect(&config.database_url).await?;
    migrator::Migrator::up(&db, None).await?;

    if std::env::args().nth(1).as_deref() == Some("--clear") {
        tracing::info!("Clearing the database...");
        seed::clear_robots(&db).await?;
    } else {
        seed::seed_robots(&db).await?;
    }

    Ok(())
}
