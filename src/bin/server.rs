use rpa_monitor::{config::AppConfig, migrator, router};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down server"),
        Err(err) => tracing::error!("Unable to listen for shutdown signal: {}", err),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    rpa_monitor::telemetry::init_telemetry("rpa-monitor")?;

    let config = AppConfig::from_env()?;

    let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    let db = Database::connect(&config.database_url).await?;

    migrator::Migrator::up(&db, None).await?;

    rpa_monitor::metrics::init_metrics(&db).await;

    let app = router::app(db, config.clone())
        .merge(router::metrics_routes(metric_handle))
        .layer(prometheus_layer);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
