use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

use crate::dashboard::{AlertStats, DashboardStats};
use crate::entities::{prelude::AlertKind, robot, Robot};

/// Fleet counts computed in the database, one `COUNT(*)` per figure.
pub async fn robot_stats(db: &DatabaseConnection) -> Result<DashboardStats, DbErr> {
    let total = Robot::find().count(db).await?;
    let active = Robot::find()
        .filter(robot::Column::Status.eq(true))
        .count(db)
        .await?;

    let mut alerts = AlertStats::default();
    for kind in AlertKind::ALL {
        let count = Robot::find()
            .filter(robot::Column::Alert.eq(kind))
            .count(db)
            .await?;
        alerts.total += count;
        *alerts.slot_mut(kind) = count;
    }

    Ok(DashboardStats {
        total,
        active,
        resolved: total - active,
        alerts,
    })
}

/// Recomputes the fleet gauges. Called at startup and after every mutation;
/// a failed read leaves the previous values in place.
pub async fn refresh_robot_gauges(db: &DatabaseConnection) {
    match robot_stats(db).await {
        Ok(stats) => record_stats(&stats),
        Err(e) => tracing::warn!("Failed to refresh robot metrics: {}", e),
    }
}

pub async fn init_metrics(db: &DatabaseConnection) {
    refresh_robot_gauges(db).await;
    tracing::info!("Initialized robot metrics");
}

pub fn record_stats(stats: &DashboardStats) {
    metrics::gauge!("rpa_robots_total").set(stats.total as f64);
    metrics::gauge!("rpa_robots_active_total").set(stats.active as f64);
    metrics::gauge!("rpa_robots_resolved_total").set(stats.resolved as f64);
    for kind in AlertKind::ALL {
        metrics::gauge!("rpa_robots_alerts_total", "alert" => kind.as_str())
            .set(stats.alerts.count(kind) as f64);
    }
}
