use axum::{
    extract::{Extension, Query},
    response::Response,
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::response;
use crate::api::validation::Validator;
use crate::dashboard::{AlertFilter, DashboardStats, RobotFilter, SortOrder, StatusFilter};
use crate::entities::{robot, Robot};
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// Case-insensitive substring of the robot name.
    pub search: Option<String>,
    /// `all`, `true` (active) or `false` (resolved).
    pub status: Option<String>,
    /// `all`, `none` or one of the alert literals.
    pub alert: Option<String>,
    /// `id` (default) or `recent`.
    pub order: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardView {
    #[schema(value_type = Vec<Robot>)]
    pub robots: Vec<robot::Model>,
    pub stats: DashboardStats,
}

fn parse_query(query: &DashboardQuery) -> Result<(RobotFilter, SortOrder), ApiError> {
    let mut validator = Validator::new();

    let status = match query.status.as_deref() {
        None | Some("") => Some(StatusFilter::All),
        Some(raw) => {
            let parsed = StatusFilter::parse(raw);
            if parsed.is_none() {
                validator.reject_query("status", raw, "Invalid status filter");
            }
            parsed
        }
    };
    let alert = match query.alert.as_deref() {
        None | Some("") => Some(AlertFilter::All),
        Some(raw) => {
            let parsed = AlertFilter::parse(raw);
            if parsed.is_none() {
                validator.reject_query("alert", raw, "Invalid alert filter");
            }
            parsed
        }
    };
    let order = match query.order.as_deref() {
        None | Some("") => Some(SortOrder::Id),
        Some(raw) => {
            let parsed = SortOrder::parse(raw);
            if parsed.is_none() {
                validator.reject_query("order", raw, "Invalid order");
            }
            parsed
        }
    };

    let search = query.search.as_deref().unwrap_or("");
    let parsed = status
        .zip(alert)
        .zip(order)
        .map(|((status, alert), order)| (RobotFilter::new(search, status, alert), order));
    validator.finish(parsed)
}

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Robots",
    params(DashboardQuery),
    responses(
        (
            status = 200,
            description = "Filtered robots and summary counts",
            body = DashboardEnvelope
        ),
        (status = 400, description = "Invalid filter", body = ErrorEnvelope)
    )
)]
pub async fn get_dashboard(
    Extension(db): Extension<DatabaseConnection>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, ApiError> {
    let (filter, order) = parse_query(&query)?;
    tracing::Span::current().record("action", "dashboard");

    let select = match order {
        SortOrder::Id => Robot::find().order_by_asc(robot::Column::Id),
        SortOrder::Recent => Robot::find()
            .order_by_desc(robot::Column::UpdatedAt)
            .order_by_desc(robot::Column::Id),
    };
    let all = select.all(&db).await?;

    // Summary cards always describe the whole fleet, not the filtered table.
    let stats = DashboardStats::from_robots(&all);
    let robots = filter.apply(&all).into_iter().cloned().collect();

    Ok(response::ok(DashboardView { robots, stats }))
}
