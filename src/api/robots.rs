use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    response::Response,
    Json,
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use serde_json::Value;
use tracing::info;

use crate::api::response::{self, Envelope};
use crate::api::validation::Validator;
use crate::entities::{robot, Robot};
use crate::error::ApiError;
use crate::metrics;

fn record_action(action: &str, robot_id: Option<i32>) {
    let span = tracing::Span::current();
    span.record("action", action);
    if let Some(id) = robot_id {
        span.record("robot_id", id);
    }
}

/// A request without a JSON content type has no body to read, so the alert
/// check reports the missing `alert` instead of a JSON rejection.
fn alert_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Null),
        Err(rejection) => Err(rejection.into()),
    }
}

async fn find_robot(db: &DatabaseConnection, id: i32) -> Result<robot::Model, ApiError> {
    Robot::find_by_id(id).one(db).await?.ok_or(ApiError::NotFound)
}

// GET /api/robots
#[utoipa::path(
    get,
    path = "/api/robots",
    tag = "Robots",
    responses((status = 200, description = "Every robot, ordered by id", body = RobotListEnvelope))
)]
pub async fn list_robots(
    Extension(db): Extension<DatabaseConnection>,
) -> Result<Response, ApiError> {
    record_action("list", None);
    let robots = Robot::find()
        .order_by_asc(robot::Column::Id)
        .all(&db)
        .await?;
    Ok(response::ok(robots))
}

// GET /api/robots/:id
#[utoipa::path(
    get,
    path = "/api/robots/{id}",
    tag = "Robots",
    params(("id" = i32, Path, description = "The id of the robot")),
    responses(
        (status = 200, description = "The robot", body = RobotEnvelope),
        (status = 400, description = "Id not valid", body = ErrorEnvelope),
        (status = 404, description = "Robot not found", body = ErrorEnvelope)
    )
)]
pub async fn get_robot(
    Extension(db): Extension<DatabaseConnection>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let mut validator = Validator::new();
    let id = validator.robot_id(&raw_id);
    let id = validator.finish(id)?;
    record_action("get", Some(id));

    let robot = find_robot(&db, id).await?;
    Ok(response::ok(robot))
}

// POST /api/robots
#[utoipa::path(
    post,
    path = "/api/robots",
    tag = "Robots",
    request_body = RobotRequest,
    responses(
        (status = 201, description = "Robot created", body = RobotEnvelope),
        (status = 400, description = "Validation error", body = ErrorEnvelope)
    )
)]
pub async fn create_robot(
    Extension(db): Extension<DatabaseConnection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;
    let mut validator = Validator::new();
    let draft = validator.robot_draft(&body);
    let draft = validator.finish(draft)?;
    record_action("create", None);

    let new_robot = robot::ActiveModel {
        name: Set(draft.name),
        status: Set(draft.status),
        alert: Set(draft.alert.flatten()),
        priority: Set(draft.priority.unwrap_or_default()),
        ..Default::default()
    };
    let robot = new_robot.insert(&db).await?;

    tracing::Span::current().record("robot_id", robot.id);
    info!("Created robot {} ({})", robot.id, robot.name);
    metrics::refresh_robot_gauges(&db).await;
    Ok(response::created(robot))
}

// PUT /api/robots/:id
#[utoipa::path(
    put,
    path = "/api/robots/{id}",
    tag = "Robots",
    params(("id" = i32, Path, description = "The id of the robot")),
    request_body = RobotRequest,
    responses(
        (status = 200, description = "Robot updated", body = RobotEnvelope),
        (status = 400, description = "Validation error", body = ErrorEnvelope),
        (status = 404, description = "Robot not found", body = ErrorEnvelope)
    )
)]
pub async fn update_robot(
    Extension(db): Extension<DatabaseConnection>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;
    let mut validator = Validator::new();
    let id = validator.robot_id(&raw_id);
    let draft = validator.robot_draft(&body);
    let (id, draft) = validator.finish(id.zip(draft))?;
    record_action("update", Some(id));

    let mut active = find_robot(&db, id).await?.into_active_model();
    active.name = Set(draft.name);
    active.status = Set(draft.status);
    if let Some(alert) = draft.alert {
        active.alert = Set(alert);
    }
    if let Some(priority) = draft.priority {
        active.priority = Set(priority);
    }
    let robot = active.update(&db).await?;

    info!("Updated robot {}", robot.id);
    metrics::refresh_robot_gauges(&db).await;
    Ok(response::ok(robot))
}

// PATCH /api/robots/:id
//
// Flips `status` in a single UPDATE so concurrent toggles cannot overwrite
// each other, then re-reads the row.
#[utoipa::path(
    patch,
    path = "/api/robots/{id}",
    tag = "Robots",
    params(("id" = i32, Path, description = "The id of the robot")),
    responses(
        (status = 200, description = "Robot status toggled", body = RobotEnvelope),
        (status = 400, description = "Id not valid", body = ErrorEnvelope),
        (status = 404, description = "Robot not found", body = ErrorEnvelope)
    )
)]
pub async fn toggle_robot_status(
    Extension(db): Extension<DatabaseConnection>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let mut validator = Validator::new();
    let id = validator.robot_id(&raw_id);
    let id = validator.finish(id)?;
    record_action("toggle_status", Some(id));

    let result = Robot::update_many()
        .col_expr(robot::Column::Status, Expr::col(robot::Column::Status).eq(false))
        .col_expr(
            robot::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().naive_utc()),
        )
        .filter(robot::Column::Id.eq(id))
        .exec(&db)
        .await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound);
    }

    let robot = find_robot(&db, id).await?;
    info!("Toggled robot {} status to {}", robot.id, robot.status);
    metrics::refresh_robot_gauges(&db).await;
    Ok(response::ok(robot))
}

// PATCH /api/robots/:id/alert
#[utoipa::path(
    patch,
    path = "/api/robots/{id}/alert",
    tag = "Robots",
    params(("id" = i32, Path, description = "The id of the robot")),
    request_body = AlertRequest,
    responses(
        (status = 200, description = "Robot alert updated", body = RobotEnvelope),
        (status = 400, description = "Invalid alert type", body = ErrorEnvelope),
        (status = 404, description = "Robot not found", body = ErrorEnvelope)
    )
)]
pub async fn update_robot_alert(
    Extension(db): Extension<DatabaseConnection>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = alert_body(payload)?;
    let mut validator = Validator::new();
    let id = validator.robot_id(&raw_id);
    let alert = validator.alert_update(&body);
    let (id, alert) = validator.finish(id.zip(alert))?;
    record_action("set_alert", Some(id));

    let mut active = find_robot(&db, id).await?.into_active_model();
    active.alert = Set(alert);
    let robot = active.update(&db).await?;

    info!(
        "Set robot {} alert to {}",
        robot.id,
        robot.alert.map(|a| a.as_str()).unwrap_or("none")
    );
    metrics::refresh_robot_gauges(&db).await;
    Ok(response::ok(robot))
}

// DELETE /api/robots/:id
#[utoipa::path(
    delete,
    path = "/api/robots/{id}",
    tag = "Robots",
    params(("id" = i32, Path, description = "The id of the robot")),
    responses(
        (status = 200, description = "Robot deleted", body = MessageEnvelope),
        (status = 400, description = "Id not valid", body = ErrorEnvelope),
        (status = 404, description = "Robot not found", body = ErrorEnvelope)
    )
)]
pub async fn delete_robot(
    Extension(db): Extension<DatabaseConnection>,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let mut validator = Validator::new();
    let id = validator.robot_id(&raw_id);
    let id = validator.finish(id)?;
    record_action("delete", Some(id));

    let result = Robot::delete_by_id(id).exec(&db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound);
    }

    info!("Deleted robot {}", id);
    metrics::refresh_robot_gauges(&db).await;
    Ok(Json(Envelope::message("Robot deleted")))
}
