use utoipa::{OpenApi, ToSchema};

use crate::api::{self, response::FieldError};
use crate::dashboard::{AlertStats, DashboardStats};
use crate::entities::{prelude::*, robot};

/// Body accepted by `POST /api/robots` and `PUT /api/robots/{id}`.
#[derive(ToSchema)]
pub struct RobotRequest {
    #[schema(example = "R2D2")]
    pub name: String,
    #[schema(example = true)]
    pub status: bool,
    pub alert: Option<AlertKind>,
    pub priority: Option<Priority>,
}

#[derive(ToSchema)]
pub struct AlertRequest {
    /// `null` clears the alert.
    pub alert: Option<AlertKind>,
}

#[derive(ToSchema)]
pub struct RobotEnvelope {
    pub success: bool,
    #[schema(value_type = Robot)]
    pub data: robot::Model,
}

#[derive(ToSchema)]
pub struct RobotListEnvelope {
    pub success: bool,
    #[schema(value_type = Vec<Robot>)]
    pub data: Vec<robot::Model>,
}

#[derive(ToSchema)]
pub struct DashboardEnvelope {
    pub success: bool,
    pub data: api::dashboard::DashboardView,
}

#[derive(ToSchema)]
pub struct MessageEnvelope {
    pub success: bool,
    #[schema(example = "Robot deleted")]
    pub message: String,
}

#[derive(ToSchema)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
    pub errors: Option<Vec<FieldError>>,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "REST API Robots",
        version = "1.0.0",
        description = "API for managing robots"
    ),
    paths(
        api::robots::list_robots,
        api::robots::get_robot,
        api::robots::create_robot,
        api::robots::update_robot,
        api::robots::toggle_robot_status,
        api::robots::update_robot_alert,
        api::robots::delete_robot,
        api::dashboard::get_dashboard,
    ),
    components(schemas(
        robot::Model,
        AlertKind,
        Priority,
        RobotRequest,
        AlertRequest,
        RobotEnvelope,
        RobotListEnvelope,
        DashboardEnvelope,
        MessageEnvelope,
        ErrorEnvelope,
        FieldError,
        api::response::Location,
        api::dashboard::DashboardView,
        DashboardStats,
        AlertStats,
    )),
    tags((name = "Robots", description = "API operations related to Robots"))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_robot_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for path in [
            "/api/robots",
            "/api/robots/{id}",
            "/api/robots/{id}/alert",
            "/api/dashboard",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        let robots_id = &doc["paths"]["/api/robots/{id}"];
        for method in ["get", "put", "patch", "delete"] {
            assert!(robots_id.get(method).is_some(), "missing {method}");
        }
    }

    #[test]
    fn robot_schema_uses_public_name() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = &doc["components"]["schemas"];
        assert!(schemas.get("Robot").is_some());
        assert!(schemas["Robot"]["properties"].get("createdAt").is_some());
    }
}
