use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, patch},
    Extension, Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;

use crate::api::{self, response::Envelope};
use crate::config::AppConfig;
use crate::openapi::ApiDoc;

async fn health_check() -> &'static str {
    "OK"
}

async fn api_test() -> impl IntoResponse {
    Json(json!({"message": "API is working!"}))
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn route_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(Envelope::failure("Route not found")))
}

fn robot_routes() -> Router {
    Router::new()
        .route(
            "/",
            get(api::robots::list_robots).post(api::robots::create_robot),
        )
        .route(
            "/:id",
            get(api::robots::get_robot)
                .put(api::robots::update_robot)
                .patch(api::robots::toggle_robot_status)
                .delete(api::robots::delete_robot),
        )
        .route("/:id/alert", patch(api::robots::update_robot_alert))
}

fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.iter().cloned()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// `GET /metrics` rendering whatever the given recorder has collected.
pub fn metrics_routes(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(|| async move { handle.render() }))
}

/// The full HTTP surface minus `/metrics`, which the server binary adds
/// together with the Prometheus layer.
pub fn app(db: DatabaseConnection, config: AppConfig) -> Router {
    let cors = cors_layer(&config.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/test", get(api_test))
        .route("/api/dashboard", get(api::dashboard::get_dashboard))
        .route("/docs/openapi.json", get(openapi_json))
        .nest("/api/robots", robot_routes())
        .fallback(route_not_found)
        .layer(axum::middleware::from_fn(api::middleware::error_responder))
        .layer(Extension(db))
        .layer(Extension(config))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched| matched.as_str());

                    // "METHOD /path", e.g. "PATCH /api/robots/:id"
                    let span_name = match matched_path {
                        Some(path) => format!("{} {}", request.method(), path),
                        None => format!("{} {}", request.method(), request.uri().path()),
                    };

                    tracing::info_span!(
                        "request",
                        "otel.name" = span_name,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        // Filled in by handlers
                        table = "robots",
                        action = tracing::field::Empty,
                        robot_id = tracing::field::Empty,
                        error = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_request(
                    |_request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {},
                )
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", tracing::field::display(response.status()));
                        span.record("latency", tracing::field::debug(latency));
                        tracing::info!("request completed");
                    },
                ),
        )
        .layer(cors)
}
