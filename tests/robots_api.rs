use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, StatusCode},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use rpa_monitor::{config::AppConfig, dashboard::DashboardStats, migrator::Migrator, router, seed};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_config(expose_error_detail: bool) -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        expose_error_detail,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
    }
}

async fn test_db() -> DatabaseConnection {
    // One pooled connection, otherwise each connection sees its own empty memory db.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

async fn test_app() -> Router {
    router::app(test_db().await, test_config(false))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create(app: &Router, name: &str, status: bool) -> Value {
    let (code, body) = send(
        app,
        Method::POST,
        "/api/robots",
        Some(json!({"name": name, "status": status})),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn create_robot_returns_generated_record() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/robots",
        Some(json!({"name": "R2D2", "status": true})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let robot = &body["data"];
    assert!(robot["id"].as_i64().is_some());
    assert_eq!(robot["name"], "R2D2");
    assert_eq!(robot["status"], true);
    assert_eq!(robot["alert"], Value::Null);
    assert_eq!(robot["priority"], "4 - Low");
    assert!(robot["createdAt"].is_string());
    assert!(robot["updatedAt"].is_string());
}

#[tokio::test]
async fn create_robot_with_empty_body_reports_two_errors() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::POST, "/api/robots", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation error");
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_robot_accepts_alert_and_priority() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/robots",
        Some(json!({
            "name": "Invoice Processor",
            "status": true,
            "alert": "System exception",
            "priority": "1 - Critical"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["alert"], "System exception");
    assert_eq!(body["data"]["priority"], "1 - Critical");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/robots")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_robots_is_ordered_by_id() {
    let app = test_app().await;
    let (_, empty) = send(&app, Method::GET, "/api/robots", None).await;
    assert_eq!(empty["data"], json!([]));

    create(&app, "First", true).await;
    create(&app, "Second", false).await;

    let (status, body) = send(&app, Method::GET, "/api/robots", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["First", "Second"]);
}

#[tokio::test]
async fn get_robot_by_id() {
    let app = test_app().await;
    let robot = create(&app, "R2D2", true).await;

    let uri = format!("/api/robots/{}", robot["id"]);
    let (status, body) = send(&app, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "R2D2");
    assert_eq!(body["data"]["status"], true);
}

#[tokio::test]
async fn missing_robot_is_not_found() {
    let app = test_app().await;

    for method in [Method::GET, Method::PATCH, Method::DELETE] {
        let (status, body) = send(&app, method.clone(), "/api/robots/2000", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Robot not found");
    }

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/robots/2000",
        Some(json!({"name": "C3PO", "status": false})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Robot not found");

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/robots/2000/alert",
        Some(json!({"alert": "Terminated"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_id_yields_exactly_one_validation_error() {
    let app = test_app().await;

    let cases = [
        (Method::GET, None),
        (Method::PATCH, None),
        (Method::DELETE, None),
        (Method::PUT, Some(json!({"name": "C3PO", "status": false}))),
    ];
    for (method, body) in cases {
        let (status, response) = send(&app, method.clone(), "/api/robots/not-valid-id", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        let errors = response["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 1, "{method}");
        assert_eq!(errors[0]["msg"], "Id not valid");
        assert_eq!(errors[0]["location"], "params");
    }
}

#[tokio::test]
async fn update_robot_replaces_name_and_status() {
    let app = test_app().await;
    let robot = create(&app, "R2D2", true).await;
    let uri = format!("/api/robots/{}", robot["id"]);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"name": "C3PO", "status": false})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "C3PO");
    assert_eq!(body["data"]["status"], false);
    assert_eq!(body["data"]["id"], robot["id"]);

    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched["data"]["name"], "C3PO");
}

#[tokio::test]
async fn update_robot_validates_body() {
    let app = test_app().await;
    let robot = create(&app, "R2D2", true).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/robots/{}", robot["id"]),
        Some(json!({"name": "", "status": "nope"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn update_robot_keeps_alert_and_priority_when_omitted() {
    let app = test_app().await;
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/robots",
        Some(json!({
            "name": "R2D2",
            "status": true,
            "alert": "Terminated",
            "priority": "2 - High"
        })),
    )
    .await;
    let uri = format!("/api/robots/{}", created["data"]["id"]);

    let body = json!({"name": "C3PO", "status": false});
    let (status, body) = send(&app, Method::PUT, &uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "C3PO");
    assert_eq!(body["data"]["alert"], "Terminated");
    assert_eq!(body["data"]["priority"], "2 - High");

    let body = json!({"name": "C3PO", "status": false, "alert": null});
    let (_, body) = send(&app, Method::PUT, &uri, Some(body)).await;
    assert_eq!(body["data"]["alert"], Value::Null);
    assert_eq!(body["data"]["priority"], "2 - High");
}

#[tokio::test]
async fn toggle_status_flips_and_persists() {
    let app = test_app().await;
    let robot = create(&app, "R2D2", true).await;
    let uri = format!("/api/robots/{}", robot["id"]);

    let (status, body) = send(&app, Method::PATCH, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], false);

    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched["data"]["status"], false);

    let (_, body) = send(&app, Method::PATCH, &uri, None).await;
    assert_eq!(body["data"]["status"], true);
}

#[tokio::test]
async fn set_and_clear_alert() {
    let app = test_app().await;
    let robot = create(&app, "R2D2", true).await;
    let uri = format!("/api/robots/{}/alert", robot["id"]);

    let body = json!({"alert": "Runtime Exceeded"});
    let (status, body) = send(&app, Method::PATCH, &uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["alert"], "Runtime Exceeded");
    // Alert is independent of status
    assert_eq!(body["data"]["status"], true);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"alert": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["alert"], Value::Null);
}

#[tokio::test]
async fn unknown_alert_is_rejected() {
    let app = test_app().await;
    let robot = create(&app, "R2D2", true).await;
    let uri = format!("/api/robots/{}/alert", robot["id"]);

    let body = json!({"alert": "Overheated"});
    let (status, body) = send(&app, Method::PATCH, &uri, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["msg"], "Invalid alert type");

    let robot_uri = format!("/api/robots/{}", robot["id"]);
    let (_, fetched) = send(&app, Method::GET, &robot_uri, None).await;
    assert_eq!(fetched["data"]["alert"], Value::Null);
}

#[tokio::test]
async fn alert_update_without_json_body_is_a_validation_error() {
    let app = test_app().await;
    let robot = create(&app, "R2D2", true).await;
    let uri = format!("/api/robots/{}/alert", robot["id"]);

    let (status, body) = send(&app, Method::PATCH, &uri, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation error");
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["msg"], "Invalid alert type");
    assert_eq!(errors[0]["path"], "alert");
}

#[tokio::test]
async fn delete_robot_then_get_is_not_found() {
    let app = test_app().await;
    let robot = create(&app, "R2D2", true).await;
    let uri = format!("/api/robots/{}", robot["id"]);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Robot deleted");

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_filters_and_counts() {
    let db = test_db().await;
    seed::seed_robots(&db).await.unwrap();
    let app = router::app(db, test_config(false));

    let (_, list) = send(&app, Method::GET, "/api/robots", None).await;
    let first_id = list["data"][0]["id"].clone();
    send(
        &app,
        Method::PATCH,
        &format!("/api/robots/{first_id}/alert"),
        Some(json!({"alert": "System exception"})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/dashboard?status=true", None).await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"]["stats"];
    assert_eq!(stats["total"], 5);
    assert_eq!(stats["active"], 3);
    assert_eq!(stats["resolved"], 2);
    assert_eq!(stats["alerts"]["total"], 1);
    assert_eq!(stats["alerts"]["systemException"], 1);
    assert_eq!(body["data"]["robots"].as_array().unwrap().len(), 3);

    let (_, body) = send(&app, Method::GET, "/api/dashboard?search=EXTRACT", None).await;
    let robots = body["data"]["robots"].as_array().unwrap();
    assert_eq!(robots.len(), 1);
    assert_eq!(robots[0]["name"], "Data Extractor");

    let (status, body) = send(&app, Method::GET, "/api/dashboard?alert=Meltdown", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["location"], "query");
}

fn names(robots: &Value) -> Vec<&str> {
    robots
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn dashboard_filters_combine_in_one_query() {
    let db = test_db().await;
    seed::seed_robots(&db).await.unwrap();
    let app = router::app(db, test_config(false));

    let (_, list) = send(&app, Method::GET, "/api/robots", None).await;
    let alerts = [(0, "System exception"), (3, "Terminated")];
    for (index, alert) in alerts {
        let uri = format!("/api/robots/{}/alert", list["data"][index]["id"]);
        let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({"alert": alert}))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let uri = "/api/dashboard?search=o&status=true&alert=System%20exception";
    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body["data"]["robots"]), vec!["Invoice Processor"]);
    assert_eq!(body["data"]["stats"]["total"], 5);
    assert_eq!(body["data"]["stats"]["alerts"]["total"], 2);

    let uri = "/api/dashboard?search=o&status=true&alert=none";
    let (_, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(names(&body["data"]["robots"]), vec!["Customer Onboarding Bot"]);

    let uri = "/api/dashboard?search=o&status=false&alert=none";
    let (_, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(names(&body["data"]["robots"]), vec!["Data Extractor", "Report Generator"]);
}

#[tokio::test]
async fn dashboard_recent_order_lists_last_updated_first() {
    let app = test_app().await;
    let first = create(&app, "First", true).await;
    let second = create(&app, "Second", true).await;
    let third = create(&app, "Third", true).await;

    let uri = format!("/api/robots/{}", first["id"]);
    let (status, _) = send(&app, Method::PATCH, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/dashboard?order=recent", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<Value> = body["data"]["robots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(ids, vec![first["id"].clone(), third["id"].clone(), second["id"].clone()]);

    let (_, body) = send(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(names(&body["data"]["robots"]), vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn robot_stats_are_counted_in_the_database() {
    let db = test_db().await;
    seed::seed_robots(&db).await.unwrap();
    let app = router::app(db.clone(), test_config(false));

    let (_, list) = send(&app, Method::GET, "/api/robots", None).await;
    let uri = format!("/api/robots/{}/alert", list["data"][2]["id"]);
    send(&app, Method::PATCH, &uri, Some(json!({"alert": "Runtime Exceeded"}))).await;

    let stats = rpa_monitor::metrics::robot_stats(&db).await.unwrap();
    let robots = rpa_monitor::entities::Robot::find().all(&db).await.unwrap();
    assert_eq!(stats, DashboardStats::from_robots(&robots));
    assert_eq!(stats.total, 5);
    assert_eq!(stats.resolved, 2);
    assert_eq!(stats.alerts.runtime_exceeded, 1);
}

#[tokio::test]
async fn metrics_route_renders_robot_gauges() {
    let db = test_db().await;
    seed::seed_robots(&db).await.unwrap();
    let stats = rpa_monitor::metrics::robot_stats(&db).await.unwrap();

    let recorder = PrometheusBuilder::new().build_recorder();
    metrics::with_local_recorder(&recorder, || rpa_monitor::metrics::record_stats(&stats));
    let app = router::metrics_routes(recorder.handle());

    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("rpa_robots_total 5"), "{text}");
    assert!(text.contains("rpa_robots_active_total 3"), "{text}");
    assert!(text.contains("rpa_robots_alerts_total{alert=\"Terminated\"} 0"), "{text}");
}

#[tokio::test]
async fn seeding_is_skipped_when_robots_exist_and_clear_empties_table() {
    let db = test_db().await;

    assert_eq!(seed::seed_robots(&db).await.unwrap(), 5);
    assert_eq!(seed::seed_robots(&db).await.unwrap(), 0);
    assert_eq!(seed::clear_robots(&db).await.unwrap(), 5);

    let app = router::app(db, test_config(false));
    let (_, body) = send(&app, Method::GET, "/api/robots", None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn database_errors_hide_detail_outside_development() {
    let db = test_db().await;
    db.execute_unprepared("DROP TABLE robots").await.unwrap();
    let app = router::app(db, test_config(false));

    let (status, body) = send(&app, Method::GET, "/api/robots", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(body["error"], "Something went wrong");
}

#[tokio::test]
async fn database_errors_expose_detail_in_development() {
    let db = test_db().await;
    db.execute_unprepared("DROP TABLE robots").await.unwrap();
    let app = router::app(db, test_config(true));

    let (status, body) = send(&app, Method::GET, "/api/robots", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["error"].as_str().unwrap();
    assert!(detail.contains("robots"), "{detail}");
}

#[tokio::test]
async fn auxiliary_routes() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "API is working!");

    let (status, body) = send(&app, Method::GET, "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/robots").is_some());

    let (status, body) = send(&app, Method::GET, "/api/Robotes", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
