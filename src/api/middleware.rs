use axum::{extract::Request, middleware::Next, response::Response, Extension};

use crate::config::AppConfig;
use crate::error::ErrorReport;

/// Centralized error responder. Handlers return `ApiError`; server-side
/// failures arrive here with an `ErrorReport` attached, get logged, and in
/// development have their detail written back into the body.
pub async fn error_responder(
    Extension(config): Extension<AppConfig>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };

    tracing::Span::current().record("error", report.detail.as_str());
    tracing::error!(status = %report.status, "{}: {}", report.message, report.detail);

    if config.expose_error_detail {
        report.into_detailed_response()
    } else {
        response
    }
}
