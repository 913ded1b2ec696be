use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use thiserror::Error;

use crate::api::response::{Envelope, FieldError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),
    #[error("Robot not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidJson(rejection.body_text())
    }
}

/// Attached to error responses whose detail is withheld from clients.
/// The error responder middleware logs it and, in development, puts it back
/// into the body.
#[derive(Clone, Debug)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: &'static str,
    pub detail: String,
}

impl ErrorReport {
    pub fn into_detailed_response(self) -> Response {
        (
            self.status,
            Json(Envelope::failure(self.message).with_error(self.detail)),
        )
            .into_response()
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(errors) => (
                status,
                Json(Envelope::failure("Validation error").with_errors(errors)),
            )
                .into_response(),
            ApiError::NotFound => {
                (status, Json(Envelope::failure("Robot not found"))).into_response()
            }
            ApiError::InvalidJson(detail) => {
                (status, Json(Envelope::failure("Invalid JSON body").with_error(detail)))
                    .into_response()
            }
            ApiError::Database(err) => {
                let (message, generic) = if status == StatusCode::SERVICE_UNAVAILABLE {
                    ("Database connection error", "Database error")
                } else {
                    ("Internal server error", "Something went wrong")
                };
                let mut response =
                    (status, Json(Envelope::failure(message).with_error(generic))).into_response();
                response.extensions_mut().insert(ErrorReport {
                    status,
                    message,
                    detail: err.to_string(),
                });
                response
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::response::Location;
    use sea_orm::RuntimeErr;

    #[test]
    fn connection_failures_map_to_service_unavailable() {
        let err = ApiError::Database(DbErr::Conn(RuntimeErr::Internal("refused".into())));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn other_database_failures_map_to_internal_error() {
        let err = ApiError::Database(DbErr::Custom("boom".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.into_response();
        let report = response.extensions().get::<ErrorReport>().unwrap();
        assert_eq!(report.message, "Internal server error");
        assert!(report.detail.contains("boom"));
    }

    #[test]
    fn client_errors_carry_no_report() {
        let validation = ApiError::Validation(vec![FieldError::new(
            Location::Body,
            "name",
            serde_json::Value::Null,
            "Name is required",
        )]);
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert!(validation.into_response().extensions().get::<ErrorReport>().is_none());

        let not_found = ApiError::NotFound.into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
    }
}
