use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use log::error;
use serde::Serialize;

use crate::domain::errors::{DomainError, FieldViolation};

use super::trace;

/// RFC 7807-style error body returned by every service
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetail {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

impl ProblemDetail {
    pub fn new(status: StatusCode, title: &str, detail: impl Into<String>) -> Self {
        let context = trace::current_context();
        Self {
            problem_type: "about:blank".to_string(),
            title: title.to_string(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: context.as_ref().map(|ctx| ctx.path.clone()),
            timestamp: Utc::now(),
            trace_id: context.map(|ctx| ctx.trace_id.to_string()),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldViolation>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Error wrapper that maps domain failures onto HTTP responses
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let problem = match self.0 {
            DomainError::Validation(errors) => {
                ProblemDetail::new(StatusCode::BAD_REQUEST, "Validation Error", "Validation failed")
                    .with_errors(errors)
            }
            err @ (DomainError::DepartmentNotFound(_)
            | DomainError::DepartmentCodeNotFound(_)
            | DomainError::EmployeeNotFound(_)
            | DomainError::ProductNotFound(_)) => {
                ProblemDetail::new(StatusCode::NOT_FOUND, "Resource Not Found", err.to_string())
            }
            err @ DomainError::DuplicateCode(_) => {
                ProblemDetail::new(StatusCode::CONFLICT, "Duplicate Code", err.to_string())
            }
            err @ DomainError::DuplicateEmail(_) => {
                ProblemDetail::new(StatusCode::CONFLICT, "Duplicate Email", err.to_string())
            }
            err @ DomainError::DepartmentInUse { .. } => ProblemDetail::new(
                StatusCode::CONFLICT,
                "Business Rule Violation",
                err.to_string(),
            ),
            err @ (DomainError::Repository(_) | DomainError::Upstream(_)) => {
                error!("Internal error: {}", err);
                ProblemDetail::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An unexpected error occurred",
                )
            }
        };

        let status = StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(problem)).into_response()
    }
}
