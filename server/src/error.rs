use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::Report;
use kernel::KernelError;
use serde::Serialize;
use std::process::{ExitCode, Termination};

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let context = self.0.current_context();
        let (status, error) = match context {
            KernelError::NotFound { .. } => (StatusCode::NOT_FOUND, context.to_string()),
            KernelError::ConditionsNotMet { .. } => (StatusCode::BAD_REQUEST, context.to_string()),
            KernelError::Timeout => (StatusCode::REQUEST_TIMEOUT, context.to_string()),
            // Internal reasons never leak to the caller.
            KernelError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "an unexpected error occurred".to_string(),
            ),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
