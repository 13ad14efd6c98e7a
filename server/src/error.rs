use std::process::{ExitCode, Termination};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error_stack::{AttachmentKind, FrameKind, Report};
use kernel::KernelError;
use serde::Serialize;

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
pub struct ErrorBody {
    error: String,
    detail: Vec<String>,
}

impl ErrorStatus {
    pub fn status(&self) -> StatusCode {
        match self.0.current_context() {
            KernelError::Concurrency => StatusCode::CONFLICT,
            KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
            KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            KernelError::NotFound => StatusCode::NOT_FOUND,
            KernelError::InvalidTransition => StatusCode::UNPROCESSABLE_ENTITY,
            KernelError::Validation => StatusCode::BAD_REQUEST,
            KernelError::Forbidden => StatusCode::FORBIDDEN,
            KernelError::Conflict => StatusCode::CONFLICT,
        }
    }

    /// Message for the client dialog. Internal failures keep their details
    /// in the log only.
    pub fn body(&self) -> ErrorBody {
        let detail = match self.0.current_context() {
            KernelError::Internal | KernelError::Timeout => Vec::new(),
            _ => self
                .0
                .frames()
                .filter_map(|frame| match frame.kind() {
                    FrameKind::Attachment(AttachmentKind::Printable(printable)) => {
                        Some(printable.to_string())
                    }
                    _ => None,
                })
                .collect(),
        };
        ErrorBody {
            error: self.0.current_context().to_string(),
            detail,
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("{:?}", self.0);
        }
        (status, Json(self.body())).into_response()
    }
}
