use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::grades::GradeError;
use crate::store::StoreError;

/// JSON error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiErrorType {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl<S: Into<String>> From<(StatusCode, S, Option<String>)> for ApiErrorType {
    fn from((status, error, context): (StatusCode, S, Option<String>)) -> Self {
        Self {
            status,
            error: error.into(),
            context,
        }
    }
}

impl From<StoreError> for ApiErrorType {
    fn from(err: StoreError) -> Self {
        let (status, message) = match &err {
            StoreError::UserNotFound { .. } | StoreError::SemesterNotFound { .. } => {
                (StatusCode::NOT_FOUND, "Not found")
            }
            StoreError::Forbidden { .. } => (StatusCode::FORBIDDEN, "Access denied"),
            StoreError::Invalid(_) => (StatusCode::BAD_REQUEST, "Invalid gradebook"),
        };

        Self::from((status, message, Some(err.to_string())))
    }
}

impl From<GradeError> for ApiErrorType {
    fn from(err: GradeError) -> Self {
        let status = if err.is_input_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        Self::from((status, "Invalid input", Some(err.to_string())))
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
