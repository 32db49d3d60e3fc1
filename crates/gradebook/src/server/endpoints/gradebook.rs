//! Endpoints over a user's stored gradebook.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::grades::GradebookSnapshot;
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// PUT /users/:user_id/gradebook
///
/// Replaces the user's snapshot.
pub async fn put_gradebook(
    Path(user_id): Path<String>,
    State(s): State<Arc<AppState>>,
    Json(snapshot): Json<GradebookSnapshot>,
) -> Response {
    info!("PUT /users/{}/gradebook", user_id);

    match s.store.put_snapshot(&user_id, snapshot) {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "Gradebook stored" }))).into_response(),
        Err(e) => {
            warn!("Failed to store gradebook for {}: {}", user_id, e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// DELETE /users/:user_id/gradebook
pub async fn delete_gradebook(
    Path(user_id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("DELETE /users/{}/gradebook", user_id);

    if s.store.remove(&user_id) {
        (StatusCode::OK, Json(json!({ "message": "Gradebook removed" }))).into_response()
    } else {
        ApiErrorType::from((
            StatusCode::NOT_FOUND,
            "Not found",
            Some(format!("No gradebook for user {}", user_id)),
        ))
        .into_response()
    }
}

/// GET /users/:user_id/gradebook/summary
///
/// Returns degree GPA, per-year GPAs and per-semester summaries.
pub async fn get_degree_summary(
    Path(user_id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /users/{}/gradebook/summary", user_id);

    match s.store.snapshot(&user_id) {
        Ok(snapshot) => {
            let summary = s.planner.calculator().degree_summary(&snapshot);
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(e) => {
            warn!("Failed to load gradebook for {}: {}", user_id, e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// GET /users/:user_id/semesters/:semester_id/summary
pub async fn get_semester_summary(
    Path((user_id, semester_id)): Path<(String, String)>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /users/{}/semesters/{}/summary", user_id, semester_id);

    match s.store.semester(&user_id, &semester_id) {
        Ok(semester) => {
            let summary = s.planner.calculator().semester_summary(&semester);
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(e) => {
            warn!("Failed to load semester {}: {}", semester_id, e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// GET /users/:user_id/years/:year/gpa
///
/// Coursework-only GPA for one academic year.
pub async fn get_year_gpa(
    path: Result<Path<(String, u32)>, PathRejection>,
    State(s): State<Arc<AppState>>,
) -> Response {
    let Path((user_id, year)) = match path {
        Ok(path) => path,
        Err(rejection) => {
            warn!("Rejected year GPA request: {}", rejection.body_text());
            return ApiErrorType::from((
                StatusCode::BAD_REQUEST,
                "Invalid path",
                Some(rejection.body_text()),
            ))
            .into_response();
        }
    };

    info!("GET /users/{}/years/{}/gpa", user_id, year);

    match s.store.snapshot(&user_id) {
        Ok(snapshot) => {
            let gpa = s.planner.calculator().year_gpa(&snapshot.semesters, year);
            (
                StatusCode::OK,
                Json(json!({ "academicYear": year, "gpa": gpa })),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Failed to load gradebook for {}: {}", user_id, e);
            ApiErrorType::from(e).into_response()
        }
    }
}
