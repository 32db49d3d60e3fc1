//! Strategy planning endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::grades::{Course, StrategyInput};
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// Body for planning against a stored gradebook.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(rename = "targetGPA")]
    pub target_gpa: f64,
    pub max_realistic_grade: f64,
}

/// POST /strategy
///
/// Plans from a fully supplied request. An unreachable target is still a 200
/// with `success: false`.
pub async fn post_strategy(
    State(s): State<Arc<AppState>>,
    Json(input): Json<StrategyInput>,
) -> Response {
    info!(
        "POST /strategy (target={}, {} future courses)",
        input.target_gpa,
        input.future_courses.len()
    );

    if let Err(e) = input.completed_courses.iter().try_for_each(Course::validate) {
        warn!("Rejected strategy request: {}", e);
        return ApiErrorType::from(e).into_response();
    }

    let result = s.planner.plan_strategy(&input);
    (StatusCode::OK, Json(result)).into_response()
}

/// POST /users/:user_id/strategy
///
/// Plans the user's ungraded courses from their stored gradebook.
pub async fn post_user_strategy(
    Path(user_id): Path<String>,
    State(s): State<Arc<AppState>>,
    Json(body): Json<PlanRequest>,
) -> Response {
    info!(
        "POST /users/{}/strategy (target={}, ceiling={})",
        user_id, body.target_gpa, body.max_realistic_grade
    );

    match s.store.snapshot(&user_id) {
        Ok(snapshot) => {
            let result = s.planner.plan_for_snapshot(
                &snapshot,
                body.target_gpa,
                body.max_realistic_grade,
            );
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(e) => {
            warn!("Failed to load gradebook for {}: {}", user_id, e);
            ApiErrorType::from(e).into_response()
        }
    }
}
