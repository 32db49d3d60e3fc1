//! Stateless grade computations over request-supplied data.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::grades::{Course, GradeComponent, GradeError, LegacyBlock};
use crate::server::types::ApiErrorType;
use crate::types::AppState;

#[derive(Debug, Deserialize)]
pub struct CourseGradeRequest {
    pub components: Vec<GradeComponent>,
}

#[derive(Debug, Deserialize)]
pub struct SemesterGpaRequest {
    pub courses: Vec<Course>,
    #[serde(default)]
    pub legacy: LegacyBlock,
}

/// POST /grades/course
///
/// Resolves a course grade under the Magen rule.
pub async fn post_course_grade(
    State(s): State<Arc<AppState>>,
    Json(body): Json<CourseGradeRequest>,
) -> Response {
    info!("POST /grades/course ({} components)", body.components.len());

    if let Err(e) = body.components.iter().try_for_each(GradeComponent::validate) {
        warn!("Rejected course grade request: {}", e);
        return ApiErrorType::from(e).into_response();
    }

    let result = s.planner.calculator().aggregator().compute(&body.components);
    (StatusCode::OK, Json(result)).into_response()
}

/// POST /grades/semester
///
/// Returns the coursework GPA and the GPA with the optional legacy block blended in.
pub async fn post_semester_gpa(
    State(s): State<Arc<AppState>>,
    Json(body): Json<SemesterGpaRequest>,
) -> Response {
    info!("POST /grades/semester ({} courses)", body.courses.len());

    let validated: Result<(), GradeError> = body
        .courses
        .iter()
        .try_for_each(Course::validate)
        .and_then(|_| body.legacy.validate());
    if let Err(e) = validated {
        warn!("Rejected semester GPA request: {}", e);
        return ApiErrorType::from(e).into_response();
    }

    let calculator = s.planner.calculator();
    let response = json!({
        "gpa": calculator.semester_gpa(&body.courses),
        "hybridGpa": calculator.hybrid_semester_gpa(&body.courses, body.legacy),
    });

    (StatusCode::OK, Json(response)).into_response()
}
