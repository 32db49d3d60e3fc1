use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use crate::server::endpoints::{gradebook, grades, status, strategy};
use crate::types::AppState;

mod endpoints;
mod types;

pub use types::ApiErrorType;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Computations over request-supplied data
    let compute_router = Router::new()
        .route("/grades/course", post(grades::post_course_grade))
        .route("/grades/semester", post(grades::post_semester_gpa))
        .route("/strategy", post(strategy::post_strategy));

    // Endpoints backed by the user's stored gradebook
    let user_router = Router::new()
        .route(
            "/gradebook",
            put(gradebook::put_gradebook).delete(gradebook::delete_gradebook),
        )
        .route("/gradebook/summary", get(gradebook::get_degree_summary))
        .route(
            "/semesters/:semester_id/summary",
            get(gradebook::get_semester_summary),
        )
        .route("/years/:year/gpa", get(gradebook::get_year_gpa))
        .route("/strategy", post(strategy::post_user_strategy));

    Router::new()
        .route("/health", get(status::get_health))
        .merge(compute_router)
        .nest("/users/:user_id", user_router)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn gradebook() -> Value {
        json!({
            "legacy": { "credits": 4, "gpa": 90 },
            "semesters": [{
                "id": "s1",
                "userId": "alice",
                "academicYear": 1,
                "term": "A",
                "courses": [
                    {
                        "id": "calc",
                        "name": "Calculus",
                        "credits": 4,
                        "components": [
                            { "id": "c1", "name": "מבחן סופי", "weight": 70, "score": 80 },
                            { "id": "c2", "name": "מגן", "weight": 30, "score": 40, "isMagen": true }
                        ]
                    },
                    {
                        "id": "algo",
                        "name": "Algorithms",
                        "credits": 4,
                        "difficulty": "hard",
                        "components": [
                            { "id": "a1", "name": "Final", "weight": 100, "score": null }
                        ]
                    }
                ]
            }]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let router = create_router(Arc::new(AppState::default()));
        let (status, body) = send(router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_course_grade_endpoint() {
        let router = create_router(Arc::new(AppState::default()));
        let body = json!({
            "components": [
                { "id": "c1", "name": "Final exam", "weight": 70, "score": 80 },
                { "id": "c2", "name": "Magen", "weight": 30, "score": 40, "isMagen": true }
            ]
        });

        let (status, body) = send(router, "POST", "/grades/course", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["grade"], 80.0);
        assert_eq!(body["waiverDropped"], true);
    }

    #[tokio::test]
    async fn test_course_grade_rejects_bad_score() {
        let router = create_router(Arc::new(AppState::default()));
        let body = json!({
            "components": [{ "id": "c1", "name": "Final", "weight": 100, "score": 140 }]
        });

        let (status, body) = send(router, "POST", "/grades/course", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["context"].as_str().unwrap().contains("outside 0-100"));
    }

    #[tokio::test]
    async fn test_stored_gradebook_flow() {
        let state = Arc::new(AppState::default());

        let (status, _) = send(
            create_router(state.clone()),
            "PUT",
            "/users/alice/gradebook",
            Some(gradebook()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, summary) = send(
            create_router(state.clone()),
            "GET",
            "/users/alice/gradebook/summary",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        // (90*4 + 80*4) / 8
        assert_eq!(summary["degreeGpa"], 85.0);
        assert_eq!(summary["semesters"][0]["courses"][0]["waiverDropped"], true);

        let (status, year) = send(
            create_router(state.clone()),
            "GET",
            "/users/alice/years/1/gpa",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(year["gpa"], 80.0);

        let (status, plan) = send(
            create_router(state.clone()),
            "POST",
            "/users/alice/strategy",
            Some(json!({ "targetGPA": 85, "maxRealisticGrade": 100 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(plan["success"], true);
        assert_eq!(plan["recommendations"][0]["courseId"], "algo");
        assert_eq!(plan["recommendations"][0]["suggestedGrade"], 85.0);
    }

    #[tokio::test]
    async fn test_year_gpa_rejects_non_numeric_year() {
        let router = create_router(Arc::new(AppState::default()));
        let (status, body) = send(router, "GET", "/users/alice/years/abc/gpa", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid path");
        assert!(body["context"].is_string());
    }

    #[tokio::test]
    async fn test_ownership_and_missing_user() {
        let state = Arc::new(AppState::default());

        let (status, _) = send(
            create_router(state.clone()),
            "PUT",
            "/users/bob/gradebook",
            Some(gradebook()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            create_router(state.clone()),
            "GET",
            "/users/bob/gradebook/summary",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_raw_strategy_rejects_negative_future_credits() {
        let router = create_router(Arc::new(AppState::default()));
        let body = json!({
            "targetGPA": 80,
            "futureCourses": [
                { "id": "a", "name": "Physics", "credits": 5 },
                { "id": "neg", "name": "Broken", "credits": -2 }
            ],
            "maxRealisticGrade": 95
        });

        let (status, plan) = send(router, "POST", "/strategy", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(plan["success"], false);
        assert_eq!(plan["outcome"], "invalid_input");
        assert_eq!(plan["recommendations"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_raw_strategy_out_of_reach() {
        let router = create_router(Arc::new(AppState::default()));
        let body = json!({
            "currentGPA": 85,
            "totalCreditsSoFar": 60,
            "targetGPA": 90,
            "futureCourses": [{ "id": "f1", "name": "Physics", "credits": 3, "difficulty": "medium" }],
            "maxRealisticGrade": 97
        });

        let (status, plan) = send(router, "POST", "/strategy", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(plan["success"], false);
        assert_eq!(plan["outcome"], "target_out_of_reach");
        assert_eq!(plan["recommendations"][0]["suggestedGrade"], 97.0);
    }
}
