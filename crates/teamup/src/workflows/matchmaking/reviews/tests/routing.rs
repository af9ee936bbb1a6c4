use super::common::*;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::workflows::matchmaking::directory::DirectoryError;
use crate::workflows::matchmaking::reviews::review_router;

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn submit_request(payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/v1/projects/{}/reviews", PROJECT.0))
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

#[tokio::test]
async fn review_state_endpoint_reports_members_and_completion() {
    let directory = ScriptedReviews::with_roster(roster());
    directory.mark_completed("s-3002");
    let router = review_router(directory);

    let request = Request::builder()
        .method("GET")
        .uri(format!(
            "/api/v1/projects/{}/reviews?reviewer={}",
            PROJECT.0,
            reviewer()
        ))
        .body(Body::empty())
        .expect("request");

    let response = router.oneshot(request).await.expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = json_body(response).await;
    assert_eq!(payload["title"], "Campus meal-plan optimizer");
    assert_eq!(payload["members"].as_array().map(Vec::len), Some(2));
    assert_eq!(payload["submitted"]["s-3002"], true);
    assert_eq!(payload["submitted"]["s-3003"], false);
    assert_eq!(payload["complete"], false);
}

#[tokio::test]
async fn submit_endpoint_stores_review() {
    let directory = ScriptedReviews::with_roster(roster());
    let router = review_router(directory.clone());

    let response = router
        .oneshot(submit_request(json!({
            "reviewer_id": reviewer().0,
            "reviewee_id": "s-3003",
            "score": 4,
            "comment": "Great teammate",
        })))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(directory.submission_count(), 1);
}

#[tokio::test]
async fn submit_endpoint_rejects_out_of_range_score() {
    let directory = ScriptedReviews::with_roster(roster());
    let router = review_router(directory.clone());

    let response = router
        .oneshot(submit_request(json!({
            "reviewer_id": reviewer().0,
            "reviewee_id": "s-3003",
            "score": 0,
            "comment": "",
        })))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(directory.submission_count(), 0, "no remote call was made");
}

#[tokio::test]
async fn submit_endpoint_maps_duplicate_to_conflict() {
    let directory = ScriptedReviews::with_roster(roster());
    directory.mark_completed("s-3003");
    let router = review_router(directory.clone());

    let response = router
        .oneshot(submit_request(json!({
            "reviewer_id": reviewer().0,
            "reviewee_id": "s-3003",
            "score": 5,
            "comment": "second attempt",
        })))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(directory.submission_count(), 0);
}

#[tokio::test]
async fn submit_endpoint_passes_remote_rejection_through() {
    let directory = ScriptedReviews::with_roster(roster());
    directory.fail_submissions_with(DirectoryError::Rejected(
        "reviews open after the project is completed".to_string(),
    ));
    let router = review_router(directory);

    let response = router
        .oneshot(submit_request(json!({
            "reviewer_id": reviewer().0,
            "reviewee_id": "s-3002",
            "score": 3,
            "comment": "fine",
        })))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("project is completed"));
}

#[tokio::test]
async fn submit_endpoint_rejects_self_review() {
    let directory = ScriptedReviews::with_roster(roster());
    let router = review_router(directory.clone());

    // The acting user is filtered out of the reviewable set, so a self
    // review targets an unknown member.
    let response = router
        .oneshot(submit_request(json!({
            "reviewer_id": reviewer().0,
            "reviewee_id": reviewer().0,
            "score": 5,
            "comment": "I did great",
        })))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(directory.submission_count(), 0);
}
