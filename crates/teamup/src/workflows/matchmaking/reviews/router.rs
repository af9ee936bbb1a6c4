use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::directory::ReviewDirectory;
use super::tracker::{PeerReviewTracker, ReviewError};
use crate::workflows::matchmaking::directory::{DirectoryError, LoadError};
use crate::workflows::matchmaking::domain::{ProjectId, UserId};

/// Router builder exposing the peer-review tracker over HTTP.
pub fn review_router<D>(directory: Arc<D>) -> Router
where
    D: ReviewDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/projects/:project_id/reviews",
            get(review_state_handler::<D>).post(submit_review_handler::<D>),
        )
        .with_state(directory)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewerQuery {
    pub(crate) reviewer: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitReviewRequest {
    pub(crate) reviewer_id: String,
    pub(crate) reviewee_id: String,
    pub(crate) score: u8,
    pub(crate) comment: String,
}

fn load_error_response(err: LoadError) -> Response {
    let LoadError(inner) = err;
    let (status, message) = match inner {
        DirectoryError::Rejected(reason) => (StatusCode::FORBIDDEN, reason),
        DirectoryError::Unavailable(reason) => (StatusCode::BAD_GATEWAY, reason),
    };
    (status, axum::Json(json!({ "error": message }))).into_response()
}

fn review_error_response(err: ReviewError) -> Response {
    let status = match &err {
        ReviewError::UnknownMember(_) => StatusCode::NOT_FOUND,
        ReviewError::ScoreOutOfRange(_) | ReviewError::MissingScore | ReviewError::EmptyComment => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ReviewError::AlreadySubmitted | ReviewError::SubmissionInFlight => StatusCode::CONFLICT,
        ReviewError::Rejected(_) => StatusCode::BAD_REQUEST,
        ReviewError::Unavailable(_) => StatusCode::BAD_GATEWAY,
    };
    (status, axum::Json(json!({ "error": err.to_string() }))).into_response()
}

pub(crate) async fn review_state_handler<D>(
    State(directory): State<Arc<D>>,
    Path(project_id): Path<u64>,
    Query(query): Query<ReviewerQuery>,
) -> Response
where
    D: ReviewDirectory + 'static,
{
    let tracker = PeerReviewTracker::new(directory, ProjectId(project_id), UserId(query.reviewer));
    let members = match tracker.load().await {
        Ok(members) => members,
        Err(err) => return load_error_response(err),
    };

    let submitted: serde_json::Map<String, serde_json::Value> = tracker
        .submitted_map()
        .into_iter()
        .map(|(id, done)| (id.0, serde_json::Value::Bool(done)))
        .collect();

    let payload = json!({
        "project_id": project_id,
        "title": tracker.project_title(),
        "members": members,
        "submitted": submitted,
        "complete": tracker.is_complete(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_review_handler<D>(
    State(directory): State<Arc<D>>,
    Path(project_id): Path<u64>,
    axum::Json(request): axum::Json<SubmitReviewRequest>,
) -> Response
where
    D: ReviewDirectory + 'static,
{
    let tracker = PeerReviewTracker::new(
        directory,
        ProjectId(project_id),
        UserId(request.reviewer_id),
    );
    if let Err(err) = tracker.load().await {
        return load_error_response(err);
    }

    let reviewee = UserId(request.reviewee_id);
    if let Err(err) = tracker.set_score(&reviewee, request.score) {
        return review_error_response(err);
    }
    if let Err(err) = tracker.set_comment(&reviewee, request.comment) {
        return review_error_response(err);
    }

    match tracker.submit(&reviewee).await {
        Ok(()) => {
            let payload = json!({ "msg": "review submitted" });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(err) => review_error_response(err),
    }
}
