use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::board::{ApplicantBoard, TransitionError};
use super::directory::ApplicationDirectory;
use super::domain::{ApplicationId, Decision};
use crate::workflows::matchmaking::directory::{DirectoryError, LoadError};
use crate::workflows::matchmaking::domain::{ProjectId, UserId};

/// Router builder exposing the applicant board over HTTP.
///
/// The surface is stateless: each request builds a board scoped to the
/// `(project, actor)` pair it names.
pub fn application_router<D>(directory: Arc<D>) -> Router
where
    D: ApplicationDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/projects/:project_id/applications",
            get(board_handler::<D>),
        )
        .route(
            "/api/v1/projects/:project_id/applications/:application_id/status",
            put(status_handler::<D>),
        )
        .with_state(directory)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActorQuery {
    pub(crate) actor: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    pub(crate) new_status: Decision,
    pub(crate) leader_id: String,
}

fn load_error_response(err: LoadError) -> Response {
    let LoadError(inner) = err;
    let (status, message) = match inner {
        DirectoryError::Rejected(reason) => (StatusCode::FORBIDDEN, reason),
        DirectoryError::Unavailable(reason) => (StatusCode::BAD_GATEWAY, reason),
    };
    (status, axum::Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn board_handler<D>(
    State(directory): State<Arc<D>>,
    Path(project_id): Path<u64>,
    Query(query): Query<ActorQuery>,
) -> Response
where
    D: ApplicationDirectory + 'static,
{
    let board = ApplicantBoard::new(directory, ProjectId(project_id), UserId(query.actor));
    if let Err(err) = board.load().await {
        return load_error_response(err);
    }

    let view = board.partitions();
    let counts = view.counts();
    let payload = json!({
        "project_id": project_id,
        "pending": view.pending,
        "accepted": view.accepted,
        "rejected": view.rejected,
        "counts": {
            "pending": counts.pending,
            "accepted": counts.accepted,
            "rejected": counts.rejected,
            "total": counts.total(),
        },
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn status_handler<D>(
    State(directory): State<Arc<D>>,
    Path((project_id, application_id)): Path<(u64, u64)>,
    axum::Json(request): axum::Json<StatusUpdateRequest>,
) -> Response
where
    D: ApplicationDirectory + 'static,
{
    let board = ApplicantBoard::new(
        directory,
        ProjectId(project_id),
        UserId(request.leader_id),
    );
    if let Err(err) = board.load().await {
        return load_error_response(err);
    }

    match board
        .transition(&ApplicationId(application_id), request.new_status)
        .await
    {
        Ok(()) => {
            let payload = json!({
                "msg": "application status updated",
                "status": request.new_status.target_status().label(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => {
            let status = match &err {
                TransitionError::UnknownApplication(_) => StatusCode::NOT_FOUND,
                TransitionError::AlreadyDecided { .. } | TransitionError::UpdateInFlight => {
                    StatusCode::CONFLICT
                }
                TransitionError::Rejected(_) => StatusCode::FORBIDDEN,
                TransitionError::Unavailable(_) => StatusCode::BAD_GATEWAY,
            };
            let payload = json!({ "error": err.to_string() });
            (status, axum::Json(payload)).into_response()
        }
    }
}
