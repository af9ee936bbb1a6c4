use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::Member;
use crate::workflows::matchmaking::directory::DirectoryError;
use crate::workflows::matchmaking::domain::{ProjectId, UserId};

/// Project roster as served by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub project_id: ProjectId,
    pub title: String,
    pub leader_id: UserId,
    pub members: Vec<Member>,
}

/// Normalized response for the submission-state call: the reviewee ids the
/// reviewer has already covered. Absence of an id means "not yet submitted".
/// This is the only accepted shape; anything else fails deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionState {
    pub completed: Vec<UserId>,
}

/// One finished review on its way to the authoritative store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub project_id: ProjectId,
    pub reviewer_id: UserId,
    pub reviewee_id: UserId,
    pub score: u8,
    pub comment: String,
}

/// Authoritative store for project rosters and peer reviews.
///
/// The directory, not the tracker, enforces uniqueness of
/// `(project, reviewer, reviewee)` and eligibility rules such as "the
/// project must be completed".
#[async_trait]
pub trait ReviewDirectory: Send + Sync {
    async fn fetch_roster(&self, project: &ProjectId) -> Result<Roster, DirectoryError>;

    async fn fetch_submission_state(
        &self,
        project: &ProjectId,
        reviewer: &UserId,
    ) -> Result<SubmissionState, DirectoryError>;

    async fn submit_review(&self, review: &ReviewSubmission) -> Result<(), DirectoryError>;
}
