use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::workflows::matchmaking::directory::DirectoryError;
use crate::workflows::matchmaking::domain::{ProjectId, UserId};
use crate::workflows::matchmaking::reviews::directory::{
    ReviewDirectory, ReviewSubmission, Roster, SubmissionState,
};
use crate::workflows::matchmaking::reviews::domain::Member;
use crate::workflows::matchmaking::reviews::PeerReviewTracker;

pub(super) const PROJECT: ProjectId = ProjectId(17);

pub(super) fn reviewer() -> UserId {
    UserId::new("s-3001")
}

pub(super) fn member(uid: &str, name: &str, is_leader: bool) -> Member {
    Member {
        id: UserId::new(uid),
        name: name.to_string(),
        skills: vec!["rust".to_string()],
        is_leader,
    }
}

pub(super) fn roster() -> Roster {
    Roster {
        project_id: PROJECT,
        title: "Campus meal-plan optimizer".to_string(),
        leader_id: UserId::new("s-3001"),
        members: vec![
            member("s-3001", "Dana", true),
            member("s-3002", "Minho", false),
            member("s-3003", "Priya", false),
        ],
    }
}

/// Scripted review directory: fixed roster, configurable submission state,
/// recorded submissions, optional failure injection.
#[derive(Default)]
pub(super) struct ScriptedReviews {
    roster: Mutex<Option<Roster>>,
    completed: Mutex<Vec<UserId>>,
    submit_error: Mutex<Option<DirectoryError>>,
    fail_roster: Mutex<bool>,
    pub(super) submissions: Mutex<Vec<ReviewSubmission>>,
}

impl ScriptedReviews {
    pub(super) fn with_roster(roster: Roster) -> Arc<Self> {
        let directory = Self::default();
        *directory.roster.lock().expect("fake poisoned") = Some(roster);
        Arc::new(directory)
    }

    pub(super) fn mark_completed(&self, uid: &str) {
        self.completed
            .lock()
            .expect("fake poisoned")
            .push(UserId::new(uid));
    }

    pub(super) fn fail_submissions_with(&self, error: DirectoryError) {
        *self.submit_error.lock().expect("fake poisoned") = Some(error);
    }

    pub(super) fn fail_roster_fetches(&self) {
        *self.fail_roster.lock().expect("fake poisoned") = true;
    }

    pub(super) fn submission_count(&self) -> usize {
        self.submissions.lock().expect("fake poisoned").len()
    }
}

#[async_trait]
impl ReviewDirectory for ScriptedReviews {
    async fn fetch_roster(&self, _project: &ProjectId) -> Result<Roster, DirectoryError> {
        if *self.fail_roster.lock().expect("fake poisoned") {
            return Err(DirectoryError::Unavailable("connection reset".to_string()));
        }
        self.roster
            .lock()
            .expect("fake poisoned")
            .clone()
            .ok_or_else(|| DirectoryError::Rejected("project not found".to_string()))
    }

    async fn fetch_submission_state(
        &self,
        _project: &ProjectId,
        _reviewer: &UserId,
    ) -> Result<SubmissionState, DirectoryError> {
        Ok(SubmissionState {
            completed: self.completed.lock().expect("fake poisoned").clone(),
        })
    }

    async fn submit_review(&self, review: &ReviewSubmission) -> Result<(), DirectoryError> {
        if let Some(error) = self.submit_error.lock().expect("fake poisoned").clone() {
            return Err(error);
        }
        self.submissions
            .lock()
            .expect("fake poisoned")
            .push(review.clone());
        Ok(())
    }
}

/// Review directory whose submissions block until released.
pub(super) struct GatedReviews {
    inner: Arc<ScriptedReviews>,
    gate: tokio::sync::Semaphore,
}

impl GatedReviews {
    pub(super) fn with_roster(roster: Roster) -> Arc<Self> {
        Arc::new(Self {
            inner: ScriptedReviews::with_roster(roster),
            gate: tokio::sync::Semaphore::new(0),
        })
    }

    pub(super) fn release_one(&self) {
        self.gate.add_permits(1);
    }

    pub(super) fn submission_count(&self) -> usize {
        self.inner.submission_count()
    }
}

#[async_trait]
impl ReviewDirectory for GatedReviews {
    async fn fetch_roster(&self, project: &ProjectId) -> Result<Roster, DirectoryError> {
        self.inner.fetch_roster(project).await
    }

    async fn fetch_submission_state(
        &self,
        project: &ProjectId,
        reviewer: &UserId,
    ) -> Result<SubmissionState, DirectoryError> {
        self.inner.fetch_submission_state(project, reviewer).await
    }

    async fn submit_review(&self, review: &ReviewSubmission) -> Result<(), DirectoryError> {
        let permit = self.gate.acquire().await.expect("gate closed");
        permit.forget();
        self.inner.submit_review(review).await
    }
}

pub(super) async fn loaded_tracker<D>(directory: Arc<D>) -> PeerReviewTracker<D>
where
    D: ReviewDirectory,
{
    let tracker = PeerReviewTracker::new(directory, PROJECT, reviewer());
    tracker.load().await.expect("tracker loads");
    tracker
}
