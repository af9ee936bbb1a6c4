use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::workflows::matchmaking::applications::directory::ApplicationDirectory;
use crate::workflows::matchmaking::applications::domain::{
    Applicant, ApplicationId, ApplicationStatus, PastReview,
};
use crate::workflows::matchmaking::applications::ApplicantBoard;
use crate::workflows::matchmaking::directory::DirectoryError;
use crate::workflows::matchmaking::domain::{ProjectId, UserId};

pub(super) const PROJECT: ProjectId = ProjectId(41);

pub(super) fn leader() -> UserId {
    UserId::new("s-1001")
}

pub(super) fn applicant(id: u64, uid: &str, status: ApplicationStatus) -> Applicant {
    Applicant {
        application_id: ApplicationId(id),
        applicant_id: UserId::new(uid),
        project_id: PROJECT,
        name: format!("Student {uid}"),
        applied_date: NaiveDate::from_ymd_opt(2025, 9, 12).expect("valid date"),
        motivation: "I want to build the recommendation engine.".to_string(),
        skills: vec!["rust".to_string(), "sql".to_string()],
        profile_summary: "Third-year student, two prior team projects.".to_string(),
        website: None,
        status,
        past_reviews: vec![PastReview {
            score: 4,
            comment: "Reliable teammate".to_string(),
        }],
    }
}

pub(super) fn pending_roster() -> Vec<Applicant> {
    vec![
        applicant(1, "s-2001", ApplicationStatus::Pending),
        applicant(2, "s-2002", ApplicationStatus::Pending),
        applicant(3, "s-2003", ApplicationStatus::Accepted),
    ]
}

/// Scripted directory fake: serves a fixed applicant list and records every
/// status write. `fail_updates_with` makes the next writes fail.
#[derive(Default)]
pub(super) struct ScriptedDirectory {
    applicants: Mutex<Vec<Applicant>>,
    update_error: Mutex<Option<DirectoryError>>,
    fail_fetch: Mutex<bool>,
    pub(super) updates: Mutex<Vec<(UserId, ApplicationStatus)>>,
}

impl ScriptedDirectory {
    pub(super) fn with_applicants(applicants: Vec<Applicant>) -> Arc<Self> {
        let directory = Self::default();
        *directory.applicants.lock().expect("fake poisoned") = applicants;
        Arc::new(directory)
    }

    pub(super) fn fail_updates_with(&self, error: DirectoryError) {
        *self.update_error.lock().expect("fake poisoned") = Some(error);
    }

    pub(super) fn fail_fetches(&self) {
        *self.fail_fetch.lock().expect("fake poisoned") = true;
    }

    pub(super) fn update_count(&self) -> usize {
        self.updates.lock().expect("fake poisoned").len()
    }
}

#[async_trait]
impl ApplicationDirectory for ScriptedDirectory {
    async fn fetch_applications(
        &self,
        _project: &ProjectId,
        _acting_user: &UserId,
    ) -> Result<Vec<Applicant>, DirectoryError> {
        if *self.fail_fetch.lock().expect("fake poisoned") {
            return Err(DirectoryError::Unavailable("connection reset".to_string()));
        }
        Ok(self.applicants.lock().expect("fake poisoned").clone())
    }

    async fn update_status(
        &self,
        _project: &ProjectId,
        applicant: &UserId,
        status: ApplicationStatus,
        _acting_user: &UserId,
    ) -> Result<(), DirectoryError> {
        if let Some(error) = self.update_error.lock().expect("fake poisoned").clone() {
            return Err(error);
        }
        self.updates
            .lock()
            .expect("fake poisoned")
            .push((applicant.clone(), status));
        Ok(())
    }
}

/// Directory whose status writes block until released, so tests can hold a
/// transition in flight deterministically.
pub(super) struct GatedDirectory {
    applicants: Mutex<Vec<Applicant>>,
    gate: tokio::sync::Semaphore,
    pub(super) updates: Mutex<Vec<(UserId, ApplicationStatus)>>,
}

impl GatedDirectory {
    pub(super) fn with_applicants(applicants: Vec<Applicant>) -> Arc<Self> {
        let directory = Self {
            applicants: Mutex::new(applicants),
            gate: tokio::sync::Semaphore::new(0),
            updates: Mutex::new(Vec::new()),
        };
        Arc::new(directory)
    }

    pub(super) fn release_one(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl ApplicationDirectory for GatedDirectory {
    async fn fetch_applications(
        &self,
        _project: &ProjectId,
        _acting_user: &UserId,
    ) -> Result<Vec<Applicant>, DirectoryError> {
        Ok(self.applicants.lock().expect("fake poisoned").clone())
    }

    async fn update_status(
        &self,
        _project: &ProjectId,
        applicant: &UserId,
        status: ApplicationStatus,
        _acting_user: &UserId,
    ) -> Result<(), DirectoryError> {
        let permit = self.gate.acquire().await.expect("gate closed");
        permit.forget();
        self.updates
            .lock()
            .expect("fake poisoned")
            .push((applicant.clone(), status));
        Ok(())
    }
}

pub(super) async fn loaded_board<D>(directory: Arc<D>) -> ApplicantBoard<D>
where
    D: ApplicationDirectory,
{
    let board = ApplicantBoard::new(directory, PROJECT, leader());
    board.load().await.expect("board loads");
    board
}

pub(super) fn status_of<D>(board: &ApplicantBoard<D>, id: u64) -> ApplicationStatus
where
    D: ApplicationDirectory,
{
    board
        .applicants()
        .into_iter()
        .find(|applicant| applicant.application_id == ApplicationId(id))
        .map(|applicant| applicant.status)
        .expect("applicant present")
}
