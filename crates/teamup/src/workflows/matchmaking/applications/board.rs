use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use super::directory::ApplicationDirectory;
use super::domain::{
    Applicant, ApplicationId, ApplicationStatus, Decision, StatusBoardView, StatusCounts,
};
use crate::workflows::matchmaking::directory::{DirectoryError, LoadError};
use crate::workflows::matchmaking::domain::{ProjectId, UserId};
use crate::workflows::matchmaking::optimistic::OptimisticValue;

/// Error raised by [`ApplicantBoard::transition`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("application {0} is not on this board")]
    UnknownApplication(ApplicationId),
    #[error("application is already {}", .current.label())]
    AlreadyDecided { current: ApplicationStatus },
    #[error("a status update for this applicant is still in flight")]
    UpdateInFlight,
    #[error("status update rejected: {0}")]
    Rejected(String),
    #[error("project directory unavailable: {0}")]
    Unavailable(String),
}

impl From<DirectoryError> for TransitionError {
    fn from(value: DirectoryError) -> Self {
        match value {
            DirectoryError::Unavailable(reason) => Self::Unavailable(reason),
            DirectoryError::Rejected(reason) => Self::Rejected(reason),
        }
    }
}

struct Entry {
    applicant: Applicant,
    status: OptimisticValue<ApplicationStatus>,
}

impl Entry {
    fn confirmed(applicant: Applicant) -> Self {
        let status = OptimisticValue::confirmed(applicant.status);
        Self { applicant, status }
    }

    fn snapshot(&self) -> Applicant {
        let mut applicant = self.applicant.clone();
        applicant.status = *self.status.get();
        applicant
    }
}

#[derive(Default)]
struct BoardState {
    entries: Vec<Entry>,
}

impl BoardState {
    fn entry_mut(&mut self, id: &ApplicationId) -> Option<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.applicant.application_id == *id)
    }
}

/// The leader's view of one project's applicants.
///
/// Owns a local cache of application records and applies accept/reject
/// decisions optimistically: the staged status is visible immediately, and a
/// failed remote write rolls it back so the cache never diverges from the
/// authoritative store. One instance is scoped to one project view; the
/// acting user is injected at construction and forwarded on every call.
pub struct ApplicantBoard<D> {
    directory: Arc<D>,
    project_id: ProjectId,
    acting_user: UserId,
    state: Mutex<BoardState>,
}

impl<D> ApplicantBoard<D>
where
    D: ApplicationDirectory,
{
    pub fn new(directory: Arc<D>, project_id: ProjectId, acting_user: UserId) -> Self {
        Self {
            directory,
            project_id,
            acting_user,
            state: Mutex::new(BoardState::default()),
        }
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Fetch the applicant set from the directory, replacing the local cache.
    ///
    /// On failure the cache is left untouched, so retrying is always safe.
    pub async fn load(&self) -> Result<Vec<Applicant>, LoadError> {
        let applicants = self
            .directory
            .fetch_applications(&self.project_id, &self.acting_user)
            .await?;

        let mut state = self.state.lock().expect("board state poisoned");
        state.entries = applicants.into_iter().map(Entry::confirmed).collect();
        Ok(state.entries.iter().map(Entry::snapshot).collect())
    }

    /// Snapshot of all cached applicants in directory order.
    pub fn applicants(&self) -> Vec<Applicant> {
        let state = self.state.lock().expect("board state poisoned");
        state.entries.iter().map(Entry::snapshot).collect()
    }

    /// Applicants grouped by status. Every applicant lands in exactly one
    /// group, so the group sizes always sum to the total.
    pub fn partitions(&self) -> StatusBoardView {
        StatusBoardView::partition(self.applicants())
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.partitions().counts()
    }

    /// Whether a status write for this application is still outstanding.
    pub fn is_in_flight(&self, id: &ApplicationId) -> bool {
        let state = self.state.lock().expect("board state poisoned");
        state
            .entries
            .iter()
            .find(|entry| entry.applicant.application_id == *id)
            .map(|entry| entry.status.in_flight())
            .unwrap_or(false)
    }

    /// Apply a leader decision to a pending application.
    ///
    /// The new status is visible locally before the directory confirms it;
    /// any remote failure restores the previous status before the error is
    /// surfaced. A second call for the same application while a write is
    /// outstanding fails with [`TransitionError::UpdateInFlight`] and issues
    /// no remote call.
    pub async fn transition(
        &self,
        id: &ApplicationId,
        decision: Decision,
    ) -> Result<(), TransitionError> {
        let target = decision.target_status();

        let applicant_id = {
            let mut state = self.state.lock().expect("board state poisoned");
            let entry = state
                .entry_mut(id)
                .ok_or_else(|| TransitionError::UnknownApplication(*id))?;

            if entry.status.in_flight() {
                return Err(TransitionError::UpdateInFlight);
            }
            let current = *entry.status.get();
            if current != ApplicationStatus::Pending {
                return Err(TransitionError::AlreadyDecided { current });
            }

            let staged = entry.status.begin(target);
            debug_assert!(staged, "in-flight checked under the same lock");
            entry.applicant.applicant_id.clone()
        };

        let outcome = self
            .directory
            .update_status(&self.project_id, &applicant_id, target, &self.acting_user)
            .await;

        let mut state = self.state.lock().expect("board state poisoned");
        // The entry may have been replaced by a reload while the write was
        // outstanding; the completion is discarded in that case.
        match outcome {
            Ok(()) => {
                if let Some(entry) = state.entry_mut(id) {
                    entry.status.commit();
                }
                info!(
                    project = %self.project_id,
                    applicant = %applicant_id,
                    status = target.label(),
                    "application status confirmed"
                );
                Ok(())
            }
            Err(err) => {
                if let Some(entry) = state.entry_mut(id) {
                    entry.status.rollback();
                }
                warn!(
                    project = %self.project_id,
                    applicant = %applicant_id,
                    error = %err,
                    "application status update rolled back"
                );
                Err(err.into())
            }
        }
    }
}
