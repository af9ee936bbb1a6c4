use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use super::directory::{ReviewDirectory, ReviewSubmission};
use super::domain::{Member, MemberReviewView, ReviewDraft, MAX_SCORE, MIN_SCORE};
use crate::workflows::matchmaking::directory::{DirectoryError, LoadError};
use crate::workflows::matchmaking::domain::{ProjectId, UserId};

/// Error raised by the tracker's draft and submission operations.
///
/// The first six variants are local guards and never reach the network;
/// `Rejected` carries the directory's refusal verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("member {0} is not reviewable in this project")]
    UnknownMember(UserId),
    #[error("score must be between {MIN_SCORE} and {MAX_SCORE}, got {0}")]
    ScoreOutOfRange(u8),
    #[error("a score is required before submitting")]
    MissingScore,
    #[error("a comment is required before submitting")]
    EmptyComment,
    #[error("a review for this member was already submitted")]
    AlreadySubmitted,
    #[error("a submission for this member is still in flight")]
    SubmissionInFlight,
    #[error("review rejected: {0}")]
    Rejected(String),
    #[error("project directory unavailable: {0}")]
    Unavailable(String),
}

impl From<DirectoryError> for ReviewError {
    fn from(value: DirectoryError) -> Self {
        match value {
            DirectoryError::Unavailable(reason) => Self::Unavailable(reason),
            DirectoryError::Rejected(reason) => Self::Rejected(reason),
        }
    }
}

struct Slot {
    member: Member,
    draft: ReviewDraft,
    submitted: bool,
    submitting: bool,
}

impl Slot {
    fn fresh(member: Member) -> Self {
        Self {
            member,
            draft: ReviewDraft::default(),
            submitted: false,
            submitting: false,
        }
    }

    fn view(&self) -> MemberReviewView {
        MemberReviewView {
            member: self.member.clone(),
            score: self.draft.score(),
            comment: self.draft.comment().to_string(),
            submitted: self.submitted,
            submitting: self.submitting,
        }
    }
}

#[derive(Default)]
struct TrackerState {
    title: String,
    slots: Vec<Slot>,
}

impl TrackerState {
    fn slot_mut(&mut self, member: &UserId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|slot| slot.member.id == *member)
    }
}

/// Per-project peer-review state for one acting user.
///
/// Each reviewable member (the roster minus the acting user) gets a local
/// slot holding the in-progress draft and the submitted/submitting flags.
/// Submission is confirmed-only: the lock is set after the directory accepts
/// the review, and a failed submission keeps the entered draft intact.
pub struct PeerReviewTracker<D> {
    directory: Arc<D>,
    project_id: ProjectId,
    acting_user: UserId,
    state: Mutex<TrackerState>,
}

impl<D> PeerReviewTracker<D>
where
    D: ReviewDirectory,
{
    pub fn new(directory: Arc<D>, project_id: ProjectId, acting_user: UserId) -> Self {
        Self {
            directory,
            project_id,
            acting_user,
            state: Mutex::new(TrackerState::default()),
        }
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn project_title(&self) -> String {
        let state = self.state.lock().expect("tracker state poisoned");
        state.title.clone()
    }

    /// Fetch the roster and rebuild the reviewable slots, excluding the
    /// acting user. Drafts are reset; a failed fetch leaves the slots
    /// untouched so retrying is safe.
    pub async fn load_members(&self) -> Result<Vec<Member>, LoadError> {
        let roster = self.directory.fetch_roster(&self.project_id).await?;

        let mut state = self.state.lock().expect("tracker state poisoned");
        state.title = roster.title;
        state.slots = roster
            .members
            .into_iter()
            .filter(|member| member.id != self.acting_user)
            .map(Slot::fresh)
            .collect();
        Ok(state
            .slots
            .iter()
            .map(|slot| slot.member.clone())
            .collect())
    }

    /// Fetch which members already hold a submitted review from this
    /// reviewer and lock their forms. Members absent from the response are
    /// left open; a form locked earlier in this session is never unlocked.
    pub async fn load_submission_state(&self) -> Result<BTreeMap<UserId, bool>, LoadError> {
        let submission_state = self
            .directory
            .fetch_submission_state(&self.project_id, &self.acting_user)
            .await?;

        let mut state = self.state.lock().expect("tracker state poisoned");
        for slot in &mut state.slots {
            if submission_state.completed.contains(&slot.member.id) {
                slot.submitted = true;
            }
        }
        Ok(state
            .slots
            .iter()
            .map(|slot| (slot.member.id.clone(), slot.submitted))
            .collect())
    }

    /// Roster and submission state in one call.
    pub async fn load(&self) -> Result<Vec<MemberReviewView>, LoadError> {
        self.load_members().await?;
        self.load_submission_state().await?;
        Ok(self.members())
    }

    /// Read model for every reviewable member, in roster order.
    pub fn members(&self) -> Vec<MemberReviewView> {
        let state = self.state.lock().expect("tracker state poisoned");
        state.slots.iter().map(Slot::view).collect()
    }

    pub fn submitted_map(&self) -> BTreeMap<UserId, bool> {
        let state = self.state.lock().expect("tracker state poisoned");
        state
            .slots
            .iter()
            .map(|slot| (slot.member.id.clone(), slot.submitted))
            .collect()
    }

    /// The review phase is complete for the acting user once every
    /// reviewable member's form is locked. Derived, never stored.
    pub fn is_complete(&self) -> bool {
        let state = self.state.lock().expect("tracker state poisoned");
        state.slots.iter().all(|slot| slot.submitted)
    }

    /// Record a score on the member's draft. Out-of-range scores are
    /// rejected rather than clamped, so UI bugs stay visible.
    pub fn set_score(&self, member: &UserId, score: u8) -> Result<(), ReviewError> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(ReviewError::ScoreOutOfRange(score));
        }

        let mut state = self.state.lock().expect("tracker state poisoned");
        let slot = state
            .slot_mut(member)
            .ok_or_else(|| ReviewError::UnknownMember(member.clone()))?;
        if slot.submitted {
            return Err(ReviewError::AlreadySubmitted);
        }
        slot.draft.set_score(score);
        Ok(())
    }

    /// Record comment text on the member's draft. No remote call.
    pub fn set_comment(&self, member: &UserId, text: impl Into<String>) -> Result<(), ReviewError> {
        let mut state = self.state.lock().expect("tracker state poisoned");
        let slot = state
            .slot_mut(member)
            .ok_or_else(|| ReviewError::UnknownMember(member.clone()))?;
        if slot.submitted {
            return Err(ReviewError::AlreadySubmitted);
        }
        slot.draft.set_comment(text.into());
        Ok(())
    }

    /// Clear the member's draft back to empty. No-op once submitted.
    pub fn reset_draft(&self, member: &UserId) -> Result<(), ReviewError> {
        let mut state = self.state.lock().expect("tracker state poisoned");
        let slot = state
            .slot_mut(member)
            .ok_or_else(|| ReviewError::UnknownMember(member.clone()))?;
        if !slot.submitted {
            slot.draft.clear();
        }
        Ok(())
    }

    /// Submit the member's draft to the directory.
    ///
    /// Validation failures and the duplicate/in-flight guards return before
    /// any remote call. On success the form locks for the session; on
    /// failure the entered score and comment survive so the user can retry.
    pub async fn submit(&self, member: &UserId) -> Result<(), ReviewError> {
        let submission = {
            let mut state = self.state.lock().expect("tracker state poisoned");
            let slot = state
                .slot_mut(member)
                .ok_or_else(|| ReviewError::UnknownMember(member.clone()))?;

            if slot.submitted {
                return Err(ReviewError::AlreadySubmitted);
            }
            if slot.submitting {
                return Err(ReviewError::SubmissionInFlight);
            }

            let score = slot.draft.score().ok_or(ReviewError::MissingScore)?;
            let comment = slot.draft.comment().trim();
            if comment.is_empty() {
                return Err(ReviewError::EmptyComment);
            }

            slot.submitting = true;
            ReviewSubmission {
                project_id: self.project_id,
                reviewer_id: self.acting_user.clone(),
                reviewee_id: slot.member.id.clone(),
                score,
                comment: comment.to_string(),
            }
        };

        let outcome = self.directory.submit_review(&submission).await;

        let mut state = self.state.lock().expect("tracker state poisoned");
        // The slot may have been rebuilt by a reload while the submission
        // was outstanding; the stale completion is discarded in that case.
        match outcome {
            Ok(()) => {
                if let Some(slot) = state.slot_mut(member) {
                    slot.submitting = false;
                    slot.submitted = true;
                }
                info!(
                    project = %self.project_id,
                    reviewee = %submission.reviewee_id,
                    "peer review submitted"
                );
                Ok(())
            }
            Err(err) => {
                if let Some(slot) = state.slot_mut(member) {
                    slot.submitting = false;
                }
                warn!(
                    project = %self.project_id,
                    reviewee = %submission.reviewee_id,
                    error = %err,
                    "peer review submission failed"
                );
                Err(err.into())
            }
        }
    }
}
