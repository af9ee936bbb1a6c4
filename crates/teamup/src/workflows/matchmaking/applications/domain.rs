use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflows::matchmaking::domain::{ProjectId, UserId};

/// Identifier wrapper for application records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub u64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of one application. Exactly one value holds at any time; no
/// history of prior statuses is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// A leader's decision on a pending application. `Pending` is not a valid
/// target, so it is unrepresentable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Accepted,
    Rejected,
}

impl Decision {
    pub const fn target_status(self) -> ApplicationStatus {
        match self {
            Decision::Accepted => ApplicationStatus::Accepted,
            Decision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// One prior peer review of the applicant, computed externally and read-only
/// to this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastReview {
    pub score: u8,
    pub comment: String,
}

/// One student's candidacy for one project, as served to the leader view.
///
/// Everything except `status` is immutable once submitted; editing happens in
/// the external profile flow, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub application_id: ApplicationId,
    pub applicant_id: UserId,
    pub project_id: ProjectId,
    pub name: String,
    pub applied_date: NaiveDate,
    pub motivation: String,
    pub skills: Vec<String>,
    pub profile_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub status: ApplicationStatus,
    pub past_reviews: Vec<PastReview>,
}

impl Applicant {
    pub fn review_count(&self) -> usize {
        self.past_reviews.len()
    }

    pub fn average_review_score(&self) -> Option<f32> {
        if self.past_reviews.is_empty() {
            return None;
        }
        let sum: u32 = self.past_reviews.iter().map(|r| u32::from(r.score)).sum();
        Some(sum as f32 / self.past_reviews.len() as f32)
    }
}

/// Applicants grouped by status with a pure filter; every applicant lands in
/// exactly one group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusBoardView {
    pub pending: Vec<Applicant>,
    pub accepted: Vec<Applicant>,
    pub rejected: Vec<Applicant>,
}

impl StatusBoardView {
    pub fn partition(applicants: Vec<Applicant>) -> Self {
        let mut view = Self::default();
        for applicant in applicants {
            match applicant.status {
                ApplicationStatus::Pending => view.pending.push(applicant),
                ApplicationStatus::Accepted => view.accepted.push(applicant),
                ApplicationStatus::Rejected => view.rejected.push(applicant),
            }
        }
        view
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            pending: self.pending.len(),
            accepted: self.accepted.len(),
            rejected: self.rejected.len(),
        }
    }
}

/// Group sizes for the board tabs. Always sums to the applicant total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.accepted + self.rejected
    }
}
