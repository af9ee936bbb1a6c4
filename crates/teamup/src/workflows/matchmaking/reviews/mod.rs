//! Peer-review tracking after project completion: each member rates and
//! comments on every other member exactly once.

pub mod directory;
pub mod domain;
pub mod router;
pub mod tracker;

#[cfg(test)]
mod tests;

pub use directory::{ReviewDirectory, ReviewSubmission, Roster, SubmissionState};
pub use domain::{Member, MemberReviewView, ReviewDraft, MAX_SCORE, MIN_SCORE};
pub use router::review_router;
pub use tracker::{PeerReviewTracker, ReviewError};
