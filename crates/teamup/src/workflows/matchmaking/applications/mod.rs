//! Applicant status management for the leader view: load the applicant set,
//! partition it by status, and apply accept/reject decisions with optimistic
//! local state and rollback.

pub mod board;
pub mod directory;
pub mod domain;
pub mod router;

#[cfg(test)]
mod tests;

pub use board::{ApplicantBoard, TransitionError};
pub use directory::ApplicationDirectory;
pub use domain::{
    Applicant, ApplicationId, ApplicationStatus, Decision, PastReview, StatusBoardView,
    StatusCounts,
};
pub use router::application_router;
