use async_trait::async_trait;

use super::domain::{Applicant, ApplicationStatus};
use crate::workflows::matchmaking::directory::DirectoryError;
use crate::workflows::matchmaking::domain::{ProjectId, UserId};

/// Authoritative store for application records.
///
/// The acting user's id travels on every call so the directory can reject
/// impersonation; the board never re-derives authorization locally.
#[async_trait]
pub trait ApplicationDirectory: Send + Sync {
    /// Fetch all applications for a project, scoped server-side to the
    /// leader view.
    async fn fetch_applications(
        &self,
        project: &ProjectId,
        acting_user: &UserId,
    ) -> Result<Vec<Applicant>, DirectoryError>;

    /// Persist a status decision for one applicant. Leader-only; idempotent
    /// when retried with the same target status.
    async fn update_status(
        &self,
        project: &ProjectId,
        applicant: &UserId,
        status: ApplicationStatus,
        acting_user: &UserId,
    ) -> Result<(), DirectoryError>;
}
