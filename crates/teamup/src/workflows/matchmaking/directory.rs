/// Failure surface of the remote project directory.
///
/// `Rejected` carries the authoritative side's reason verbatim; callers
/// surface it unchanged instead of substituting a generic message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("project directory unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    Rejected(String),
}

/// A directory read failed. Recoverable: no local state was touched, so the
/// caller may simply retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load from the project directory: {0}")]
pub struct LoadError(#[from] pub DirectoryError);
