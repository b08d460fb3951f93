use thiserror::Error;

/// Rejected draft content. Recoverable: the draft is left untouched and the
/// caller may fix it and resubmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("project name is required")]
    EmptyName,
}

/// Failure talking to the remote project service. Terminal for the attempt;
/// nothing retries automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The request never produced a response.
    #[error("project service unreachable: {0}")]
    Transport(String),
    /// The service answered with a rejection.
    #[error("project service rejected the request: {0}")]
    Service(String),
    /// The service answered with a body this client cannot read.
    #[error("project service returned an unreadable response: {0}")]
    InvalidResponse(String),
}
