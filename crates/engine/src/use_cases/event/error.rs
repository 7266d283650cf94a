//! Event use-case errors.

use eventia_domain::{DomainError, EventId};

use crate::infrastructure::ports::RepoError;
use crate::use_cases::retry::ConflictError;

/// Errors that can occur during event operations.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(EventId),
    #[error("Event changed concurrently; gave up after {attempts} attempts")]
    ConcurrencyConflict { attempts: u32 },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl EventError {
    /// Stable code of the underlying domain rejection, if any.
    pub fn domain_code(&self) -> Option<&'static str> {
        match self {
            Self::Domain(e) => e.code(),
            _ => None,
        }
    }
}

impl ConflictError for EventError {
    fn is_version_conflict(&self) -> bool {
        matches!(self, Self::Repo(e) if e.is_version_conflict())
    }

    fn retries_exhausted(attempts: u32) -> Self {
        Self::ConcurrencyConflict { attempts }
    }
}
