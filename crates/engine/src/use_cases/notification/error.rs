//! Notification preference use-case errors.

use eventia_domain::DomainError;

use crate::infrastructure::ports::RepoError;
use crate::use_cases::retry::ConflictError;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Preferences changed concurrently; gave up after {attempts} attempts")]
    ConcurrencyConflict { attempts: u32 },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl ConflictError for NotificationError {
    fn is_version_conflict(&self) -> bool {
        matches!(self, Self::Repo(e) if e.is_version_conflict())
    }

    fn retries_exhausted(attempts: u32) -> Self {
        Self::ConcurrencyConflict { attempts }
    }
}
