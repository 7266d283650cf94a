//! Ticket use-case errors.

use eventia_domain::{DomainError, EventId, TicketId};

use crate::infrastructure::ports::RepoError;
use crate::use_cases::retry::ConflictError;

/// Errors that can occur during ticket operations.
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("Ticket not found: {0}")]
    NotFound(TicketId),
    #[error("Event not found: {0}")]
    EventNotFound(EventId),
    #[error("Cannot add tickets to cancelled event {0}")]
    EventCancelled(EventId),
    #[error("Ticket changed concurrently; gave up after {attempts} attempts")]
    ConcurrencyConflict { attempts: u32 },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl TicketError {
    /// Stable code of the underlying domain rejection, if any.
    pub fn domain_code(&self) -> Option<&'static str> {
        match self {
            Self::Domain(e) => e.code(),
            _ => None,
        }
    }
}

impl ConflictError for TicketError {
    fn is_version_conflict(&self) -> bool {
        matches!(self, Self::Repo(e) if e.is_version_conflict())
    }

    fn retries_exhausted(attempts: u32) -> Self {
        Self::ConcurrencyConflict { attempts }
    }
}
