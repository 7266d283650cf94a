//! Repository port traits for persistence.
//!
//! Every aggregate is stored with a version counter. Mutating use cases read
//! through `find_versioned` and write back through `update_if_version`, which
//! fails with `RepoError::VersionConflict` instead of overwriting a newer
//! write. Plain `update` is an unconditional overwrite for administrative
//! paths that do not read-modify-write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eventia_domain::{
    Event, EventId, EventStatus, NotificationPreference, Ticket, TicketId, TicketStatus,
    TicketType, UserId,
};

use super::error::RepoError;
use super::types::Versioned;

// =============================================================================
// Events
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepo: Send + Sync {
    // CRUD
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, RepoError>;
    async fn find_versioned(&self, id: EventId) -> Result<Option<Versioned<Event>>, RepoError>;
    /// Insert a new event at version 1. Fails if the id already exists.
    async fn save(&self, event: &Event) -> Result<u64, RepoError>;
    async fn update(&self, event: &Event) -> Result<u64, RepoError>;
    /// Compare-and-swap write; returns the new version.
    async fn update_if_version(&self, event: &Event, expected_version: u64)
        -> Result<u64, RepoError>;
    async fn delete(&self, id: EventId) -> Result<bool, RepoError>;

    // Queries
    async fn find_by_organizer(&self, organizer_id: &UserId) -> Result<Vec<Event>, RepoError>;
    async fn find_by_status(&self, status: EventStatus) -> Result<Vec<Event>, RepoError>;
    /// Events carrying at least one of `tags`.
    async fn find_by_tags(&self, tags: &[String]) -> Result<Vec<Event>, RepoError>;
    /// Events whose `[start, end]` overlaps `[from, to]`.
    async fn find_by_date_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Event>, RepoError>;
    async fn find_by_attendee(&self, user_id: &UserId) -> Result<Vec<Event>, RepoError>;
    /// Case-insensitive substring match over title and description.
    async fn search(&self, text: &str) -> Result<Vec<Event>, RepoError>;
}

// =============================================================================
// Tickets
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepo: Send + Sync {
    // CRUD
    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, RepoError>;
    async fn find_versioned(&self, id: TicketId) -> Result<Option<Versioned<Ticket>>, RepoError>;
    async fn save(&self, ticket: &Ticket) -> Result<u64, RepoError>;
    async fn update(&self, ticket: &Ticket) -> Result<u64, RepoError>;
    async fn update_if_version(
        &self,
        ticket: &Ticket,
        expected_version: u64,
    ) -> Result<u64, RepoError>;
    async fn delete(&self, id: TicketId) -> Result<bool, RepoError>;

    // Queries
    async fn find_by_event(&self, event_id: EventId) -> Result<Vec<Ticket>, RepoError>;
    /// Tiers whose last purchase was made by `user_id`.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Ticket>, RepoError>;
    async fn find_by_type(&self, ticket_type: TicketType) -> Result<Vec<Ticket>, RepoError>;
    async fn find_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>, RepoError>;
    /// Active, `AVAILABLE` tiers with stock left.
    async fn find_available(&self) -> Result<Vec<Ticket>, RepoError>;
    async fn find_sold(&self) -> Result<Vec<Ticket>, RepoError>;
}

// =============================================================================
// Notification preferences
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPreferenceRepo: Send + Sync {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<NotificationPreference>, RepoError>;
    async fn find_versioned_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Versioned<NotificationPreference>>, RepoError>;
    /// Unconditional upsert keyed by user.
    async fn save(&self, preference: &NotificationPreference) -> Result<u64, RepoError>;
    /// Conditional upsert. `None` requires that nothing is stored yet for
    /// the user; `Some(v)` requires the stored version to be `v`.
    async fn save_if_version(
        &self,
        preference: &NotificationPreference,
        expected_version: Option<u64>,
    ) -> Result<u64, RepoError>;
}
