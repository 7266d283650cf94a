//! Event use cases.
//!
//! Creation, edits, lifecycle changes and attendee registration. Every
//! mutation of a stored event goes through [`EventWriter`], which performs
//! the versioned read-modify-write and retries lost races.

mod attendance;
mod create_event;
mod error;
mod lifecycle;
mod update_event;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use eventia_domain::{DomainError, Event, EventId, EventStatus, UserId};

use crate::infrastructure::config::ConflictRetry;
use crate::infrastructure::ports::{ClockPort, EventRepo, RepoError, Versioned};
use crate::use_cases::retry::retry_on_conflict;

pub use attendance::{RegisterAttendee, UnregisterAttendee};
pub use create_event::CreateEvent;
pub use error::EventError;
pub use lifecycle::{CancelEvent, ChangeEventStatus, SetEventActive};
pub use update_event::UpdateEvent;

/// Container for event use cases.
pub struct EventUseCases {
    pub create: Arc<CreateEvent>,
    pub update: Arc<UpdateEvent>,
    pub cancel: Arc<CancelEvent>,
    pub change_status: Arc<ChangeEventStatus>,
    pub set_active: Arc<SetEventActive>,
    pub register_attendee: Arc<RegisterAttendee>,
    pub unregister_attendee: Arc<UnregisterAttendee>,
    pub ops: Arc<EventOps>,
}

impl EventUseCases {
    pub fn new(
        event_repo: Arc<dyn EventRepo>,
        clock: Arc<dyn ClockPort>,
        retry: ConflictRetry,
    ) -> Self {
        let writer = EventWriter::new(event_repo.clone(), clock.clone(), retry);
        Self {
            create: Arc::new(CreateEvent::new(event_repo.clone(), clock)),
            update: Arc::new(UpdateEvent::new(writer.clone())),
            cancel: Arc::new(CancelEvent::new(writer.clone())),
            change_status: Arc::new(ChangeEventStatus::new(writer.clone())),
            set_active: Arc::new(SetEventActive::new(writer.clone())),
            register_attendee: Arc::new(RegisterAttendee::new(writer.clone())),
            unregister_attendee: Arc::new(UnregisterAttendee::new(writer)),
            ops: Arc::new(EventOps::new(event_repo)),
        }
    }
}

/// Versioned read-modify-write over a single stored event.
#[derive(Clone)]
pub struct EventWriter {
    event_repo: Arc<dyn EventRepo>,
    clock: Arc<dyn ClockPort>,
    retry: ConflictRetry,
}

impl EventWriter {
    pub fn new(
        event_repo: Arc<dyn EventRepo>,
        clock: Arc<dyn ClockPort>,
        retry: ConflictRetry,
    ) -> Self {
        Self {
            event_repo,
            clock,
            retry,
        }
    }

    /// Load `id`, apply `change` at the current time and store the result
    /// if nobody wrote in between. Lost races are retried per the policy.
    pub async fn modify<F>(
        &self,
        id: EventId,
        operation: &'static str,
        change: F,
    ) -> Result<Versioned<Event>, EventError>
    where
        F: Fn(&Event, DateTime<Utc>) -> Result<Event, DomainError> + Sync,
    {
        let change = &change;
        retry_on_conflict(self.retry, operation, move || {
            self.attempt(id, operation, change)
        })
        .await
    }

    async fn attempt<F>(
        &self,
        id: EventId,
        operation: &'static str,
        change: &F,
    ) -> Result<Versioned<Event>, EventError>
    where
        F: Fn(&Event, DateTime<Utc>) -> Result<Event, DomainError> + Sync,
    {
        let current = self
            .event_repo
            .find_versioned(id)
            .await?
            .ok_or(EventError::NotFound(id))?;

        let next = change(&current.value, self.clock.now()).map_err(|e| {
            tracing::warn!(
                event_id = %id,
                operation,
                code = e.code().unwrap_or("VALIDATION"),
                error = %e,
                "Event change rejected"
            );
            e
        })?;

        let version = self
            .event_repo
            .update_if_version(&next, current.version)
            .await?;
        Ok(Versioned::new(version, next))
    }
}

/// Read-side event operations and deletion.
pub struct EventOps {
    event_repo: Arc<dyn EventRepo>,
}

impl EventOps {
    pub fn new(event_repo: Arc<dyn EventRepo>) -> Self {
        Self { event_repo }
    }

    pub async fn get(&self, id: EventId) -> Result<Option<Event>, RepoError> {
        tracing::debug!(event_id = %id, "Loading event");
        self.event_repo.find_by_id(id).await
    }

    pub async fn delete(&self, id: EventId) -> Result<bool, RepoError> {
        let deleted = self.event_repo.delete(id).await?;
        if deleted {
            tracing::info!(event_id = %id, "Event deleted");
        }
        Ok(deleted)
    }

    pub async fn list_by_organizer(&self, organizer_id: &UserId) -> Result<Vec<Event>, RepoError> {
        tracing::debug!(organizer_id = %organizer_id, "Listing events by organizer");
        self.event_repo.find_by_organizer(organizer_id).await
    }

    pub async fn list_by_status(&self, status: EventStatus) -> Result<Vec<Event>, RepoError> {
        tracing::debug!(status = %status, "Listing events by status");
        self.event_repo.find_by_status(status).await
    }

    pub async fn list_by_tags(&self, tags: &[String]) -> Result<Vec<Event>, RepoError> {
        tracing::debug!(?tags, "Listing events by tags");
        self.event_repo.find_by_tags(tags).await
    }

    pub async fn list_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Event>, RepoError> {
        tracing::debug!(%from, %to, "Listing events in range");
        self.event_repo.find_by_date_range(from, to).await
    }

    pub async fn list_for_attendee(&self, user_id: &UserId) -> Result<Vec<Event>, RepoError> {
        tracing::debug!(user_id = %user_id, "Listing events for attendee");
        self.event_repo.find_by_attendee(user_id).await
    }

    pub async fn search(&self, text: &str) -> Result<Vec<Event>, RepoError> {
        tracing::debug!(text, "Searching events");
        self.event_repo.search(text).await
    }
}
