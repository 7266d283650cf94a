//! Event lifecycle use cases: cancellation, status changes and the active flag.

use eventia_domain::{Event, EventId, EventStatus};

use crate::infrastructure::ports::Versioned;

use super::error::EventError;
use super::EventWriter;

/// Cancels an event. Cancelling twice succeeds and leaves it cancelled.
pub struct CancelEvent {
    writer: EventWriter,
}

impl CancelEvent {
    pub fn new(writer: EventWriter) -> Self {
        Self { writer }
    }

    pub async fn execute(&self, event_id: EventId) -> Result<Versioned<Event>, EventError> {
        let cancelled = self
            .writer
            .modify(event_id, "cancel_event", |event, now| Ok(event.cancel(now)))
            .await?;

        tracing::info!(
            event_id = %event_id,
            version = cancelled.version,
            attendees = cancelled.value.attendee_count(),
            "Event cancelled"
        );
        Ok(cancelled)
    }
}

/// Moves an event to another status. Leaving `CANCELLED` is rejected.
pub struct ChangeEventStatus {
    writer: EventWriter,
}

impl ChangeEventStatus {
    pub fn new(writer: EventWriter) -> Self {
        Self { writer }
    }

    pub async fn execute(
        &self,
        event_id: EventId,
        status: EventStatus,
    ) -> Result<Versioned<Event>, EventError> {
        let changed = self
            .writer
            .modify(event_id, "change_event_status", |event, now| {
                event.change_status(status, now)
            })
            .await?;

        tracing::info!(
            event_id = %event_id,
            status = %status,
            version = changed.version,
            "Event status changed"
        );
        Ok(changed)
    }
}

/// Activates or deactivates an event. Inactive events refuse registrations.
pub struct SetEventActive {
    writer: EventWriter,
}

impl SetEventActive {
    pub fn new(writer: EventWriter) -> Self {
        Self { writer }
    }

    pub async fn execute(
        &self,
        event_id: EventId,
        active: bool,
    ) -> Result<Versioned<Event>, EventError> {
        let updated = self
            .writer
            .modify(event_id, "set_event_active", |event, now| {
                Ok(if active {
                    event.activate(now)
                } else {
                    event.deactivate(now)
                })
            })
            .await?;

        tracing::info!(
            event_id = %event_id,
            active,
            version = updated.version,
            "Event active flag set"
        );
        Ok(updated)
    }
}
