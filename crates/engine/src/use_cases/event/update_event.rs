//! Update event use case.

use eventia_domain::{Event, EventId, EventUpdateProps};

use crate::infrastructure::ports::Versioned;

use super::error::EventError;
use super::EventWriter;

/// Applies a partial update to a stored event.
pub struct UpdateEvent {
    writer: EventWriter,
}

impl UpdateEvent {
    pub fn new(writer: EventWriter) -> Self {
        Self { writer }
    }

    pub async fn execute(
        &self,
        event_id: EventId,
        props: EventUpdateProps,
    ) -> Result<Versioned<Event>, EventError> {
        let updated = self
            .writer
            .modify(event_id, "update_event", |event, now| {
                event.update(props.clone(), now)
            })
            .await?;

        tracing::info!(event_id = %event_id, version = updated.version, "Event updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::ConflictRetry;
    use crate::infrastructure::ports::MockEventRepo;
    use crate::test_fixtures::{clock_at, published_event, user};
    use chrono::Utc;
    use eventia_domain::{codes, DomainErrorKind};
    use std::sync::Arc;

    #[tokio::test]
    async fn when_capacity_below_attendees_rejects_without_write() {
        let now = Utc::now();
        let event = published_event(now, Some(5))
            .add_attendee(user("a"), now)
            .unwrap()
            .add_attendee(user("b"), now)
            .unwrap();
        let id = event.id();

        let mut repo = MockEventRepo::new();
        repo.expect_find_versioned()
            .times(1)
            .returning(move |_| Ok(Some(Versioned::new(3, event.clone()))));
        repo.expect_update_if_version().never();

        let use_case = UpdateEvent::new(EventWriter::new(
            Arc::new(repo),
            clock_at(now),
            ConflictRetry::default(),
        ));
        let err = use_case
            .execute(
                id,
                EventUpdateProps {
                    capacity: Some(Some(1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.domain_code(), Some(codes::EVENT_INVALID_CAPACITY));
        assert!(matches!(
            err,
            EventError::Domain(ref e) if e.kind() == DomainErrorKind::EventUpdate
        ));
    }

    #[tokio::test]
    async fn when_valid_update_writes_new_version() {
        let now = Utc::now();
        let event = published_event(now, None);
        let id = event.id();

        let mut repo = MockEventRepo::new();
        repo.expect_find_versioned()
            .returning(move |_| Ok(Some(Versioned::new(1, event.clone()))));
        repo.expect_update_if_version()
            .withf(|e, expected| e.title().as_str() == "Renamed" && *expected == 1)
            .returning(|_, _| Ok(2));

        let use_case = UpdateEvent::new(EventWriter::new(
            Arc::new(repo),
            clock_at(now),
            ConflictRetry::default(),
        ));
        let updated = use_case
            .execute(
                id,
                EventUpdateProps {
                    title: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.version, 2);
        assert_eq!(updated.value.title().as_str(), "Renamed");
    }
}
