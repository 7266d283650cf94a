//! Attendee registration use cases.
//!
//! Registration is a check-then-act against the capacity limit, so it only
//! ever writes through a version check. Two users racing for the last seat
//! cannot both succeed: the loser reloads, sees the event full and gets
//! `EVENT_CAPACITY_FULL`.

use eventia_domain::{Event, EventId, UserId};

use crate::infrastructure::ports::Versioned;

use super::error::EventError;
use super::EventWriter;

pub struct RegisterAttendee {
    writer: EventWriter,
}

impl RegisterAttendee {
    pub fn new(writer: EventWriter) -> Self {
        Self { writer }
    }

    /// Register `user_id` for the event.
    ///
    /// # Returns
    /// * `Ok(Versioned<Event>)` - The stored event including the new attendee
    /// * `Err(EventError::Domain)` - Cancelled, inactive, ended, full, or already registered
    /// * `Err(EventError::ConcurrencyConflict)` - Lost the race on every attempt
    pub async fn execute(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<Versioned<Event>, EventError> {
        let registered = self
            .writer
            .modify(event_id, "register_attendee", |event, now| {
                event.add_attendee(user_id.clone(), now)
            })
            .await?;

        tracing::info!(
            event_id = %event_id,
            user_id = %user_id,
            version = registered.version,
            attendees = registered.value.attendee_count(),
            "Attendee registered"
        );
        Ok(registered)
    }
}

pub struct UnregisterAttendee {
    writer: EventWriter,
}

impl UnregisterAttendee {
    pub fn new(writer: EventWriter) -> Self {
        Self { writer }
    }

    pub async fn execute(
        &self,
        event_id: EventId,
        user_id: &UserId,
    ) -> Result<Versioned<Event>, EventError> {
        let unregistered = self
            .writer
            .modify(event_id, "unregister_attendee", |event, now| {
                event.remove_attendee(user_id, now)
            })
            .await?;

        tracing::info!(
            event_id = %event_id,
            user_id = %user_id,
            version = unregistered.version,
            "Attendee unregistered"
        );
        Ok(unregistered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::ConflictRetry;
    use crate::infrastructure::ports::{MockEventRepo, RepoError};
    use crate::test_fixtures::{clock_at, draft_event, published_event, user};
    use chrono::{Duration, Utc};
    use eventia_domain::{codes, DomainErrorKind};
    use std::sync::Arc;

    #[tokio::test]
    async fn third_registration_on_capacity_two_is_rejected() {
        let now = Utc::now();
        let full = published_event(now, Some(2))
            .add_attendee(user("u1"), now)
            .unwrap()
            .add_attendee(user("u2"), now)
            .unwrap();
        let id = full.id();

        let mut repo = MockEventRepo::new();
        repo.expect_find_versioned()
            .times(1)
            .returning(move |_| Ok(Some(Versioned::new(3, full.clone()))));
        repo.expect_update_if_version().never();

        let writer = EventWriter::new(Arc::new(repo), clock_at(now), ConflictRetry::default());
        let err = RegisterAttendee::new(writer)
            .execute(id, user("u3"))
            .await
            .unwrap_err();

        match err {
            EventError::Domain(e) => {
                assert_eq!(e.kind(), DomainErrorKind::EventAttendance);
                assert_eq!(e.code(), Some(codes::EVENT_CAPACITY_FULL));
                assert!(e.message().contains("capacidad máxima"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn lost_race_reloads_and_sees_full_event() {
        let now = Utc::now();
        let open = published_event(now, Some(1));
        let id = open.id();
        let taken = open.add_attendee(user("winner"), now).unwrap();

        let mut repo = MockEventRepo::new();
        let mut seq = mockall::Sequence::new();
        let first = open.clone();
        repo.expect_find_versioned()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(Versioned::new(1, first.clone()))));
        repo.expect_update_if_version()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|e, expected| {
                Err(RepoError::version_conflict("Event", e.id(), expected, 2))
            });
        repo.expect_find_versioned()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(Versioned::new(2, taken.clone()))));

        let writer = EventWriter::new(Arc::new(repo), clock_at(now), ConflictRetry::default());
        let err = RegisterAttendee::new(writer)
            .execute(id, user("loser"))
            .await
            .unwrap_err();

        assert_eq!(err.domain_code(), Some(codes::EVENT_CAPACITY_FULL));
    }

    #[tokio::test]
    async fn registration_on_ended_event_is_rejected() {
        let created_at = Utc::now();
        let event = published_event(created_at, None);
        let id = event.id();
        let after_end = event.end_date() + Duration::minutes(1);

        let mut repo = MockEventRepo::new();
        repo.expect_find_versioned()
            .returning(move |_| Ok(Some(Versioned::new(1, event.clone()))));
        repo.expect_update_if_version().never();

        let writer = EventWriter::new(
            Arc::new(repo),
            clock_at(after_end),
            ConflictRetry::default(),
        );
        let err = RegisterAttendee::new(writer)
            .execute(id, user("late"))
            .await
            .unwrap_err();

        assert_eq!(err.domain_code(), Some(codes::EVENT_ENDED));
    }

    #[tokio::test]
    async fn unregister_removes_attendee() {
        let now = Utc::now();
        let event = draft_event(now, None).add_attendee(user("u1"), now).unwrap();
        let id = event.id();

        let mut repo = MockEventRepo::new();
        repo.expect_find_versioned()
            .returning(move |_| Ok(Some(Versioned::new(4, event.clone()))));
        repo.expect_update_if_version()
            .withf(|e, expected| e.attendee_count() == 0 && *expected == 4)
            .returning(|_, _| Ok(5));

        let writer = EventWriter::new(Arc::new(repo), clock_at(now), ConflictRetry::default());
        let result = UnregisterAttendee::new(writer)
            .execute(id, &user("u1"))
            .await
            .unwrap();

        assert_eq!(result.version, 5);
        assert!(!result.value.is_attendee(&user("u1")));
    }

    #[tokio::test]
    async fn unregister_unknown_user_is_rejected() {
        let now = Utc::now();
        let event = published_event(now, None);
        let id = event.id();

        let mut repo = MockEventRepo::new();
        repo.expect_find_versioned()
            .returning(move |_| Ok(Some(Versioned::new(1, event.clone()))));
        repo.expect_update_if_version().never();

        let writer = EventWriter::new(Arc::new(repo), clock_at(now), ConflictRetry::default());
        let err = UnregisterAttendee::new(writer)
            .execute(id, &user("ghost"))
            .await
            .unwrap_err();

        assert_eq!(err.domain_code(), Some(codes::EVENT_NOT_REGISTERED));
    }
}
