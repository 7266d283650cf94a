//! Create event use case.

use std::sync::Arc;

use eventia_domain::{Event, EventCreateProps};

use crate::infrastructure::ports::{ClockPort, EventRepo, Versioned};

use super::error::EventError;

/// Validates and stores a new event at version 1.
pub struct CreateEvent {
    event_repo: Arc<dyn EventRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CreateEvent {
    pub fn new(event_repo: Arc<dyn EventRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { event_repo, clock }
    }

    pub async fn execute(&self, props: EventCreateProps) -> Result<Versioned<Event>, EventError> {
        let event = Event::create(props, self.clock.now()).map_err(|e| {
            tracing::warn!(error = %e, "Event creation rejected");
            e
        })?;

        let version = self.event_repo.save(&event).await?;
        tracing::info!(
            event_id = %event.id(),
            organizer_id = %event.organizer_id(),
            version,
            "Event created"
        );
        Ok(Versioned::new(version, event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockEventRepo, RepoError};
    use crate::test_fixtures::{clock_at, user};
    use chrono::{Duration, Utc};
    use eventia_domain::{codes, DomainErrorKind, EventStatus};

    fn props(now: chrono::DateTime<Utc>) -> EventCreateProps {
        let start = now + Duration::days(1);
        EventCreateProps::new("Launch", "", start, start + Duration::hours(2), user("u1"))
    }

    #[tokio::test]
    async fn when_valid_input_saves_draft() {
        let now = Utc::now();
        let mut repo = MockEventRepo::new();
        repo.expect_save()
            .withf(|e| e.title().as_str() == "Launch" && e.status() == EventStatus::Draft)
            .times(1)
            .returning(|_| Ok(1));

        let use_case = CreateEvent::new(Arc::new(repo), clock_at(now));
        let created = use_case.execute(props(now)).await.unwrap();

        assert_eq!(created.version, 1);
        assert!(created.value.is_active());
        assert_eq!(created.value.created_at(), now);
    }

    #[tokio::test]
    async fn when_start_in_past_returns_domain_error() {
        let now = Utc::now();
        let mut repo = MockEventRepo::new();
        repo.expect_save().never();

        let use_case = CreateEvent::new(Arc::new(repo), clock_at(now));
        let mut props = props(now);
        props.start_date = now - Duration::hours(1);

        let err = use_case.execute(props).await.unwrap_err();
        match err {
            EventError::Domain(e) => {
                assert_eq!(e.kind(), DomainErrorKind::EventCreate);
                assert_eq!(e.code(), Some(codes::EVENT_INVALID_DATES));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn when_repo_error_propagates() {
        let now = Utc::now();
        let mut repo = MockEventRepo::new();
        repo.expect_save()
            .returning(|_| Err(RepoError::database("save", "disk full")));

        let use_case = CreateEvent::new(Arc::new(repo), clock_at(now));
        let result = use_case.execute(props(now)).await;

        assert!(matches!(result, Err(EventError::Repo(_))));
    }
}
