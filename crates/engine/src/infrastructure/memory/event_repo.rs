//! In-memory event repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eventia_domain::{Event, EventId, EventStatus, UserId};

use super::store::VersionedStore;
use crate::infrastructure::ports::{EventRepo, RepoError, Versioned};

pub struct InMemoryEventRepo {
    store: VersionedStore<EventId, Event>,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            store: VersionedStore::new("Event"),
        }
    }

    /// Query results come back ordered by start date.
    fn query(&self, predicate: impl Fn(&Event) -> bool) -> Result<Vec<Event>, RepoError> {
        let mut events = self.store.filter(predicate)?;
        events.sort_by(|a, b| {
            a.start_date()
                .cmp(&b.start_date())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(events)
    }
}

impl Default for InMemoryEventRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventRepo for InMemoryEventRepo {
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, RepoError> {
        Ok(self.store.get(&id)?.map(Versioned::into_value))
    }

    async fn find_versioned(&self, id: EventId) -> Result<Option<Versioned<Event>>, RepoError> {
        self.store.get(&id)
    }

    async fn save(&self, event: &Event) -> Result<u64, RepoError> {
        self.store.insert(event.id(), event)
    }

    async fn update(&self, event: &Event) -> Result<u64, RepoError> {
        self.store.overwrite(&event.id(), event)
    }

    async fn update_if_version(
        &self,
        event: &Event,
        expected_version: u64,
    ) -> Result<u64, RepoError> {
        self.store
            .compare_and_swap(&event.id(), event, expected_version)
    }

    async fn delete(&self, id: EventId) -> Result<bool, RepoError> {
        Ok(self.store.remove(&id))
    }

    async fn find_by_organizer(&self, organizer_id: &UserId) -> Result<Vec<Event>, RepoError> {
        self.query(|e| e.is_organized_by(organizer_id))
    }

    async fn find_by_status(&self, status: EventStatus) -> Result<Vec<Event>, RepoError> {
        self.query(|e| e.status() == status)
    }

    async fn find_by_tags(&self, tags: &[String]) -> Result<Vec<Event>, RepoError> {
        self.query(|e| tags.iter().any(|tag| e.tags().contains(tag)))
    }

    async fn find_by_date_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Event>, RepoError> {
        self.query(|e| e.start_date() <= to && e.end_date() >= from)
    }

    async fn find_by_attendee(&self, user_id: &UserId) -> Result<Vec<Event>, RepoError> {
        self.query(|e| e.is_attendee(user_id))
    }

    async fn search(&self, text: &str) -> Result<Vec<Event>, RepoError> {
        let needle = text.trim().to_lowercase();
        self.query(|e| {
            e.title().as_str().to_lowercase().contains(&needle)
                || e.description().as_str().to_lowercase().contains(&needle)
        })
    }
}
