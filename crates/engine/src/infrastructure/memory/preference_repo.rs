//! In-memory notification preference repository, keyed by user.

use async_trait::async_trait;
use eventia_domain::{NotificationPreference, UserId};

use super::store::VersionedStore;
use crate::infrastructure::ports::{NotificationPreferenceRepo, RepoError, Versioned};

pub struct InMemoryNotificationPreferenceRepo {
    store: VersionedStore<UserId, NotificationPreference>,
}

impl InMemoryNotificationPreferenceRepo {
    pub fn new() -> Self {
        Self {
            store: VersionedStore::new("NotificationPreference"),
        }
    }
}

impl Default for InMemoryNotificationPreferenceRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationPreferenceRepo for InMemoryNotificationPreferenceRepo {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<NotificationPreference>, RepoError> {
        Ok(self.store.get(user_id)?.map(Versioned::into_value))
    }

    async fn find_versioned_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Versioned<NotificationPreference>>, RepoError> {
        self.store.get(user_id)
    }

    async fn save(&self, preference: &NotificationPreference) -> Result<u64, RepoError> {
        self.store.upsert(preference.user_id().clone(), preference)
    }

    async fn save_if_version(
        &self,
        preference: &NotificationPreference,
        expected_version: Option<u64>,
    ) -> Result<u64, RepoError> {
        self.store
            .upsert_if_version(preference.user_id().clone(), preference, expected_version)
    }
}
