//! Notification preference use cases.
//!
//! A user without stored preferences behaves as if they had the defaults.
//! The first update materializes those defaults; later updates go through
//! the same versioned read-modify-write as events and tickets.

mod error;
mod preferences;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use eventia_domain::{NotificationPreference, UserId};

use crate::infrastructure::config::ConflictRetry;
use crate::infrastructure::ports::{ClockPort, NotificationPreferenceRepo, Versioned};
use crate::use_cases::retry::retry_on_conflict;

pub use error::NotificationError;
pub use preferences::{
    GetPreferences, ResolveDeliveryChannels, UpdateChannelPreference, UpdateTypePreference,
};

/// Container for notification preference use cases.
pub struct NotificationUseCases {
    pub get_preferences: Arc<GetPreferences>,
    pub update_channel: Arc<UpdateChannelPreference>,
    pub update_type: Arc<UpdateTypePreference>,
    pub resolve_channels: Arc<ResolveDeliveryChannels>,
}

impl NotificationUseCases {
    pub fn new(
        preference_repo: Arc<dyn NotificationPreferenceRepo>,
        clock: Arc<dyn ClockPort>,
        retry: ConflictRetry,
    ) -> Self {
        let get_preferences = Arc::new(GetPreferences::new(preference_repo.clone(), clock.clone()));
        let writer = PreferenceWriter::new(preference_repo, clock, retry);
        Self {
            resolve_channels: Arc::new(ResolveDeliveryChannels::new(get_preferences.clone())),
            get_preferences,
            update_channel: Arc::new(UpdateChannelPreference::new(writer.clone())),
            update_type: Arc::new(UpdateTypePreference::new(writer)),
        }
    }
}

/// Versioned read-modify-write over one user's preferences, starting from
/// the defaults when nothing is stored yet.
#[derive(Clone)]
pub struct PreferenceWriter {
    preference_repo: Arc<dyn NotificationPreferenceRepo>,
    clock: Arc<dyn ClockPort>,
    retry: ConflictRetry,
}

impl PreferenceWriter {
    pub fn new(
        preference_repo: Arc<dyn NotificationPreferenceRepo>,
        clock: Arc<dyn ClockPort>,
        retry: ConflictRetry,
    ) -> Self {
        Self {
            preference_repo,
            clock,
            retry,
        }
    }

    pub async fn modify<F>(
        &self,
        user_id: &UserId,
        operation: &'static str,
        change: F,
    ) -> Result<Versioned<NotificationPreference>, NotificationError>
    where
        F: Fn(&NotificationPreference, DateTime<Utc>) -> NotificationPreference + Sync,
    {
        let change = &change;
        retry_on_conflict(self.retry, operation, move || self.attempt(user_id, change)).await
    }

    async fn attempt<F>(
        &self,
        user_id: &UserId,
        change: &F,
    ) -> Result<Versioned<NotificationPreference>, NotificationError>
    where
        F: Fn(&NotificationPreference, DateTime<Utc>) -> NotificationPreference + Sync,
    {
        let now = self.clock.now();
        let stored = self.preference_repo.find_versioned_by_user(user_id).await?;
        let (current, expected) = match stored {
            Some(stored) => (stored.value, Some(stored.version)),
            None => (NotificationPreference::defaults_for(user_id.clone(), now), None),
        };

        let next = change(&current, now);
        let version = self
            .preference_repo
            .save_if_version(&next, expected)
            .await?;
        Ok(Versioned::new(version, next))
    }
}
