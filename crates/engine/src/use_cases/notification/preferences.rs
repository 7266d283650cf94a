//! Notification preference reads and updates.

use std::sync::Arc;

use eventia_domain::{
    ChannelPreferenceUpdate, NotificationChannel, NotificationPreference, NotificationType,
    TypePreferenceUpdate, UserId,
};

use crate::infrastructure::ports::{ClockPort, NotificationPreferenceRepo, Versioned};

use super::error::NotificationError;
use super::PreferenceWriter;

// =============================================================================
// Reads
// =============================================================================

/// Stored preferences, or the defaults for a user who never changed them.
pub struct GetPreferences {
    preference_repo: Arc<dyn NotificationPreferenceRepo>,
    clock: Arc<dyn ClockPort>,
}

impl GetPreferences {
    pub fn new(
        preference_repo: Arc<dyn NotificationPreferenceRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            preference_repo,
            clock,
        }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
    ) -> Result<NotificationPreference, NotificationError> {
        match self.preference_repo.find_by_user(user_id).await? {
            Some(stored) => Ok(stored),
            None => {
                tracing::debug!(user_id = %user_id, "No stored preferences, using defaults");
                Ok(NotificationPreference::defaults_for(
                    user_id.clone(),
                    self.clock.now(),
                ))
            }
        }
    }
}

/// Channels a notification of a given type should be delivered on.
pub struct ResolveDeliveryChannels {
    get_preferences: Arc<GetPreferences>,
}

impl ResolveDeliveryChannels {
    pub fn new(get_preferences: Arc<GetPreferences>) -> Self {
        Self { get_preferences }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        kind: NotificationType,
    ) -> Result<Vec<NotificationChannel>, NotificationError> {
        let preferences = self.get_preferences.execute(user_id).await?;
        let channels = preferences.enabled_channels_for_type(kind);
        tracing::debug!(
            user_id = %user_id,
            notification_type = %kind,
            channels = channels.len(),
            "Resolved delivery channels"
        );
        Ok(channels)
    }
}

// =============================================================================
// Updates
// =============================================================================

pub struct UpdateChannelPreference {
    writer: PreferenceWriter,
}

impl UpdateChannelPreference {
    pub fn new(writer: PreferenceWriter) -> Self {
        Self { writer }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        channel: NotificationChannel,
        update: ChannelPreferenceUpdate,
    ) -> Result<Versioned<NotificationPreference>, NotificationError> {
        let saved = self
            .writer
            .modify(user_id, "update_channel_preference", |pref, now| {
                pref.update_channel_preference(channel, update.clone(), now)
            })
            .await?;

        tracing::info!(
            user_id = %user_id,
            channel = %channel,
            enabled = saved.value.is_channel_enabled(channel),
            version = saved.version,
            "Channel preference updated"
        );
        Ok(saved)
    }
}

pub struct UpdateTypePreference {
    writer: PreferenceWriter,
}

impl UpdateTypePreference {
    pub fn new(writer: PreferenceWriter) -> Self {
        Self { writer }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        kind: NotificationType,
        update: TypePreferenceUpdate,
    ) -> Result<Versioned<NotificationPreference>, NotificationError> {
        let saved = self
            .writer
            .modify(user_id, "update_type_preference", |pref, now| {
                pref.update_type_preference(kind, update.clone(), now)
            })
            .await?;

        tracing::info!(
            user_id = %user_id,
            notification_type = %kind,
            enabled = saved.value.is_type_enabled(kind),
            version = saved.version,
            "Notification type preference updated"
        );
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::ConflictRetry;
    use crate::infrastructure::ports::{MockNotificationPreferenceRepo, RepoError};
    use crate::test_fixtures::{clock_at, user};
    use chrono::Utc;

    fn writer(repo: MockNotificationPreferenceRepo) -> PreferenceWriter {
        PreferenceWriter::new(Arc::new(repo), clock_at(Utc::now()), ConflictRetry::new(2))
    }

    mod reads {
        use super::*;

        #[tokio::test]
        async fn missing_preferences_resolve_to_defaults() {
            let mut repo = MockNotificationPreferenceRepo::new();
            repo.expect_find_by_user().returning(|_| Ok(None));

            let get = Arc::new(GetPreferences::new(Arc::new(repo), clock_at(Utc::now())));
            let channels = ResolveDeliveryChannels::new(get)
                .execute(&user("u1"), NotificationType::TicketPurchased)
                .await
                .unwrap();

            assert_eq!(
                channels,
                vec![NotificationChannel::InApp, NotificationChannel::Email]
            );
        }

        #[tokio::test]
        async fn stored_preferences_are_returned() {
            let now = Utc::now();
            let stored = NotificationPreference::defaults_for(user("u1"), now)
                .update_type_preference(
                    NotificationType::EventReminder,
                    TypePreferenceUpdate {
                        enabled: Some(false),
                        channels: None,
                    },
                    now,
                );
            let expected = stored.clone();

            let mut repo = MockNotificationPreferenceRepo::new();
            repo.expect_find_by_user()
                .returning(move |_| Ok(Some(stored.clone())));

            let get = Arc::new(GetPreferences::new(Arc::new(repo), clock_at(now)));
            assert_eq!(get.execute(&user("u1")).await.unwrap(), expected);

            let channels = ResolveDeliveryChannels::new(get)
                .execute(&user("u1"), NotificationType::EventReminder)
                .await
                .unwrap();
            assert!(channels.is_empty());
        }
    }

    mod updates {
        use super::*;

        #[tokio::test]
        async fn first_update_materializes_defaults() {
            let mut repo = MockNotificationPreferenceRepo::new();
            repo.expect_find_versioned_by_user().returning(|_| Ok(None));
            repo.expect_save_if_version()
                .withf(|pref, expected| {
                    expected.is_none()
                        && pref.is_channel_enabled(NotificationChannel::Sms)
                        && pref.is_channel_enabled(NotificationChannel::Email)
                })
                .times(1)
                .returning(|_, _| Ok(1));

            let saved = UpdateChannelPreference::new(writer(repo))
                .execute(
                    &user("u1"),
                    NotificationChannel::Sms,
                    ChannelPreferenceUpdate {
                        enabled: Some(true),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            assert_eq!(saved.version, 1);
        }

        #[tokio::test]
        async fn concurrent_first_update_retries_against_stored_row() {
            let now = Utc::now();
            let stored = NotificationPreference::defaults_for(user("u1"), now);

            let mut repo = MockNotificationPreferenceRepo::new();
            let mut seq = mockall::Sequence::new();
            repo.expect_find_versioned_by_user()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(None));
            repo.expect_save_if_version()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|pref, _| {
                    Err(RepoError::version_conflict(
                        "NotificationPreference",
                        pref.user_id(),
                        0,
                        1,
                    ))
                });
            repo.expect_find_versioned_by_user()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| Ok(Some(Versioned::new(1, stored.clone()))));
            repo.expect_save_if_version()
                .withf(|_, expected| *expected == Some(1))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(2));

            let saved = UpdateTypePreference::new(writer(repo))
                .execute(
                    &user("u1"),
                    NotificationType::SystemAnnouncement,
                    TypePreferenceUpdate {
                        enabled: None,
                        channels: Some(vec![NotificationChannel::InApp]),
                    },
                )
                .await
                .unwrap();

            assert_eq!(saved.version, 2);
            assert_eq!(
                saved
                    .value
                    .enabled_channels_for_type(NotificationType::SystemAnnouncement),
                vec![NotificationChannel::InApp]
            );
        }

        #[tokio::test]
        async fn persistent_conflicts_give_up() {
            let mut repo = MockNotificationPreferenceRepo::new();
            repo.expect_find_versioned_by_user()
                .times(3)
                .returning(|_| Ok(None));
            repo.expect_save_if_version()
                .times(3)
                .returning(|pref, _| {
                    Err(RepoError::version_conflict(
                        "NotificationPreference",
                        pref.user_id(),
                        0,
                        1,
                    ))
                });

            let err = UpdateChannelPreference::new(writer(repo))
                .execute(
                    &user("u1"),
                    NotificationChannel::Push,
                    ChannelPreferenceUpdate::default(),
                )
                .await
                .unwrap_err();

            assert!(matches!(err, NotificationError::ConcurrencyConflict { attempts: 3 }));
        }
    }
}
