//! Per-user notification preferences
//!
//! A two-level matrix: channels are switched on or off globally, and each
//! notification type can be switched off or restricted to an allow-list of
//! channels. The effective delivery set for a type is the intersection.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{codes, DomainError};
use crate::ids::{NotificationPreferenceId, UserId};
use crate::value_objects::{NotificationChannel, NotificationType};

/// Global switch and free-form settings (e.g. quiet hours) for one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPreference {
    pub enabled: bool,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

impl ChannelPreference {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            settings: BTreeMap::new(),
        }
    }
}

/// Switch and optional channel allow-list for one notification type.
///
/// An empty `channels` list means "no restriction".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypePreference {
    pub enabled: bool,
    #[serde(default)]
    pub channels: Vec<NotificationChannel>,
}

impl TypePreference {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            channels: Vec::new(),
        }
    }
}

/// Merge input for [`NotificationPreference::update_channel_preference`].
#[derive(Debug, Clone, Default)]
pub struct ChannelPreferenceUpdate {
    pub enabled: Option<bool>,
    /// Keys are merged into the existing settings; other keys are kept.
    pub settings: BTreeMap<String, String>,
}

/// Merge input for [`NotificationPreference::update_type_preference`].
#[derive(Debug, Clone, Default)]
pub struct TypePreferenceUpdate {
    pub enabled: Option<bool>,
    /// `Some` replaces the allow-list, `Some(vec![])` clears it.
    pub channels: Option<Vec<NotificationChannel>>,
}

/// Overrides applied on top of the defaults at creation.
#[derive(Debug, Clone, Default)]
pub struct NotificationPreferenceOverrides {
    pub channel_preferences: BTreeMap<NotificationChannel, ChannelPreference>,
    pub type_preferences: BTreeMap<NotificationType, TypePreference>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPreference {
    id: NotificationPreferenceId,
    user_id: UserId,
    channel_preferences: BTreeMap<NotificationChannel, ChannelPreference>,
    type_preferences: BTreeMap<NotificationType, TypePreference>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NotificationPreference {
    /// Build preferences for `user_id`: `IN_APP` and `EMAIL` on, `PUSH` and
    /// `SMS` off, every type on without restriction, then `overrides`.
    ///
    /// # Errors
    ///
    /// `DomainError::NotificationPreference` when `user_id` is blank.
    pub fn create(
        user_id: impl Into<String>,
        overrides: NotificationPreferenceOverrides,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let user_id = UserId::new(user_id).map_err(|_| {
            DomainError::notification_preference(
                "Se requiere el identificador de usuario para las preferencias",
            )
            .with_code(codes::PREFERENCE_MISSING_USER)
        })?;

        let mut channel_preferences = default_channel_preferences();
        channel_preferences.extend(overrides.channel_preferences);

        let mut type_preferences = default_type_preferences();
        type_preferences.extend(
            overrides
                .type_preferences
                .into_iter()
                .map(|(kind, pref)| (kind, normalize_type_preference(pref))),
        );

        Ok(Self {
            id: NotificationPreferenceId::new(),
            user_id,
            channel_preferences,
            type_preferences,
            created_at: now,
            updated_at: now,
        })
    }

    /// Default preferences for a user with nothing stored.
    pub fn defaults_for(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: NotificationPreferenceId::new(),
            user_id,
            channel_preferences: default_channel_preferences(),
            type_preferences: default_type_preferences(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn reconstitute(snapshot: NotificationPreferenceSnapshot) -> Self {
        Self {
            id: snapshot.id,
            user_id: snapshot.user_id,
            channel_preferences: snapshot.channel_preferences,
            type_preferences: snapshot.type_preferences,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        }
    }

    pub fn to_snapshot(&self) -> NotificationPreferenceSnapshot {
        NotificationPreferenceSnapshot {
            id: self.id,
            user_id: self.user_id.clone(),
            channel_preferences: self.channel_preferences.clone(),
            type_preferences: self.type_preferences.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> NotificationPreferenceId {
        self.id
    }

    #[inline]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[inline]
    pub fn channel_preferences(&self) -> &BTreeMap<NotificationChannel, ChannelPreference> {
        &self.channel_preferences
    }

    #[inline]
    pub fn type_preferences(&self) -> &BTreeMap<NotificationType, TypePreference> {
        &self.type_preferences
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Channels missing from the matrix fall back to their default.
    pub fn is_channel_enabled(&self, channel: NotificationChannel) -> bool {
        self.channel_preferences
            .get(&channel)
            .map(|p| p.enabled)
            .unwrap_or_else(|| channel.enabled_by_default())
    }

    /// Types missing from the matrix are enabled.
    pub fn is_type_enabled(&self, kind: NotificationType) -> bool {
        self.type_preferences
            .get(&kind)
            .map(|p| p.enabled)
            .unwrap_or(true)
    }

    pub fn is_channel_enabled_for_type(
        &self,
        channel: NotificationChannel,
        kind: NotificationType,
    ) -> bool {
        if !self.is_type_enabled(kind) || !self.is_channel_enabled(channel) {
            return false;
        }
        match self.type_preferences.get(&kind) {
            Some(pref) if !pref.channels.is_empty() => pref.channels.contains(&channel),
            _ => true,
        }
    }

    /// Effective delivery channels for `kind`, in vocabulary order.
    ///
    /// Empty if the type is disabled; otherwise the globally enabled
    /// channels, narrowed by the type's allow-list when it has one.
    pub fn enabled_channels_for_type(&self, kind: NotificationType) -> Vec<NotificationChannel> {
        NotificationChannel::ALL
            .into_iter()
            .filter(|channel| self.is_channel_enabled_for_type(*channel, kind))
            .collect()
    }

    // =========================================================================
    // Mutations (pure merges, always bump updated_at)
    // =========================================================================

    pub fn update_channel_preference(
        &self,
        channel: NotificationChannel,
        update: ChannelPreferenceUpdate,
        now: DateTime<Utc>,
    ) -> Self {
        let mut next = self.clone();
        let entry = next
            .channel_preferences
            .entry(channel)
            .or_insert_with(|| ChannelPreference::new(channel.enabled_by_default()));
        if let Some(enabled) = update.enabled {
            entry.enabled = enabled;
        }
        entry.settings.extend(update.settings);
        next.updated_at = now;
        next
    }

    pub fn update_type_preference(
        &self,
        kind: NotificationType,
        update: TypePreferenceUpdate,
        now: DateTime<Utc>,
    ) -> Self {
        let mut next = self.clone();
        let entry = next
            .type_preferences
            .entry(kind)
            .or_insert_with(|| TypePreference::new(true));
        if let Some(enabled) = update.enabled {
            entry.enabled = enabled;
        }
        if let Some(channels) = update.channels {
            entry.channels = dedup_channels(channels);
        }
        next.updated_at = now;
        next
    }
}

fn default_channel_preferences() -> BTreeMap<NotificationChannel, ChannelPreference> {
    NotificationChannel::ALL
        .into_iter()
        .map(|channel| (channel, ChannelPreference::new(channel.enabled_by_default())))
        .collect()
}

fn default_type_preferences() -> BTreeMap<NotificationType, TypePreference> {
    NotificationType::ALL
        .into_iter()
        .map(|kind| (kind, TypePreference::new(true)))
        .collect()
}

fn normalize_type_preference(pref: TypePreference) -> TypePreference {
    TypePreference {
        enabled: pref.enabled,
        channels: dedup_channels(pref.channels),
    }
}

fn dedup_channels(channels: Vec<NotificationChannel>) -> Vec<NotificationChannel> {
    let mut out = Vec::with_capacity(channels.len());
    for channel in channels {
        if !out.contains(&channel) {
            out.push(channel);
        }
    }
    out
}

// ============================================================================
// Snapshot / Serde
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferenceSnapshot {
    pub id: NotificationPreferenceId,
    pub user_id: UserId,
    #[serde(default)]
    pub channel_preferences: BTreeMap<NotificationChannel, ChannelPreference>,
    #[serde(default)]
    pub type_preferences: BTreeMap<NotificationType, TypePreference>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Serialize for NotificationPreference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_snapshot().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotificationPreference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        NotificationPreferenceSnapshot::deserialize(deserializer)
            .map(NotificationPreference::reconstitute)
    }
}
