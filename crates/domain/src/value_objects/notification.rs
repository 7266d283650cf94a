//! Notification channel and type vocabulary

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Delivery channel for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationChannel {
    InApp,
    Email,
    Push,
    Sms,
}

impl NotificationChannel {
    pub const ALL: [NotificationChannel; 4] = [Self::InApp, Self::Email, Self::Push, Self::Sms];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InApp => "IN_APP",
            Self::Email => "EMAIL",
            Self::Push => "PUSH",
            Self::Sms => "SMS",
        }
    }

    /// Whether the channel is on for users who never touched their settings.
    pub fn enabled_by_default(&self) -> bool {
        matches!(self, Self::InApp | Self::Email)
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationChannel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(format!("Canal de notificación inválido: {}", s))
            })
    }
}

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    EventCreated,
    EventUpdated,
    EventCancelled,
    EventReminder,
    AttendeeRegistered,
    TicketPurchased,
    TicketCancelled,
    ReviewReceived,
    SystemAnnouncement,
}

impl NotificationType {
    pub const ALL: [NotificationType; 9] = [
        Self::EventCreated,
        Self::EventUpdated,
        Self::EventCancelled,
        Self::EventReminder,
        Self::AttendeeRegistered,
        Self::TicketPurchased,
        Self::TicketCancelled,
        Self::ReviewReceived,
        Self::SystemAnnouncement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EventCreated => "EVENT_CREATED",
            Self::EventUpdated => "EVENT_UPDATED",
            Self::EventCancelled => "EVENT_CANCELLED",
            Self::EventReminder => "EVENT_REMINDER",
            Self::AttendeeRegistered => "ATTENDEE_REGISTERED",
            Self::TicketPurchased => "TICKET_PURCHASED",
            Self::TicketCancelled => "TICKET_CANCELLED",
            Self::ReviewReceived => "REVIEW_RECEIVED",
            Self::SystemAnnouncement => "SYSTEM_ANNOUNCEMENT",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(format!("Tipo de notificación inválido: {}", s))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_defaults() {
        assert!(NotificationChannel::InApp.enabled_by_default());
        assert!(NotificationChannel::Email.enabled_by_default());
        assert!(!NotificationChannel::Push.enabled_by_default());
        assert!(!NotificationChannel::Sms.enabled_by_default());
    }

    #[test]
    fn tokens_match_serde() {
        for channel in NotificationChannel::ALL {
            let json = serde_json::to_string(&channel).unwrap();
            assert_eq!(json, format!("\"{}\"", channel));
        }
        for kind in NotificationType::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
            assert_eq!(kind.as_str().parse::<NotificationType>().unwrap(), kind);
        }
    }
}
