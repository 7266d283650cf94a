//! Unified error types for the domain layer
//!
//! Every aggregate operation fails with a `DomainError`. Value objects raise
//! the low-level `Validation` variant; aggregates wrap those into the
//! operation-specific variant (`EventCreate`, `TicketUpdate`, ...) so callers
//! can tell which operation was rejected without parsing messages.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value object rejected its input (amount, URL, tag, name, ...)
    #[error("{0}")]
    Validation(String),

    /// `Event::create` rejected the input
    #[error("{message}")]
    EventCreate {
        message: String,
        code: Option<&'static str>,
    },

    /// `Event::update`, `cancel` or `change_status` was rejected
    #[error("{message}")]
    EventUpdate {
        message: String,
        code: Option<&'static str>,
    },

    /// An attendee could not be added to or removed from an event
    #[error("{message}")]
    EventAttendance {
        message: String,
        code: Option<&'static str>,
    },

    /// `Ticket::create` rejected the input
    #[error("{message}")]
    TicketCreate {
        message: String,
        code: Option<&'static str>,
    },

    /// `Ticket::update`, `purchase` or `cancel_purchase` was rejected
    #[error("{message}")]
    TicketUpdate {
        message: String,
        code: Option<&'static str>,
    },

    /// Notification preference misuse (missing user, ...)
    #[error("{message}")]
    NotificationPreference {
        message: String,
        code: Option<&'static str>,
    },
}

/// Coarse classification of a [`DomainError`], used by callers that map
/// errors onto transport responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainErrorKind {
    Validation,
    EventCreate,
    EventUpdate,
    EventAttendance,
    TicketCreate,
    TicketUpdate,
    NotificationPreference,
}

impl DomainError {
    /// Creates a validation error for value-object rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if amount.is_sign_negative() {
    ///     return Err(DomainError::validation("El monto no puede ser negativo"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn event_create(msg: impl Into<String>) -> Self {
        Self::EventCreate {
            message: msg.into(),
            code: None,
        }
    }

    pub fn event_update(msg: impl Into<String>) -> Self {
        Self::EventUpdate {
            message: msg.into(),
            code: None,
        }
    }

    pub fn event_attendance(msg: impl Into<String>) -> Self {
        Self::EventAttendance {
            message: msg.into(),
            code: None,
        }
    }

    pub fn ticket_create(msg: impl Into<String>) -> Self {
        Self::TicketCreate {
            message: msg.into(),
            code: None,
        }
    }

    pub fn ticket_update(msg: impl Into<String>) -> Self {
        Self::TicketUpdate {
            message: msg.into(),
            code: None,
        }
    }

    pub fn notification_preference(msg: impl Into<String>) -> Self {
        Self::NotificationPreference {
            message: msg.into(),
            code: None,
        }
    }

    /// Attach a stable machine-readable code.
    ///
    /// `Validation` errors carry no code and are returned unchanged.
    pub fn with_code(self, code: &'static str) -> Self {
        match self {
            Self::Validation(msg) => Self::Validation(msg),
            Self::EventCreate { message, .. } => Self::EventCreate {
                message,
                code: Some(code),
            },
            Self::EventUpdate { message, .. } => Self::EventUpdate {
                message,
                code: Some(code),
            },
            Self::EventAttendance { message, .. } => Self::EventAttendance {
                message,
                code: Some(code),
            },
            Self::TicketCreate { message, .. } => Self::TicketCreate {
                message,
                code: Some(code),
            },
            Self::TicketUpdate { message, .. } => Self::TicketUpdate {
                message,
                code: Some(code),
            },
            Self::NotificationPreference { message, .. } => Self::NotificationPreference {
                message,
                code: Some(code),
            },
        }
    }

    /// Human-readable message, without any prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::EventCreate { message, .. }
            | Self::EventUpdate { message, .. }
            | Self::EventAttendance { message, .. }
            | Self::TicketCreate { message, .. }
            | Self::TicketUpdate { message, .. }
            | Self::NotificationPreference { message, .. } => message,
        }
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Validation(_) => None,
            Self::EventCreate { code, .. }
            | Self::EventUpdate { code, .. }
            | Self::EventAttendance { code, .. }
            | Self::TicketCreate { code, .. }
            | Self::TicketUpdate { code, .. }
            | Self::NotificationPreference { code, .. } => *code,
        }
    }

    pub fn kind(&self) -> DomainErrorKind {
        match self {
            Self::Validation(_) => DomainErrorKind::Validation,
            Self::EventCreate { .. } => DomainErrorKind::EventCreate,
            Self::EventUpdate { .. } => DomainErrorKind::EventUpdate,
            Self::EventAttendance { .. } => DomainErrorKind::EventAttendance,
            Self::TicketCreate { .. } => DomainErrorKind::TicketCreate,
            Self::TicketUpdate { .. } => DomainErrorKind::TicketUpdate,
            Self::NotificationPreference { .. } => DomainErrorKind::NotificationPreference,
        }
    }

    /// Re-wrap a value-object error as the given entity-level kind,
    /// keeping the original message. Entity-level errors pass through.
    pub(crate) fn surfaced_as(self, wrap: fn(String) -> DomainError) -> Self {
        match self {
            Self::Validation(msg) => wrap(msg),
            other => other,
        }
    }
}

/// Stable error codes attached to entity-level errors.
pub mod codes {
    pub const EVENT_CANCELLED: &str = "EVENT_CANCELLED";
    pub const EVENT_INACTIVE: &str = "EVENT_INACTIVE";
    pub const EVENT_ENDED: &str = "EVENT_ENDED";
    pub const EVENT_CAPACITY_FULL: &str = "EVENT_CAPACITY_FULL";
    pub const EVENT_ALREADY_REGISTERED: &str = "EVENT_ALREADY_REGISTERED";
    pub const EVENT_NOT_REGISTERED: &str = "EVENT_NOT_REGISTERED";
    pub const EVENT_INVALID_DATES: &str = "EVENT_INVALID_DATES";
    pub const EVENT_INVALID_CAPACITY: &str = "EVENT_INVALID_CAPACITY";
    pub const TICKET_INACTIVE: &str = "TICKET_INACTIVE";
    pub const TICKET_SOLD_OUT: &str = "TICKET_SOLD_OUT";
    pub const TICKET_NOT_AVAILABLE: &str = "TICKET_NOT_AVAILABLE";
    pub const TICKET_NOT_SOLD: &str = "TICKET_NOT_SOLD";
    pub const TICKET_QUANTITY_BELOW_SOLD: &str = "TICKET_QUANTITY_BELOW_SOLD";
    pub const PREFERENCE_MISSING_USER: &str = "PREFERENCE_MISSING_USER";
}
