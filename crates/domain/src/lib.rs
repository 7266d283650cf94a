//! Eventia domain - events, ticket tiers and notification preferences
//!
//! Pure business rules. Nothing in this crate performs I/O, spawns tasks,
//! reads the wall clock or logs; callers pass `now` explicitly and persist
//! the returned instances themselves.

pub mod aggregates;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::{
    ChannelPreference, ChannelPreferenceUpdate, Event, EventCreateProps, EventSnapshot,
    EventUpdateProps, NotificationPreference, NotificationPreferenceOverrides,
    NotificationPreferenceSnapshot, Ticket, TicketCreateProps, TicketSnapshot, TicketUpdateProps,
    TypePreference, TypePreferenceUpdate,
};

pub use error::{codes, DomainError, DomainErrorKind};

pub use ids::{EventId, NotificationPreferenceId, TicketId, UserId};

pub use value_objects::{
    EventDescription, EventLocation, EventLocationProps, EventStatus, EventTags, EventTitle, Money,
    NotificationChannel, NotificationType, TicketDescription, TicketName, TicketStatus, TicketType,
};
