//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Has a unique identity
//! - Keeps its fields private and exposes behavior through methods
//! - Never mutates in place: every state change returns a new instance
//! - Takes the current time as an argument instead of reading a clock
//!
//! # Rustic DDD Principles
//!
//! | Classic DDD Pattern | Rustic Equivalent |
//! |------------------|-------------------|
//! | Private fields + getters | Newtypes valid by construction |
//! | Value Object immutability | `#[derive(Clone)]` + no `&mut` methods |
//! | Factory pattern | `::create(props, now)` returning `Result` |
//! | Repository hydration | `::reconstitute(snapshot)` without validation |
//!
//! Aggregates reference each other by id only. A `Ticket` knows its
//! `EventId`; it never loads or mutates the `Event`.

pub mod event;
pub mod notification_preference;
pub mod ticket;

pub use event::{Event, EventCreateProps, EventSnapshot, EventUpdateProps};
pub use notification_preference::{
    ChannelPreference, ChannelPreferenceUpdate, NotificationPreference,
    NotificationPreferenceOverrides, NotificationPreferenceSnapshot, TypePreference,
    TypePreferenceUpdate,
};
pub use ticket::{Ticket, TicketCreateProps, TicketSnapshot, TicketUpdateProps};
