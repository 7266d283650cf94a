//! Value objects - Immutable objects defined by their attributes
//!
//! Every value object is valid by construction: constructors return
//! `Result<_, DomainError>` and deserialization goes through the same checks.

mod event_location;
mod event_status;
mod event_tags;
mod money;
mod names;
mod notification;
mod ticket_status;
mod ticket_type;

pub use event_location::{EventLocation, EventLocationProps};
pub use event_status::EventStatus;
pub use event_tags::{EventTags, MAX_TAGS, MAX_TAG_LENGTH};
pub use money::Money;
pub use names::{
    EventDescription, EventTitle, TicketDescription, TicketName, MAX_EVENT_DESCRIPTION_LENGTH,
    MAX_EVENT_TITLE_LENGTH,
};
pub use notification::{NotificationChannel, NotificationType};
pub use ticket_status::TicketStatus;
pub use ticket_type::TicketType;
