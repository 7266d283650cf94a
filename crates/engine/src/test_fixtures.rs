//! Common builders for engine tests.
//!
//! Every builder takes `now` so tests can pair it with a `FixedClock`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use eventia_domain::{
    Event, EventCreateProps, EventId, EventStatus, Money, Ticket, TicketCreateProps, TicketType,
    UserId,
};

use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::ports::ClockPort;

pub fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub fn clock_at(now: DateTime<Utc>) -> Arc<dyn ClockPort> {
    Arc::new(FixedClock(now))
}

/// A draft event starting a week after `now`.
pub fn draft_event(now: DateTime<Utc>, capacity: Option<u32>) -> Event {
    let start = now + Duration::days(7);
    let mut props = EventCreateProps::new(
        "Rust Conf",
        "Talks and workshops",
        start,
        start + Duration::hours(8),
        user("organizer"),
    );
    props.capacity = capacity;
    Event::create(props, now).unwrap()
}

/// A published event starting a week after `now`.
pub fn published_event(now: DateTime<Utc>, capacity: Option<u32>) -> Event {
    draft_event(now, capacity)
        .change_status(EventStatus::Published, now)
        .unwrap()
}

pub fn ticket_props(event_id: EventId, quantity: u32) -> TicketCreateProps {
    TicketCreateProps {
        id: None,
        name: "General Admission".into(),
        description: "Standing area".into(),
        price: Money::new(10, "EUR").unwrap(),
        quantity,
        ticket_type: TicketType::General,
        event_id,
    }
}

pub fn ticket(now: DateTime<Utc>, quantity: u32) -> Ticket {
    Ticket::create(ticket_props(EventId::new(), quantity), now).unwrap()
}
