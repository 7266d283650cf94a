//! Use cases - User story orchestration.
//!
//! Each module groups the use cases of one aggregate. Every mutation is a
//! versioned read-modify-write driven by [`retry::retry_on_conflict`].

pub mod event;
pub mod notification;
pub mod retry;
pub mod ticket;

pub use event::EventUseCases;
pub use notification::NotificationUseCases;
pub use ticket::TicketUseCases;
