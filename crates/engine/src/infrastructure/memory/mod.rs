//! In-memory adapters for the repository ports.
//!
//! Backed by `DashMap`; suitable for tests, the demo binary and single-node
//! deployments that do not need durability.

mod event_repo;
mod preference_repo;
mod store;
mod ticket_repo;

pub use event_repo::InMemoryEventRepo;
pub use preference_repo::InMemoryNotificationPreferenceRepo;
pub use ticket_repo::InMemoryTicketRepo;
