//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::SystemClock,
    config::EngineConfig,
    memory::{InMemoryEventRepo, InMemoryNotificationPreferenceRepo, InMemoryTicketRepo},
    ports::{ClockPort, EventRepo, NotificationPreferenceRepo, TicketRepo},
};
use crate::use_cases;

/// Main application state.
///
/// Holds the repository ports and the use cases wired over them.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub config: EngineConfig,
}

/// Container for all repository ports.
#[derive(Clone)]
pub struct Repositories {
    pub event: Arc<dyn EventRepo>,
    pub ticket: Arc<dyn TicketRepo>,
    pub notification_preference: Arc<dyn NotificationPreferenceRepo>,
}

impl Repositories {
    /// Process-local repositories backed by `DashMap`.
    pub fn in_memory() -> Self {
        Self {
            event: Arc::new(InMemoryEventRepo::new()),
            ticket: Arc::new(InMemoryTicketRepo::new()),
            notification_preference: Arc::new(InMemoryNotificationPreferenceRepo::new()),
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub event: use_cases::EventUseCases,
    pub ticket: use_cases::TicketUseCases,
    pub notification: use_cases::NotificationUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repositories: Repositories,
        clock: Arc<dyn ClockPort>,
        config: EngineConfig,
    ) -> Self {
        let retry = config.retry_policy();

        let use_cases = UseCases {
            event: use_cases::EventUseCases::new(repositories.event.clone(), clock.clone(), retry),
            ticket: use_cases::TicketUseCases::new(
                repositories.ticket.clone(),
                repositories.event.clone(),
                clock.clone(),
                retry,
            ),
            notification: use_cases::NotificationUseCases::new(
                repositories.notification_preference.clone(),
                clock,
                retry,
            ),
        };

        Self {
            repositories,
            use_cases,
            config,
        }
    }

    /// In-memory repositories and the system clock.
    pub fn in_memory(config: EngineConfig) -> Self {
        Self::new(Repositories::in_memory(), Arc::new(SystemClock::new()), config)
    }
}
