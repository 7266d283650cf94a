//! Create ticket use case.

use std::sync::Arc;

use eventia_domain::{Ticket, TicketCreateProps};

use crate::infrastructure::ports::{ClockPort, EventRepo, TicketRepo, Versioned};

use super::error::TicketError;

/// Adds a ticket tier to an existing, non-cancelled event.
///
/// The event check lives here rather than in `Ticket`: the tier only knows
/// its event by id and never loads it.
pub struct CreateTicket {
    ticket_repo: Arc<dyn TicketRepo>,
    event_repo: Arc<dyn EventRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CreateTicket {
    pub fn new(
        ticket_repo: Arc<dyn TicketRepo>,
        event_repo: Arc<dyn EventRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            ticket_repo,
            event_repo,
            clock,
        }
    }

    pub async fn execute(
        &self,
        props: TicketCreateProps,
    ) -> Result<Versioned<Ticket>, TicketError> {
        let event_id = props.event_id;
        let event = self
            .event_repo
            .find_by_id(event_id)
            .await?
            .ok_or(TicketError::EventNotFound(event_id))?;
        if event.is_cancelled() {
            tracing::warn!(event_id = %event_id, "Ticket creation rejected: event cancelled");
            return Err(TicketError::EventCancelled(event_id));
        }

        let ticket = Ticket::create(props, self.clock.now()).map_err(|e| {
            tracing::warn!(event_id = %event_id, error = %e, "Ticket creation rejected");
            e
        })?;

        let version = self.ticket_repo.save(&ticket).await?;
        tracing::info!(
            ticket_id = %ticket.id(),
            event_id = %event_id,
            quantity = ticket.quantity(),
            price = %ticket.price(),
            "Ticket tier created"
        );
        Ok(Versioned::new(version, ticket))
    }
}
