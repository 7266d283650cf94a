//! Ticket use cases.
//!
//! Tier creation, edits, purchases and the active flag. Purchases are the
//! contended path: each one is a versioned read-modify-write, so at most one
//! buyer can take any given unit of `available_quantity`.

mod create_ticket;
mod error;
mod purchase;
mod set_active;
mod update_ticket;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use eventia_domain::{DomainError, EventId, Ticket, TicketId, TicketStatus, TicketType, UserId};

use crate::infrastructure::config::ConflictRetry;
use crate::infrastructure::ports::{ClockPort, EventRepo, RepoError, TicketRepo, Versioned};
use crate::use_cases::retry::retry_on_conflict;

pub use create_ticket::CreateTicket;
pub use error::TicketError;
pub use purchase::{CancelTicketPurchase, PurchaseTicket};
pub use set_active::SetTicketActive;
pub use update_ticket::UpdateTicket;

/// Container for ticket use cases.
pub struct TicketUseCases {
    pub create: Arc<CreateTicket>,
    pub update: Arc<UpdateTicket>,
    pub purchase: Arc<PurchaseTicket>,
    pub cancel_purchase: Arc<CancelTicketPurchase>,
    pub set_active: Arc<SetTicketActive>,
    pub ops: Arc<TicketOps>,
}

impl TicketUseCases {
    pub fn new(
        ticket_repo: Arc<dyn TicketRepo>,
        event_repo: Arc<dyn EventRepo>,
        clock: Arc<dyn ClockPort>,
        retry: ConflictRetry,
    ) -> Self {
        let writer = TicketWriter::new(ticket_repo.clone(), clock.clone(), retry);
        Self {
            create: Arc::new(CreateTicket::new(ticket_repo.clone(), event_repo, clock)),
            update: Arc::new(UpdateTicket::new(writer.clone())),
            purchase: Arc::new(PurchaseTicket::new(writer.clone())),
            cancel_purchase: Arc::new(CancelTicketPurchase::new(writer.clone())),
            set_active: Arc::new(SetTicketActive::new(writer)),
            ops: Arc::new(TicketOps::new(ticket_repo)),
        }
    }
}

/// Versioned read-modify-write over a single stored ticket tier.
#[derive(Clone)]
pub struct TicketWriter {
    ticket_repo: Arc<dyn TicketRepo>,
    clock: Arc<dyn ClockPort>,
    retry: ConflictRetry,
}

impl TicketWriter {
    pub fn new(
        ticket_repo: Arc<dyn TicketRepo>,
        clock: Arc<dyn ClockPort>,
        retry: ConflictRetry,
    ) -> Self {
        Self {
            ticket_repo,
            clock,
            retry,
        }
    }

    pub async fn modify<F>(
        &self,
        id: TicketId,
        operation: &'static str,
        change: F,
    ) -> Result<Versioned<Ticket>, TicketError>
    where
        F: Fn(&Ticket, DateTime<Utc>) -> Result<Ticket, DomainError> + Sync,
    {
        let change = &change;
        retry_on_conflict(self.retry, operation, move || {
            self.attempt(id, operation, change)
        })
        .await
    }

    async fn attempt<F>(
        &self,
        id: TicketId,
        operation: &'static str,
        change: &F,
    ) -> Result<Versioned<Ticket>, TicketError>
    where
        F: Fn(&Ticket, DateTime<Utc>) -> Result<Ticket, DomainError> + Sync,
    {
        let current = self
            .ticket_repo
            .find_versioned(id)
            .await?
            .ok_or(TicketError::NotFound(id))?;

        let next = change(&current.value, self.clock.now()).map_err(|e| {
            tracing::warn!(
                ticket_id = %id,
                operation,
                code = e.code().unwrap_or("VALIDATION"),
                available = current.value.available_quantity(),
                error = %e,
                "Ticket change rejected"
            );
            e
        })?;

        let version = self
            .ticket_repo
            .update_if_version(&next, current.version)
            .await?;
        Ok(Versioned::new(version, next))
    }
}

/// Read-side ticket operations and deletion.
pub struct TicketOps {
    ticket_repo: Arc<dyn TicketRepo>,
}

impl TicketOps {
    pub fn new(ticket_repo: Arc<dyn TicketRepo>) -> Self {
        Self { ticket_repo }
    }

    pub async fn get(&self, id: TicketId) -> Result<Option<Ticket>, RepoError> {
        tracing::debug!(ticket_id = %id, "Loading ticket");
        self.ticket_repo.find_by_id(id).await
    }

    pub async fn delete(&self, id: TicketId) -> Result<bool, RepoError> {
        let deleted = self.ticket_repo.delete(id).await?;
        if deleted {
            tracing::info!(ticket_id = %id, "Ticket deleted");
        }
        Ok(deleted)
    }

    pub async fn list_for_event(&self, event_id: EventId) -> Result<Vec<Ticket>, RepoError> {
        tracing::debug!(event_id = %event_id, "Listing tickets for event");
        self.ticket_repo.find_by_event(event_id).await
    }

    pub async fn list_for_buyer(&self, user_id: &UserId) -> Result<Vec<Ticket>, RepoError> {
        tracing::debug!(user_id = %user_id, "Listing tickets for buyer");
        self.ticket_repo.find_by_user(user_id).await
    }

    pub async fn list_by_type(&self, ticket_type: TicketType) -> Result<Vec<Ticket>, RepoError> {
        self.ticket_repo.find_by_type(ticket_type).await
    }

    pub async fn list_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>, RepoError> {
        self.ticket_repo.find_by_status(status).await
    }

    pub async fn list_available(&self) -> Result<Vec<Ticket>, RepoError> {
        self.ticket_repo.find_available().await
    }

    pub async fn list_sold(&self) -> Result<Vec<Ticket>, RepoError> {
        self.ticket_repo.find_sold().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockTicketRepo;

    #[tokio::test]
    async fn ops_list_for_event_passes_through() {
        let event_id = EventId::new();
        let mut repo = MockTicketRepo::new();
        repo.expect_find_by_event()
            .withf(move |id| *id == event_id)
            .times(1)
            .returning(|_| Ok(vec![]));

        let ops = TicketOps::new(Arc::new(repo));
        assert!(ops.list_for_event(event_id).await.unwrap().is_empty());
    }
}
