//! Ticket activate/deactivate use case.

use eventia_domain::{Ticket, TicketId};

use crate::infrastructure::ports::Versioned;

use super::error::TicketError;
use super::TicketWriter;

/// Toggle a tier's active flag. Inactive tiers reject purchases.
pub struct SetTicketActive {
    writer: TicketWriter,
}

impl SetTicketActive {
    pub fn new(writer: TicketWriter) -> Self {
        Self { writer }
    }

    pub async fn execute(
        &self,
        ticket_id: TicketId,
        active: bool,
    ) -> Result<Versioned<Ticket>, TicketError> {
        let operation = if active { "activate_ticket" } else { "deactivate_ticket" };
        let updated = self
            .writer
            .modify(ticket_id, operation, |ticket, now| {
                Ok(if active {
                    ticket.activate(now)
                } else {
                    ticket.deactivate(now)
                })
            })
            .await?;

        tracing::info!(ticket_id = %ticket_id, active, "Ticket active flag changed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::ConflictRetry;
    use crate::infrastructure::ports::MockTicketRepo;
    use crate::test_fixtures::{clock_at, ticket};
    use chrono::Utc;
    use std::sync::Arc;

    #[tokio::test]
    async fn deactivate_persists_flag() {
        let now = Utc::now();
        let tier = ticket(now, 3);
        let id = tier.id();

        let mut repo = MockTicketRepo::new();
        repo.expect_find_versioned()
            .returning(move |_| Ok(Some(Versioned::new(1, tier.clone()))));
        repo.expect_update_if_version()
            .withf(|t, _| !t.is_active())
            .times(1)
            .returning(|_, _| Ok(2));

        let writer = TicketWriter::new(Arc::new(repo), clock_at(now), ConflictRetry::default());
        let updated = SetTicketActive::new(writer).execute(id, false).await.unwrap();

        assert!(!updated.value.is_active());
        assert_eq!(updated.version, 2);
    }
}
