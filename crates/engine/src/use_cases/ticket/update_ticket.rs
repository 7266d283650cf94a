//! Update ticket use case.

use eventia_domain::{Ticket, TicketId, TicketUpdateProps};

use crate::infrastructure::ports::Versioned;

use super::error::TicketError;
use super::TicketWriter;

/// Applies a partial update to a ticket tier, keeping the sold count.
pub struct UpdateTicket {
    writer: TicketWriter,
}

impl UpdateTicket {
    pub fn new(writer: TicketWriter) -> Self {
        Self { writer }
    }

    pub async fn execute(
        &self,
        ticket_id: TicketId,
        props: TicketUpdateProps,
    ) -> Result<Versioned<Ticket>, TicketError> {
        let updated = self
            .writer
            .modify(ticket_id, "update_ticket", |ticket, now| {
                ticket.update(props.clone(), now)
            })
            .await?;

        tracing::info!(
            ticket_id = %ticket_id,
            version = updated.version,
            quantity = updated.value.quantity(),
            available = updated.value.available_quantity(),
            "Ticket tier updated"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::ConflictRetry;
    use crate::infrastructure::ports::MockTicketRepo;
    use crate::test_fixtures::{clock_at, ticket, user};
    use chrono::Utc;
    use eventia_domain::DomainErrorKind;
    use std::sync::Arc;

    #[tokio::test]
    async fn quantity_increase_keeps_sold_units() {
        let now = Utc::now();
        let sold = ticket(now, 2).purchase(user("x"), now).unwrap();
        let id = sold.id();

        let mut repo = MockTicketRepo::new();
        repo.expect_find_versioned()
            .returning(move |_| Ok(Some(Versioned::new(2, sold.clone()))));
        repo.expect_update_if_version()
            .withf(|t, expected| t.available_quantity() == 4 && *expected == 2)
            .returning(|_, _| Ok(3));

        let writer = TicketWriter::new(Arc::new(repo), clock_at(now), ConflictRetry::default());
        let updated = UpdateTicket::new(writer)
            .execute(
                id,
                TicketUpdateProps {
                    quantity: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.value.sold_count(), 1);
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_without_write() {
        let now = Utc::now();
        let sold = ticket(now, 2).purchase(user("x"), now).unwrap();
        let id = sold.id();

        let mut repo = MockTicketRepo::new();
        repo.expect_find_versioned()
            .returning(move |_| Ok(Some(Versioned::new(2, sold.clone()))));
        repo.expect_update_if_version().never();

        let writer = TicketWriter::new(Arc::new(repo), clock_at(now), ConflictRetry::default());
        let err = UpdateTicket::new(writer)
            .execute(
                id,
                TicketUpdateProps {
                    quantity: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TicketError::Domain(ref e) if e.kind() == DomainErrorKind::TicketUpdate
        ));
    }
}
