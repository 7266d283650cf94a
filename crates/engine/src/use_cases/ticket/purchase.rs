//! Ticket purchase and purchase cancellation.
//!
//! Both run through [`TicketWriter`], so concurrent buyers of the last unit
//! are serialized by the version check: exactly one write lands, every other
//! buyer reloads and is rejected by the domain.

use eventia_domain::{Ticket, TicketId, UserId};

use crate::infrastructure::ports::Versioned;

use super::error::TicketError;
use super::TicketWriter;

pub struct PurchaseTicket {
    writer: TicketWriter,
}

impl PurchaseTicket {
    pub fn new(writer: TicketWriter) -> Self {
        Self { writer }
    }

    /// Sell one unit of the tier to `user_id`.
    ///
    /// # Returns
    /// * `Ok(Versioned<Ticket>)` - The stored tier after the sale
    /// * `Err(TicketError::Domain)` - Inactive, sold out, or not available
    /// * `Err(TicketError::ConcurrencyConflict)` - Lost the race on every attempt
    pub async fn execute(
        &self,
        ticket_id: TicketId,
        user_id: UserId,
    ) -> Result<Versioned<Ticket>, TicketError> {
        let sold = self
            .writer
            .modify(ticket_id, "purchase_ticket", |ticket, now| {
                ticket.purchase(user_id.clone(), now)
            })
            .await?;

        tracing::info!(
            ticket_id = %ticket_id,
            user_id = %user_id,
            version = sold.version,
            available = sold.value.available_quantity(),
            "Ticket purchased"
        );
        Ok(sold)
    }
}

pub struct CancelTicketPurchase {
    writer: TicketWriter,
}

impl CancelTicketPurchase {
    pub fn new(writer: TicketWriter) -> Self {
        Self { writer }
    }

    pub async fn execute(&self, ticket_id: TicketId) -> Result<Versioned<Ticket>, TicketError> {
        let restored = self
            .writer
            .modify(ticket_id, "cancel_ticket_purchase", |ticket, now| {
                ticket.cancel_purchase(now)
            })
            .await?;

        tracing::info!(
            ticket_id = %ticket_id,
            version = restored.version,
            available = restored.value.available_quantity(),
            "Ticket purchase cancelled"
        );
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::ConflictRetry;
    use crate::infrastructure::ports::{MockTicketRepo, RepoError};
    use crate::test_fixtures::{clock_at, ticket, user};
    use chrono::Utc;
    use eventia_domain::{codes, TicketStatus};
    use std::sync::Arc;

    fn writer(repo: MockTicketRepo, retries: u32) -> TicketWriter {
        TicketWriter::new(Arc::new(repo), clock_at(Utc::now()), ConflictRetry::new(retries))
    }

    #[tokio::test]
    async fn purchase_of_last_unit_marks_sold() {
        let now = Utc::now();
        let tier = ticket(now, 1);
        let id = tier.id();

        let mut repo = MockTicketRepo::new();
        repo.expect_find_versioned()
            .returning(move |_| Ok(Some(Versioned::new(1, tier.clone()))));
        repo.expect_update_if_version()
            .withf(|t, expected| t.available_quantity() == 0 && *expected == 1)
            .times(1)
            .returning(|_, _| Ok(2));

        let sold = PurchaseTicket::new(writer(repo, 3))
            .execute(id, user("buyer"))
            .await
            .unwrap();

        assert_eq!(sold.version, 2);
        assert_eq!(sold.value.status(), TicketStatus::Sold);
        assert_eq!(sold.value.purchased_by(), Some(&user("buyer")));
    }

    #[tokio::test]
    async fn second_buyer_of_single_unit_is_told_sold_out() {
        let now = Utc::now();
        let open = ticket(now, 1);
        let id = open.id();
        let taken = open.purchase(user("first"), now).unwrap();

        let mut repo = MockTicketRepo::new();
        let mut seq = mockall::Sequence::new();
        let first = open.clone();
        repo.expect_find_versioned()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(Versioned::new(1, first.clone()))));
        repo.expect_update_if_version()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|t, expected| {
                Err(RepoError::version_conflict("Ticket", t.id(), expected, 2))
            });
        repo.expect_find_versioned()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(Versioned::new(2, taken.clone()))));

        let err = PurchaseTicket::new(writer(repo, 3))
            .execute(id, user("second"))
            .await
            .unwrap_err();

        assert_eq!(err.domain_code(), Some(codes::TICKET_SOLD_OUT));
    }

    #[tokio::test]
    async fn conflict_is_retried_until_write_lands() {
        let now = Utc::now();
        let tier = ticket(now, 5);
        let id = tier.id();

        let mut repo = MockTicketRepo::new();
        repo.expect_find_versioned()
            .times(2)
            .returning(move |_| Ok(Some(Versioned::new(7, tier.clone()))));
        let mut seq = mockall::Sequence::new();
        repo.expect_update_if_version()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|t, expected| {
                Err(RepoError::version_conflict("Ticket", t.id(), expected, 8))
            });
        repo.expect_update_if_version()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(8));

        let sold = PurchaseTicket::new(writer(repo, 3))
            .execute(id, user("buyer"))
            .await
            .unwrap();

        assert_eq!(sold.version, 8);
        assert_eq!(sold.value.available_quantity(), 4);
    }

    #[tokio::test]
    async fn persistent_conflicts_exhaust_retries() {
        let now = Utc::now();
        let tier = ticket(now, 5);
        let id = tier.id();

        let mut repo = MockTicketRepo::new();
        repo.expect_find_versioned()
            .times(3)
            .returning(move |_| Ok(Some(Versioned::new(1, tier.clone()))));
        repo.expect_update_if_version()
            .times(3)
            .returning(|t, expected| {
                Err(RepoError::version_conflict("Ticket", t.id(), expected, expected + 1))
            });

        let err = PurchaseTicket::new(writer(repo, 2))
            .execute(id, user("buyer"))
            .await
            .unwrap_err();

        assert!(matches!(err, TicketError::ConcurrencyConflict { attempts: 3 }));
    }

    #[tokio::test]
    async fn inactive_tier_is_rejected_without_retry() {
        let now = Utc::now();
        let tier = ticket(now, 5).deactivate(now);
        let id = tier.id();

        let mut repo = MockTicketRepo::new();
        repo.expect_find_versioned()
            .times(1)
            .returning(move |_| Ok(Some(Versioned::new(1, tier.clone()))));
        repo.expect_update_if_version().never();

        let err = PurchaseTicket::new(writer(repo, 5))
            .execute(id, user("buyer"))
            .await
            .unwrap_err();

        assert_eq!(err.domain_code(), Some(codes::TICKET_INACTIVE));
    }

    #[tokio::test]
    async fn missing_tier_is_not_found() {
        let id = TicketId::new();
        let mut repo = MockTicketRepo::new();
        repo.expect_find_versioned().returning(|_| Ok(None));

        let err = PurchaseTicket::new(writer(repo, 1))
            .execute(id, user("buyer"))
            .await
            .unwrap_err();

        assert!(matches!(err, TicketError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn cancel_purchase_returns_unit() {
        let now = Utc::now();
        let sold = ticket(now, 1).purchase(user("buyer"), now).unwrap();
        let id = sold.id();

        let mut repo = MockTicketRepo::new();
        repo.expect_find_versioned()
            .returning(move |_| Ok(Some(Versioned::new(2, sold.clone()))));
        repo.expect_update_if_version().returning(|_, _| Ok(3));

        let restored = CancelTicketPurchase::new(writer(repo, 1))
            .execute(id)
            .await
            .unwrap();

        assert_eq!(restored.value.available_quantity(), 1);
        assert_eq!(restored.value.status(), TicketStatus::Available);
        assert!(restored.value.purchased_by().is_none());
    }

    #[tokio::test]
    async fn cancel_unsold_tier_is_rejected() {
        let now = Utc::now();
        let tier = ticket(now, 1);
        let id = tier.id();

        let mut repo = MockTicketRepo::new();
        repo.expect_find_versioned()
            .returning(move |_| Ok(Some(Versioned::new(1, tier.clone()))));
        repo.expect_update_if_version().never();

        let err = CancelTicketPurchase::new(writer(repo, 1))
            .execute(id)
            .await
            .unwrap_err();

        assert_eq!(err.domain_code(), Some(codes::TICKET_NOT_SOLD));
    }
}
