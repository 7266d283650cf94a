//! In-memory ticket repository.

use async_trait::async_trait;
use eventia_domain::{EventId, Ticket, TicketId, TicketStatus, TicketType, UserId};

use super::store::VersionedStore;
use crate::infrastructure::ports::{RepoError, TicketRepo, Versioned};

pub struct InMemoryTicketRepo {
    store: VersionedStore<TicketId, Ticket>,
}

impl InMemoryTicketRepo {
    pub fn new() -> Self {
        Self {
            store: VersionedStore::new("Ticket"),
        }
    }

    fn query(&self, predicate: impl Fn(&Ticket) -> bool) -> Result<Vec<Ticket>, RepoError> {
        let mut tickets = self.store.filter(predicate)?;
        tickets.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(tickets)
    }
}

impl Default for InMemoryTicketRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketRepo for InMemoryTicketRepo {
    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>, RepoError> {
        Ok(self.store.get(&id)?.map(Versioned::into_value))
    }

    async fn find_versioned(&self, id: TicketId) -> Result<Option<Versioned<Ticket>>, RepoError> {
        self.store.get(&id)
    }

    async fn save(&self, ticket: &Ticket) -> Result<u64, RepoError> {
        self.store.insert(ticket.id(), ticket)
    }

    async fn update(&self, ticket: &Ticket) -> Result<u64, RepoError> {
        self.store.overwrite(&ticket.id(), ticket)
    }

    async fn update_if_version(
        &self,
        ticket: &Ticket,
        expected_version: u64,
    ) -> Result<u64, RepoError> {
        self.store
            .compare_and_swap(&ticket.id(), ticket, expected_version)
    }

    async fn delete(&self, id: TicketId) -> Result<bool, RepoError> {
        Ok(self.store.remove(&id))
    }

    async fn find_by_event(&self, event_id: EventId) -> Result<Vec<Ticket>, RepoError> {
        self.query(|t| t.event_id() == event_id)
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Ticket>, RepoError> {
        self.query(|t| t.purchased_by() == Some(user_id))
    }

    async fn find_by_type(&self, ticket_type: TicketType) -> Result<Vec<Ticket>, RepoError> {
        self.query(|t| t.ticket_type() == ticket_type)
    }

    async fn find_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>, RepoError> {
        self.query(|t| t.status() == status)
    }

    async fn find_available(&self) -> Result<Vec<Ticket>, RepoError> {
        self.query(|t| t.is_active() && t.is_available() && t.available_quantity() > 0)
    }

    async fn find_sold(&self) -> Result<Vec<Ticket>, RepoError> {
        self.query(Ticket::is_purchased)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use eventia_domain::{Money, TicketCreateProps};

    fn ticket(event_id: EventId, ticket_type: TicketType, quantity: u32) -> Ticket {
        Ticket::create(
            TicketCreateProps {
                id: None,
                name: format!("{} tier", ticket_type),
                description: "Entry".into(),
                price: Money::new(25, "EUR").unwrap(),
                quantity,
                ticket_type,
                event_id,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn conditional_update_rejects_stale_version() {
        let repo = InMemoryTicketRepo::new();
        let ga = ticket(EventId::new(), TicketType::General, 1);
        repo.save(&ga).await.unwrap();

        let buyer = UserId::new("x").unwrap();
        let sold = ga.purchase(buyer, Utc::now()).unwrap();
        assert_eq!(repo.update_if_version(&sold, 1).await.unwrap(), 2);

        let err = repo.update_if_version(&sold, 1).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::VersionConflict {
                entity_type: "Ticket",
                expected: 1,
                actual: 2,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn queries_select_by_inventory_state() {
        let repo = InMemoryTicketRepo::new();
        let event_id = EventId::new();
        let ga = ticket(event_id, TicketType::General, 10);
        let vip = ticket(event_id, TicketType::Vip, 1);
        let other = ticket(EventId::new(), TicketType::Student, 5);
        for t in [&ga, &vip, &other] {
            repo.save(t).await.unwrap();
        }

        let buyer = UserId::new("buyer").unwrap();
        let sold_vip = vip.purchase(buyer.clone(), Utc::now()).unwrap();
        repo.update(&sold_vip).await.unwrap();
        let inactive = other.deactivate(Utc::now());
        repo.update(&inactive).await.unwrap();

        assert_eq!(repo.find_by_event(event_id).await.unwrap().len(), 2);
        assert_eq!(repo.find_by_user(&buyer).await.unwrap(), vec![sold_vip.clone()]);
        assert_eq!(
            repo.find_by_type(TicketType::Student).await.unwrap(),
            vec![inactive]
        );
        assert_eq!(repo.find_available().await.unwrap(), vec![ga.clone()]);
        assert_eq!(repo.find_sold().await.unwrap(), vec![sold_vip.clone()]);
        assert_eq!(
            repo.find_by_status(TicketStatus::Sold).await.unwrap(),
            vec![sold_vip]
        );
    }
}
