//! Ticket aggregate - a priced inventory tier sold against an event
//!
//! A `Ticket` is a tier (e.g. "General Admission") holding a pool of
//! interchangeable units: `quantity` is the total ever offered and
//! `available_quantity` what is left to sell.
//!
//! The buyer binding (`purchased_by` / `purchased_at`) is a single pair of
//! fields on the tier. It only ever records the most recent purchase; the
//! per-unit ledger lives in ticket issuance records outside this crate.
//!
//! `purchase` is a check-then-act on a shared counter. It must be persisted
//! under a version check (see the engine's compare-and-swap repositories),
//! otherwise two buyers can both observe the last unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{codes, DomainError};
use crate::ids::{EventId, TicketId, UserId};
use crate::value_objects::{Money, TicketDescription, TicketName, TicketStatus, TicketType};

/// Input for [`Ticket::create`].
#[derive(Debug, Clone)]
pub struct TicketCreateProps {
    pub id: Option<TicketId>,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub quantity: u32,
    pub ticket_type: TicketType,
    pub event_id: EventId,
}

/// Partial update for [`Ticket::update`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TicketUpdateProps {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub quantity: Option<u32>,
    pub ticket_type: Option<TicketType>,
}

/// A ticket tier.
///
/// # Invariants
///
/// - `price` is strictly positive
/// - `quantity > 0`
/// - `0 <= available_quantity <= quantity`
/// - `available_quantity` only decreases through `purchase` and only
///   increases through `cancel_purchase` (or a `quantity` revision that
///   keeps the sold count)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    // Identity
    id: TicketId,
    event_id: EventId,

    // Offer
    name: TicketName,
    description: TicketDescription,
    price: Money,
    ticket_type: TicketType,

    // Inventory
    quantity: u32,
    available_quantity: u32,
    status: TicketStatus,

    // Last purchase
    purchased_by: Option<UserId>,
    purchased_at: Option<DateTime<Utc>>,

    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Ticket {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a validated tier with all units available.
    ///
    /// # Errors
    ///
    /// `DomainError::TicketCreate` on an empty name or description, a zero
    /// price or a zero quantity.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use eventia_domain::{EventId, Money, Ticket, TicketCreateProps, TicketType, UserId};
    ///
    /// let now = Utc::now();
    /// let ticket = Ticket::create(
    ///     TicketCreateProps {
    ///         id: None,
    ///         name: "GA".into(),
    ///         description: "General admission".into(),
    ///         price: Money::new(10, "EUR").unwrap(),
    ///         quantity: 1,
    ///         ticket_type: TicketType::create("GENERAL").unwrap(),
    ///         event_id: EventId::new(),
    ///     },
    ///     now,
    /// )
    /// .unwrap();
    ///
    /// let sold = ticket.purchase(UserId::new("x").unwrap(), now).unwrap();
    /// assert_eq!(sold.available_quantity(), 0);
    /// assert!(sold.purchase(UserId::new("y").unwrap(), now).is_err());
    /// ```
    pub fn create(props: TicketCreateProps, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let name =
            TicketName::new(props.name).map_err(|e| e.surfaced_as(DomainError::ticket_create))?;
        let description = TicketDescription::new(props.description)
            .map_err(|e| e.surfaced_as(DomainError::ticket_create))?;
        ensure_positive_price(&props.price, DomainError::ticket_create)?;
        ensure_positive_quantity(props.quantity, DomainError::ticket_create)?;

        Ok(Self {
            id: props.id.unwrap_or_default(),
            event_id: props.event_id,
            name,
            description,
            price: props.price,
            ticket_type: props.ticket_type,
            quantity: props.quantity,
            available_quantity: props.quantity,
            status: TicketStatus::Available,
            purchased_by: None,
            purchased_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate a ticket loaded from storage. No invariants are checked.
    pub fn reconstitute(snapshot: TicketSnapshot) -> Self {
        Self {
            id: snapshot.id,
            event_id: snapshot.event_id,
            name: snapshot.name,
            description: snapshot.description,
            price: snapshot.price,
            ticket_type: snapshot.ticket_type,
            quantity: snapshot.quantity,
            available_quantity: snapshot.available_quantity,
            status: snapshot.status,
            purchased_by: snapshot.purchased_by,
            purchased_at: snapshot.purchased_at,
            is_active: snapshot.is_active,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        }
    }

    pub fn to_snapshot(&self) -> TicketSnapshot {
        TicketSnapshot {
            id: self.id,
            event_id: self.event_id,
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price.clone(),
            ticket_type: self.ticket_type,
            quantity: self.quantity,
            available_quantity: self.available_quantity,
            status: self.status,
            purchased_by: self.purchased_by.clone(),
            purchased_at: self.purchased_at,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> TicketId {
        self.id
    }

    #[inline]
    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    #[inline]
    pub fn name(&self) -> &TicketName {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &TicketDescription {
        &self.description
    }

    #[inline]
    pub fn price(&self) -> &Money {
        &self.price
    }

    #[inline]
    pub fn ticket_type(&self) -> TicketType {
        self.ticket_type
    }

    #[inline]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    #[inline]
    pub fn available_quantity(&self) -> u32 {
        self.available_quantity
    }

    #[inline]
    pub fn status(&self) -> TicketStatus {
        self.status
    }

    #[inline]
    pub fn purchased_by(&self) -> Option<&UserId> {
        self.purchased_by.as_ref()
    }

    #[inline]
    pub fn purchased_at(&self) -> Option<DateTime<Utc>> {
        self.purchased_at
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_available(&self) -> bool {
        self.status == TicketStatus::Available
    }

    pub fn is_purchased(&self) -> bool {
        self.status == TicketStatus::Sold
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == TicketStatus::Cancelled
    }

    pub fn is_sold_out(&self) -> bool {
        self.available_quantity == 0
    }

    /// Units sold so far.
    pub fn sold_count(&self) -> u32 {
        self.quantity.saturating_sub(self.available_quantity)
    }

    /// Gross value of the units sold so far.
    pub fn total_value_sold(&self) -> Result<Money, DomainError> {
        self.price.multiply(self.sold_count())
    }

    // =========================================================================
    // Mutations (each returns a new instance)
    // =========================================================================

    /// Apply a partial update.
    ///
    /// Changing `quantity` by `d` changes `available_quantity` by the same
    /// `d`, so the sold count is preserved.
    ///
    /// # Errors
    ///
    /// `DomainError::TicketUpdate` on an empty name or description, a zero
    /// price, a zero quantity or a quantity below the units already sold.
    pub fn update(
        &self,
        props: TicketUpdateProps,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let mut next = self.clone();

        if let Some(name) = props.name {
            next.name =
                TicketName::new(name).map_err(|e| e.surfaced_as(DomainError::ticket_update))?;
        }
        if let Some(description) = props.description {
            next.description = TicketDescription::new(description)
                .map_err(|e| e.surfaced_as(DomainError::ticket_update))?;
        }
        if let Some(price) = props.price {
            ensure_positive_price(&price, DomainError::ticket_update)?;
            next.price = price;
        }
        if let Some(quantity) = props.quantity {
            ensure_positive_quantity(quantity, DomainError::ticket_update)?;
            let sold = self.sold_count();
            if quantity < sold {
                return Err(DomainError::ticket_update(format!(
                    "La cantidad no puede ser menor que las unidades ya vendidas ({})",
                    sold
                ))
                .with_code(codes::TICKET_QUANTITY_BELOW_SOLD));
            }
            next.quantity = quantity;
            next.available_quantity = quantity - sold;
        }
        if let Some(ticket_type) = props.ticket_type {
            next.ticket_type = ticket_type;
        }

        next.updated_at = now;
        Ok(next)
    }

    /// Sell one unit to `user_id`.
    ///
    /// # Errors
    ///
    /// `DomainError::TicketUpdate` if the tier is inactive, sold out, or not
    /// in `AVAILABLE` status.
    pub fn purchase(&self, user_id: UserId, now: DateTime<Utc>) -> Result<Self, DomainError> {
        self.ensure_active()?;
        if self.available_quantity == 0 {
            return Err(DomainError::ticket_update("No hay tickets disponibles")
                .with_code(codes::TICKET_SOLD_OUT));
        }
        if self.status != TicketStatus::Available {
            return Err(DomainError::ticket_update(format!(
                "El ticket no está disponible para la compra (estado: {})",
                self.status
            ))
            .with_code(codes::TICKET_NOT_AVAILABLE));
        }

        let mut next = self.clone();
        next.available_quantity -= 1;
        next.status = TicketStatus::Sold;
        next.purchased_by = Some(user_id);
        next.purchased_at = Some(now);
        next.updated_at = now;
        Ok(next)
    }

    /// Undo the last purchase, returning one unit to the pool.
    ///
    /// # Errors
    ///
    /// `DomainError::TicketUpdate` if the tier is inactive, not `SOLD`, or
    /// has no sold units to return.
    pub fn cancel_purchase(&self, now: DateTime<Utc>) -> Result<Self, DomainError> {
        self.ensure_active()?;
        if self.status != TicketStatus::Sold {
            return Err(DomainError::ticket_update("Solo se pueden cancelar tickets vendidos")
                .with_code(codes::TICKET_NOT_SOLD));
        }
        if self.available_quantity >= self.quantity {
            return Err(DomainError::ticket_update("No hay unidades vendidas que devolver")
                .with_code(codes::TICKET_NOT_SOLD));
        }

        let mut next = self.clone();
        next.available_quantity += 1;
        next.status = TicketStatus::Available;
        next.purchased_by = None;
        next.purchased_at = None;
        next.updated_at = now;
        Ok(next)
    }

    pub fn activate(&self, now: DateTime<Utc>) -> Self {
        self.with_active(true, now)
    }

    /// Deactivating an inactive ticket returns it unchanged.
    pub fn deactivate(&self, now: DateTime<Utc>) -> Self {
        self.with_active(false, now)
    }

    fn with_active(&self, active: bool, now: DateTime<Utc>) -> Self {
        if self.is_active == active {
            return self.clone();
        }
        let mut next = self.clone();
        next.is_active = active;
        next.updated_at = now;
        next
    }

    fn ensure_active(&self) -> Result<(), DomainError> {
        if !self.is_active {
            return Err(DomainError::ticket_update("El ticket no está activo")
                .with_code(codes::TICKET_INACTIVE));
        }
        Ok(())
    }
}

fn ensure_positive_price(
    price: &Money,
    wrap: fn(String) -> DomainError,
) -> Result<(), DomainError> {
    if !price.is_positive() {
        return Err(wrap("El precio debe ser mayor que cero".to_string()));
    }
    Ok(())
}

fn ensure_positive_quantity(
    quantity: u32,
    wrap: fn(String) -> DomainError,
) -> Result<(), DomainError> {
    if quantity == 0 {
        return Err(wrap("La cantidad debe ser mayor que cero".to_string()));
    }
    Ok(())
}

// ============================================================================
// Snapshot / Serde
// ============================================================================

/// Plain-data form of a [`Ticket`]. The owning event is stored by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSnapshot {
    pub id: TicketId,
    pub event_id: EventId,
    pub name: TicketName,
    pub description: TicketDescription,
    pub price: Money,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub quantity: u32,
    pub available_quantity: u32,
    pub status: TicketStatus,
    pub purchased_by: Option<UserId>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Serialize for Ticket {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_snapshot().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Ticket {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        TicketSnapshot::deserialize(deserializer).map(Ticket::reconstitute)
    }
}

// ============================================================================
// Tests
// ============================================================================
