//! Event aggregate - a scheduled event with its attendee roster
//!
//! # Design
//!
//! - **Private fields**: state is only reachable through accessors
//! - **Validated construction**: `create()` checks every invariant;
//!   `reconstitute()` rehydrates trusted persisted state without re-checking
//! - **Immutable updates**: every mutation returns a new `Event`, so a
//!   rejected operation can never leave a half-applied change behind
//! - **Injected time**: operations that depend on "now" take it as an
//!   argument
//!
//! The aggregate does not know about tickets. Ticket inventory and the
//! attendee roster are enforced independently; keeping them consistent with
//! each other is the job of an orchestrating use case.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{codes, DomainError};
use crate::ids::{EventId, UserId};
use crate::value_objects::{
    EventDescription, EventLocation, EventLocationProps, EventStatus, EventTags, EventTitle,
};

/// Input for [`Event::create`].
///
/// Text, tags and location are raw so that their validation failures surface
/// as `DomainError::EventCreate`.
#[derive(Debug, Clone)]
pub struct EventCreateProps {
    /// Present when re-creating a known event; skips the "starts in the
    /// future" check.
    pub id: Option<EventId>,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<EventLocationProps>,
    pub organizer_id: UserId,
    /// `None` means unlimited.
    pub capacity: Option<u32>,
    pub attendees: Vec<UserId>,
    pub status: Option<EventStatus>,
    pub tags: Vec<String>,
}

impl EventCreateProps {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        organizer_id: UserId,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            start_date,
            end_date,
            location: None,
            organizer_id,
            capacity: None,
            attendees: Vec::new(),
            status: None,
            tags: Vec::new(),
        }
    }
}

/// Partial update for [`Event::update`]. `None` leaves a field untouched.
///
/// `location` and `capacity` are doubly optional: `Some(None)` clears the
/// location or makes the event unlimited.
#[derive(Debug, Clone, Default)]
pub struct EventUpdateProps {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<Option<EventLocationProps>>,
    pub capacity: Option<Option<u32>>,
    pub tags: Option<Vec<String>>,
}

/// A scheduled event.
///
/// # Invariants
///
/// - `attendees.len() <= capacity` whenever `capacity` is set
/// - `end_date >= start_date`
/// - no duplicate attendees
/// - a cancelled event accepts no further content changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    // Identity
    id: EventId,

    // Content
    title: EventTitle,
    description: EventDescription,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    location: Option<EventLocation>,
    tags: EventTags,

    // Ownership and roster
    organizer_id: UserId,
    capacity: Option<u32>,
    attendees: Vec<UserId>,

    // Lifecycle
    status: EventStatus,
    is_active: bool,

    // Timestamps
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Event {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a validated event.
    ///
    /// Defaults: fresh id when none is given, `status = DRAFT`,
    /// `is_active = true`, both timestamps set to `now`.
    ///
    /// # Errors
    ///
    /// `DomainError::EventCreate` when the title is empty, a text field is
    /// too long, a new event does not start after `now`, the end precedes the
    /// start, the capacity is zero, attendees repeat or exceed the capacity,
    /// or the location / tags are invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{Duration, Utc};
    /// use eventia_domain::{Event, EventCreateProps, UserId};
    ///
    /// let now = Utc::now();
    /// let mut props = EventCreateProps::new(
    ///     "Conf",
    ///     "Annual conference",
    ///     now + Duration::days(7),
    ///     now + Duration::days(8),
    ///     UserId::new("u1").unwrap(),
    /// );
    /// props.capacity = Some(2);
    ///
    /// let event = Event::create(props, now).unwrap();
    /// assert!(event.has_available_capacity());
    /// ```
    pub fn create(props: EventCreateProps, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let title =
            EventTitle::new(props.title).map_err(|e| e.surfaced_as(DomainError::event_create))?;
        let description = EventDescription::new(props.description)
            .map_err(|e| e.surfaced_as(DomainError::event_create))?;

        if props.id.is_none() && props.start_date <= now {
            return Err(
                DomainError::event_create("La fecha de inicio debe ser posterior a la actual")
                    .with_code(codes::EVENT_INVALID_DATES),
            );
        }
        ensure_dates(props.start_date, props.end_date, DomainError::event_create)?;

        if let Some(capacity) = props.capacity {
            ensure_positive_capacity(capacity, DomainError::event_create)?;
        }

        let mut seen = HashSet::with_capacity(props.attendees.len());
        if !props.attendees.iter().all(|a| seen.insert(a)) {
            return Err(DomainError::event_create(
                "La lista de asistentes contiene duplicados",
            ));
        }
        if let Some(capacity) = props.capacity {
            if props.attendees.len() > capacity as usize {
                return Err(DomainError::event_create(
                    "El número de asistentes excede la capacidad del evento",
                )
                .with_code(codes::EVENT_INVALID_CAPACITY));
            }
        }

        let location = props
            .location
            .map(EventLocation::new)
            .transpose()
            .map_err(|e| e.surfaced_as(DomainError::event_create))?;
        let tags =
            EventTags::new(&props.tags).map_err(|e| e.surfaced_as(DomainError::event_create))?;

        Ok(Self {
            id: props.id.unwrap_or_default(),
            title,
            description,
            start_date: props.start_date,
            end_date: props.end_date,
            location,
            tags,
            organizer_id: props.organizer_id,
            capacity: props.capacity,
            attendees: props.attendees,
            status: props.status.unwrap_or_default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate an event loaded from storage. No invariants are checked.
    pub fn reconstitute(snapshot: EventSnapshot) -> Self {
        Self {
            id: snapshot.id,
            title: snapshot.title,
            description: snapshot.description,
            start_date: snapshot.start_date,
            end_date: snapshot.end_date,
            location: snapshot.location,
            tags: snapshot.tags,
            organizer_id: snapshot.organizer_id,
            capacity: snapshot.capacity,
            attendees: snapshot.attendees,
            status: snapshot.status,
            is_active: snapshot.is_active,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        }
    }

    /// Complete plain-data copy of the aggregate, the inverse of
    /// [`Event::reconstitute`].
    pub fn to_snapshot(&self) -> EventSnapshot {
        EventSnapshot {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            location: self.location.clone(),
            tags: self.tags.clone(),
            organizer_id: self.organizer_id.clone(),
            capacity: self.capacity,
            attendees: self.attendees.clone(),
            status: self.status,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> EventId {
        self.id
    }

    #[inline]
    pub fn title(&self) -> &EventTitle {
        &self.title
    }

    #[inline]
    pub fn description(&self) -> &EventDescription {
        &self.description
    }

    #[inline]
    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    #[inline]
    pub fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }

    #[inline]
    pub fn location(&self) -> Option<&EventLocation> {
        self.location.as_ref()
    }

    #[inline]
    pub fn tags(&self) -> &EventTags {
        &self.tags
    }

    #[inline]
    pub fn organizer_id(&self) -> &UserId {
        &self.organizer_id
    }

    #[inline]
    pub fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    /// Attendees in registration order.
    #[inline]
    pub fn attendees(&self) -> &[UserId] {
        &self.attendees
    }

    #[inline]
    pub fn status(&self) -> EventStatus {
        self.status
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

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.end_date < now
    }

    pub fn has_available_capacity(&self) -> bool {
        match self.capacity {
            None => true,
            Some(capacity) => self.attendees.len() < capacity as usize,
        }
    }

    /// Free places left; `None` for unlimited events.
    pub fn remaining_capacity(&self) -> Option<u32> {
        self.capacity
            .map(|capacity| capacity.saturating_sub(self.attendee_count()))
    }

    pub fn attendee_count(&self) -> u32 {
        u32::try_from(self.attendees.len()).unwrap_or(u32::MAX)
    }

    pub fn is_attendee(&self, user_id: &UserId) -> bool {
        self.attendees.contains(user_id)
    }

    pub fn is_organized_by(&self, user_id: &UserId) -> bool {
        &self.organizer_id == user_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.is_cancelled()
    }

    pub fn is_published(&self) -> bool {
        self.status.is_published()
    }

    pub fn duration(&self) -> Duration {
        self.end_date - self.start_date
    }

    /// Identity comparison, as opposed to `==` which compares full state.
    pub fn has_same_identity(&self, other: &Event) -> bool {
        self.id == other.id
    }

    // =========================================================================
    // Mutations (each returns a new instance)
    // =========================================================================

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// `DomainError::EventUpdate` if the event is cancelled, a provided field
    /// is invalid, the resulting dates are inverted, or the new capacity is
    /// below the current attendee count.
    pub fn update(&self, props: EventUpdateProps, now: DateTime<Utc>) -> Result<Self, DomainError> {
        self.ensure_not_cancelled(DomainError::event_update)?;

        let mut next = self.clone();

        if let Some(title) = props.title {
            next.title =
                EventTitle::new(title).map_err(|e| e.surfaced_as(DomainError::event_update))?;
        }
        if let Some(description) = props.description {
            next.description = EventDescription::new(description)
                .map_err(|e| e.surfaced_as(DomainError::event_update))?;
        }
        if let Some(start_date) = props.start_date {
            next.start_date = start_date;
        }
        if let Some(end_date) = props.end_date {
            next.end_date = end_date;
        }
        ensure_dates(next.start_date, next.end_date, DomainError::event_update)?;

        if let Some(location) = props.location {
            next.location = location
                .map(EventLocation::new)
                .transpose()
                .map_err(|e| e.surfaced_as(DomainError::event_update))?;
        }
        if let Some(capacity) = props.capacity {
            if let Some(capacity) = capacity {
                ensure_positive_capacity(capacity, DomainError::event_update)?;
                if (capacity as usize) < self.attendees.len() {
                    return Err(DomainError::event_update(format!(
                        "La capacidad no puede ser menor que el número de asistentes actuales ({})",
                        self.attendees.len()
                    ))
                    .with_code(codes::EVENT_INVALID_CAPACITY));
                }
            }
            next.capacity = capacity;
        }
        if let Some(tags) = props.tags {
            next.tags =
                EventTags::new(&tags).map_err(|e| e.surfaced_as(DomainError::event_update))?;
        }

        next.updated_at = now;
        Ok(next)
    }

    /// Register a user.
    ///
    /// # Errors
    ///
    /// `DomainError::EventAttendance` if the event is cancelled, inactive or
    /// over, the user is already registered, or capacity is exhausted.
    pub fn add_attendee(&self, user_id: UserId, now: DateTime<Utc>) -> Result<Self, DomainError> {
        self.ensure_not_cancelled(DomainError::event_attendance)?;
        if !self.is_active {
            return Err(DomainError::event_attendance("El evento no está activo")
                .with_code(codes::EVENT_INACTIVE));
        }
        if self.has_ended(now) {
            return Err(DomainError::event_attendance("El evento ya ha finalizado")
                .with_code(codes::EVENT_ENDED));
        }
        if self.is_attendee(&user_id) {
            return Err(
                DomainError::event_attendance("El usuario ya está registrado en el evento")
                    .with_code(codes::EVENT_ALREADY_REGISTERED),
            );
        }
        if !self.has_available_capacity() {
            return Err(
                DomainError::event_attendance("El evento ha alcanzado su capacidad máxima")
                    .with_code(codes::EVENT_CAPACITY_FULL),
            );
        }

        let mut next = self.clone();
        next.attendees.push(user_id);
        next.updated_at = now;
        Ok(next)
    }

    /// Unregister a user.
    ///
    /// # Errors
    ///
    /// `DomainError::EventAttendance` if the event is cancelled or the user
    /// is not registered.
    pub fn remove_attendee(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        self.ensure_not_cancelled(DomainError::event_attendance)?;
        if !self.is_attendee(user_id) {
            return Err(
                DomainError::event_attendance("El usuario no está registrado en el evento")
                    .with_code(codes::EVENT_NOT_REGISTERED),
            );
        }

        let mut next = self.clone();
        next.attendees.retain(|a| a != user_id);
        next.updated_at = now;
        Ok(next)
    }

    /// Cancel the event. Cancelling a cancelled event is a no-op.
    pub fn cancel(&self, now: DateTime<Utc>) -> Self {
        if self.is_cancelled() {
            return self.clone();
        }
        let mut next = self.clone();
        next.status = EventStatus::Cancelled;
        next.updated_at = now;
        next
    }

    /// Set the status directly.
    ///
    /// Status policy lives in the use-case layer; the only rule enforced here
    /// is that a cancelled event cannot be moved to another status.
    ///
    /// # Errors
    ///
    /// `DomainError::EventUpdate` when leaving `CANCELLED`.
    pub fn change_status(
        &self,
        status: EventStatus,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if status == self.status {
            return Ok(self.clone());
        }
        self.ensure_not_cancelled(DomainError::event_update)?;

        let mut next = self.clone();
        next.status = status;
        next.updated_at = now;
        Ok(next)
    }

    pub fn activate(&self, now: DateTime<Utc>) -> Self {
        self.with_active(true, now)
    }

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

    fn ensure_not_cancelled(&self, wrap: fn(String) -> DomainError) -> Result<(), DomainError> {
        if self.is_cancelled() {
            return Err(
                wrap("El evento está cancelado".to_string()).with_code(codes::EVENT_CANCELLED)
            );
        }
        Ok(())
    }
}

fn ensure_dates(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    wrap: fn(String) -> DomainError,
) -> Result<(), DomainError> {
    if end < start {
        return Err(
            wrap("La fecha de fin no puede ser anterior a la fecha de inicio".to_string())
                .with_code(codes::EVENT_INVALID_DATES),
        );
    }
    Ok(())
}

fn ensure_positive_capacity(
    capacity: u32,
    wrap: fn(String) -> DomainError,
) -> Result<(), DomainError> {
    if capacity == 0 {
        return Err(wrap("La capacidad debe ser mayor que cero".to_string())
            .with_code(codes::EVENT_INVALID_CAPACITY));
    }
    Ok(())
}

// ============================================================================
// Snapshot / Serde
// ============================================================================

/// Plain-data form of an [`Event`], as handed to persistence adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    pub id: EventId,
    pub title: EventTitle,
    pub description: EventDescription,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<EventLocation>,
    #[serde(default)]
    pub tags: EventTags,
    pub organizer_id: UserId,
    pub capacity: Option<u32>,
    #[serde(default)]
    pub attendees: Vec<UserId>,
    pub status: EventStatus,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Serialize for Event {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_snapshot().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        EventSnapshot::deserialize(deserializer).map(Event::reconstitute)
    }
}

// ============================================================================
// Tests
// ============================================================================
