//! Ticket inventory status
//!
//! Only `Available` and `Sold` are driven by `Ticket` methods. The remaining
//! states are reached through external processes (scanning at the door,
//! expiry sweeps, reservations) and are kept so persisted data round-trips.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Available,
    Reserved,
    Sold,
    Used,
    Cancelled,
    Expired,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 6] = [
        Self::Available,
        Self::Reserved,
        Self::Sold,
        Self::Used,
        Self::Cancelled,
        Self::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Reserved => "RESERVED",
            Self::Sold => "SOLD",
            Self::Used => "USED",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Estado de ticket inválido: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_state_round_trips_through_its_token() {
        for status in TicketStatus::ALL {
            assert_eq!(status.to_string().parse::<TicketStatus>().unwrap(), status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn rejects_unknown_or_lowercase() {
        assert!("sold".parse::<TicketStatus>().is_err());
        assert!("REFUNDED".parse::<TicketStatus>().is_err());
    }
}
