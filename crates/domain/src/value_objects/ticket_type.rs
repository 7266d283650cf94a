//! Ticket tier category

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketType {
    General,
    Vip,
    EarlyBird,
    Student,
    Group,
}

impl TicketType {
    pub const ALL: [TicketType; 5] = [
        Self::General,
        Self::Vip,
        Self::EarlyBird,
        Self::Student,
        Self::Group,
    ];

    /// Parse a persisted/API token (`"GENERAL"`, `"EARLY_BIRD"`, ...).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for unknown tokens. Matching is
    /// case-sensitive.
    pub fn create(value: &str) -> Result<Self, DomainError> {
        value.parse()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::Vip => "VIP",
            Self::EarlyBird => "EARLY_BIRD",
            Self::Student => "STUDENT",
            Self::Group => "GROUP",
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Tipo de ticket inválido: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_accepts_known_tokens() {
        assert_eq!(TicketType::create("GENERAL").unwrap(), TicketType::General);
        assert_eq!(TicketType::create("EARLY_BIRD").unwrap(), TicketType::EarlyBird);
    }

    #[test]
    fn create_rejects_unknown_tokens() {
        assert!(TicketType::create("general").is_err());
        assert!(TicketType::create("BACKSTAGE").is_err());
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&TicketType::EarlyBird).unwrap();
        assert_eq!(json, "\"EARLY_BIRD\"");
        let parsed: TicketType = serde_json::from_str("\"VIP\"").unwrap();
        assert_eq!(parsed, TicketType::Vip);
    }
}
