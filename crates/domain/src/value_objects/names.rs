//! Validated text newtypes for event and ticket fields
//!
//! These newtypes ensure that text fields are valid by construction:
//! - Trimmed of leading/trailing whitespace
//! - Non-empty where the field is mandatory
//! - Within length limits (counted in characters, not bytes)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for event titles
pub const MAX_EVENT_TITLE_LENGTH: usize = 100;

/// Maximum length for event descriptions
pub const MAX_EVENT_DESCRIPTION_LENGTH: usize = 2000;

macro_rules! text_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Returns the text as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

text_newtype!(
    /// A validated event title (non-empty, <=100 chars, trimmed)
    EventTitle
);

impl EventTitle {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the title is empty after trimming
    /// or longer than 100 characters.
    pub fn new(title: impl Into<String>) -> Result<Self, DomainError> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("El título es obligatorio"));
        }
        if trimmed.chars().count() > MAX_EVENT_TITLE_LENGTH {
            return Err(DomainError::validation(format!(
                "El título no puede exceder {} caracteres",
                MAX_EVENT_TITLE_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }
}

text_newtype!(
    /// A validated event description (<=2000 chars, trimmed, may be empty)
    EventDescription
);

impl EventDescription {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if longer than 2000 characters.
    pub fn new(description: impl Into<String>) -> Result<Self, DomainError> {
        let description = description.into();
        let trimmed = description.trim();
        if trimmed.chars().count() > MAX_EVENT_DESCRIPTION_LENGTH {
            return Err(DomainError::validation(format!(
                "La descripción no puede exceder {} caracteres",
                MAX_EVENT_DESCRIPTION_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

text_newtype!(
    /// A validated ticket tier name (non-empty, trimmed)
    TicketName
);

impl TicketName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("El nombre del ticket es obligatorio"));
        }
        Ok(Self(trimmed.to_string()))
    }
}

text_newtype!(
    /// A validated ticket tier description (non-empty, trimmed)
    TicketDescription
);

impl TicketDescription {
    pub fn new(description: impl Into<String>) -> Result<Self, DomainError> {
        let description = description.into();
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation(
                "La descripción del ticket es obligatoria",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed_and_required() {
        assert_eq!(EventTitle::new("  Conf ").unwrap().as_str(), "Conf");
        assert!(EventTitle::new("   ").is_err());
    }

    #[test]
    fn title_length_counts_characters() {
        let accented = "é".repeat(100);
        assert!(EventTitle::new(accented).is_ok());
        assert!(EventTitle::new("a".repeat(101)).is_err());
    }

    #[test]
    fn description_may_be_empty_but_bounded() {
        assert!(EventDescription::new("").unwrap().is_empty());
        assert!(EventDescription::new("d".repeat(2000)).is_ok());
        assert!(EventDescription::new("d".repeat(2001)).is_err());
    }

    #[test]
    fn ticket_texts_are_required() {
        assert!(TicketName::new("GA").is_ok());
        assert!(TicketName::new(" ").is_err());
        assert!(TicketDescription::new("").is_err());
    }

    #[test]
    fn deserialize_validates() {
        assert!(serde_json::from_str::<EventTitle>("\"\"").is_err());
        let title: EventTitle = serde_json::from_str("\" Gala \"").unwrap();
        assert_eq!(title.as_str(), "Gala");
    }
}
