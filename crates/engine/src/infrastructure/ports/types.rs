//! Helper types for port operations.

/// A stored aggregate together with the version it was read at.
///
/// Versions start at 1 on insert and grow by one on every write. Passing
/// `version` back to an `update_if_version` call makes the write conditional
/// on nobody else having written in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

impl<T> Versioned<T> {
    pub fn new(version: u64, value: T) -> Self {
        Self { version, value }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
