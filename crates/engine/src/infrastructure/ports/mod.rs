//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Persistence (in-memory today, a database tomorrow)
//! - Clock (for testing)

mod error;
mod repos;
mod testing;
mod types;

pub use error::RepoError;
pub use repos::*;
pub use testing::ClockPort;
#[cfg(test)]
pub use testing::MockClockPort;
pub use types::Versioned;
