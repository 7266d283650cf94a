//! Eventia Engine library.
//!
//! Orchestration around the `eventia-domain` aggregates.
//!
//! ## Structure
//!
//! - `use_cases/` - Versioned read-modify-write flows per aggregate
//! - `infrastructure/` - Ports, in-memory adapters, clock and configuration
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Shared builders for unit tests.
#[cfg(test)]
mod test_fixtures;


pub use app::App;
