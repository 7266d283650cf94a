//! Infrastructure implementations.
//!
//! Contains port traits and their implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod memory;
pub mod ports;
