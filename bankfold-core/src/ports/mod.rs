//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services depend
//! only on these traits, not on concrete implementations.

mod banking_api;

pub use banking_api::{BankingApi, MovementSource};
