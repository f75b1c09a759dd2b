//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Prometeo HTTP client for BankingApi
//! - Demo data provider for offline use

pub mod demo;
pub mod prometeo;

#[cfg(test)]
pub mod prometeo_mock;
