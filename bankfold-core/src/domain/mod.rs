//! Core domain entities
//!
//! Pure data structures and the aggregation fold - no I/O or external
//! dependencies.

mod account;
pub mod aggregate;
mod de;
mod movement;
pub mod result;
mod session;
mod window;

pub use account::{Account, CreditCard, ProviderInfo, DEFAULT_CURRENCY};
pub use aggregate::{aggregate, aggregate_with, AccountId, Aggregate, BalancePolicy};
pub use movement::Movement;
pub use session::{Credentials, SessionToken};
pub use window::{DateWindow, PROVIDER_DATE_FORMAT};
