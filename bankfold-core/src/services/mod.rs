//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case.

mod report;
mod session;

pub use report::{FetchProgress, Report, ReportService};
pub use session::SessionManager;
