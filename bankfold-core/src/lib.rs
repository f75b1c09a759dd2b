//! Bankfold Core - account totals from an open-banking provider
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: Core entities (SessionToken, Account, Movement, Aggregate, etc.)
//! - **ports**: Trait definitions for external dependencies (BankingApi)
//! - **services**: Session lifecycle and the end-to-end report run
//! - **adapters**: Concrete implementations (Prometeo HTTP client, demo data)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::demo::DemoBankingApi;
use adapters::prometeo::PrometeoClient;
use config::Config;
use ports::BankingApi;
use services::{ReportService, SessionManager};

// Re-export commonly used types at crate root
pub use domain::result::{Error, ProviderError};
pub use domain::{
    aggregate, aggregate_with, Account, Aggregate, BalancePolicy, CreditCard, Credentials, DateWindow,
    Movement, SessionToken,
};

/// Main context for Bankfold operations
///
/// Holds the configuration, the provider adapter and the services built
/// on top of it.
pub struct BankfoldContext {
    pub config: Config,
    pub api: Arc<dyn BankingApi>,
    pub session_manager: SessionManager,
    pub report_service: ReportService,
}

impl BankfoldContext {
    /// Create a context from the settings in `bankfold_dir`
    pub fn new(bankfold_dir: &Path) -> Result<Self> {
        let config = Config::load(bankfold_dir)?;
        Self::from_config(config)
    }

    /// Create a context for an already resolved configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let api: Arc<dyn BankingApi> = if config.demo_mode {
            Arc::new(DemoBankingApi::new())
        } else {
            let api_key = config.require_api_key()?;
            Arc::new(PrometeoClient::new_with_base_url(api_key, &config.base_url)?)
        };
        Ok(Self::with_api(config, api))
    }

    /// Create a context around a given provider
    pub fn with_api(config: Config, api: Arc<dyn BankingApi>) -> Self {
        let session_manager = SessionManager::new(Arc::clone(&api));
        let report_service = ReportService::new(Arc::clone(&api), config.credentials.clone());
        Self {
            config,
            api,
            session_manager,
            report_service,
        }
    }
}
