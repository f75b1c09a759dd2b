//! Session service - open and close provider sessions

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::result::ProviderResult;
use crate::domain::{Credentials, SessionToken};
use crate::ports::BankingApi;

/// Manages the provider session lifecycle
///
/// Holds no token itself: `login` hands the token to the caller and
/// `logout` takes it back by value, which ends the session for good.
pub struct SessionManager {
    api: Arc<dyn BankingApi>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn BankingApi>) -> Self {
        Self { api }
    }

    /// Log in, reporting why it failed
    pub fn login(&self, credentials: &Credentials) -> ProviderResult<SessionToken> {
        let token = self.api.login(credentials)?;
        info!(provider = self.api.name(), bank = %credentials.provider, "session opened");
        Ok(token)
    }

    /// Log in; any failure is logged and becomes `None`
    pub fn login_or_empty(&self, credentials: &Credentials) -> Option<SessionToken> {
        match self.login(credentials) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!(provider = self.api.name(), error = %e, "login failed");
                None
            }
        }
    }

    /// Close the session. Best effort: failures are logged, not retried.
    pub fn logout(&self, token: SessionToken) -> bool {
        match self.api.logout(&token) {
            Ok(()) => {
                info!(provider = self.api.name(), "session closed");
                true
            }
            Err(e) => {
                warn!(provider = self.api.name(), error = %e, "logout failed");
                false
            }
        }
    }
}
