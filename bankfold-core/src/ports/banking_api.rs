//! Banking provider port
//!
//! Defines the interface for the session lifecycle and data access against
//! an open-banking provider (Prometeo, demo data, test doubles).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::result::ProviderResult;
use crate::domain::{Account, CreditCard, Credentials, DateWindow, Movement, ProviderInfo, SessionToken};

/// Which kind of product a movement list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementSource {
    Account,
    CreditCard,
}

impl fmt::Display for MovementSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementSource::Account => write!(f, "account"),
            MovementSource::CreditCard => write!(f, "credit card"),
        }
    }
}

/// Banking provider trait
///
/// Every authenticated call borrows the session token explicitly; the
/// implementation holds no session state of its own. Each call either
/// yields its payload or a `ProviderError` saying why it failed.
pub trait BankingApi: Send + Sync {
    /// Provider name (e.g., "prometeo", "demo")
    fn name(&self) -> &str;

    /// Open a session
    fn login(&self, credentials: &Credentials) -> ProviderResult<SessionToken>;

    /// Close a session
    fn logout(&self, token: &SessionToken) -> ProviderResult<()>;

    /// List banks the provider can connect to (no session needed)
    fn get_providers(&self) -> ProviderResult<Vec<ProviderInfo>>;

    /// Information about the logged-in user
    fn get_info(&self, token: &SessionToken) -> ProviderResult<JsonValue>;

    fn get_accounts(&self, token: &SessionToken) -> ProviderResult<Vec<Account>>;

    fn get_credit_cards(&self, token: &SessionToken) -> ProviderResult<Vec<CreditCard>>;

    /// Movements of a bank account within `window`
    fn get_account_movements(
        &self,
        token: &SessionToken,
        account_number: &str,
        currency: &str,
        window: &DateWindow,
    ) -> ProviderResult<Vec<Movement>>;

    /// Movements of a credit card within `window`
    fn get_credit_card_movements(
        &self,
        token: &SessionToken,
        card_number: &str,
        currency: &str,
        window: &DateWindow,
    ) -> ProviderResult<Vec<Movement>>;

    /// Dispatch to the account or card movement endpoint
    fn get_movements(
        &self,
        token: &SessionToken,
        source: MovementSource,
        number: &str,
        currency: &str,
        window: &DateWindow,
    ) -> ProviderResult<Vec<Movement>> {
        match source {
            MovementSource::Account => self.get_account_movements(token, number, currency, window),
            MovementSource::CreditCard => {
                self.get_credit_card_movements(token, number, currency, window)
            }
        }
    }
}
