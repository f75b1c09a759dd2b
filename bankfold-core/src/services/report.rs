//! Report service - the end-to-end run
//!
//! Logs in, pulls accounts, credit cards and their movements over a date
//! window, folds the movements into per-account totals and logs out.
//!
//! Provider failures never abort the run. Each failed call degrades to an
//! empty value, is logged, and is recorded in `Report::warnings`, so the
//! totals keep their shape even when data is missing.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::domain::result::ProviderResult;
use crate::domain::{
    aggregate_with, AccountId, Account, Aggregate, BalancePolicy, CreditCard, Credentials, DateWindow,
    Movement,
};
use crate::ports::{BankingApi, MovementSource};
use crate::services::SessionManager;

/// Outcome of a full run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub provider: String,
    pub window: DateWindow,
    pub balance_policy: BalancePolicy,
    pub logged_in: bool,
    pub info: JsonValue,
    pub accounts: Vec<Account>,
    pub credit_cards: Vec<CreditCard>,
    /// Movements keyed by account or card number
    pub movements: BTreeMap<AccountId, Vec<Movement>>,
    pub totals: Aggregate,
    pub warnings: Vec<String>,
    pub logged_out: bool,
}

impl Report {
    fn empty(provider: &str, window: DateWindow, balance_policy: BalancePolicy) -> Self {
        Self {
            provider: provider.to_string(),
            window,
            balance_policy,
            logged_in: false,
            info: JsonValue::Object(Default::default()),
            accounts: Vec::new(),
            credit_cards: Vec::new(),
            movements: BTreeMap::new(),
            totals: Aggregate::default(),
            warnings: Vec::new(),
            logged_out: false,
        }
    }

    pub fn movement_count(&self, account: &str) -> usize {
        self.movements.get(account).map_or(0, Vec::len)
    }
}

/// One movement fetch about to start
#[derive(Debug, Clone)]
pub struct FetchProgress<'a> {
    /// 1-based position among all fetches
    pub index: usize,
    pub total: usize,
    pub source: MovementSource,
    pub number: &'a str,
}

/// Report service for the login → fetch → aggregate → logout run
pub struct ReportService {
    api: Arc<dyn BankingApi>,
    sessions: SessionManager,
    credentials: Credentials,
}

impl ReportService {
    pub fn new(api: Arc<dyn BankingApi>, credentials: Credentials) -> Self {
        let sessions = SessionManager::new(Arc::clone(&api));
        Self {
            api,
            sessions,
            credentials,
        }
    }

    pub fn run(&self, window: DateWindow, policy: BalancePolicy) -> Report {
        self.run_with_progress(window, policy, |_| {})
    }

    /// Run, calling `on_fetch` before each movement request
    pub fn run_with_progress<F>(&self, window: DateWindow, policy: BalancePolicy, mut on_fetch: F) -> Report
    where
        F: FnMut(FetchProgress<'_>),
    {
        let mut report = Report::empty(self.api.name(), window, policy);

        let token = match self.sessions.login(&self.credentials) {
            Ok(token) => token,
            Err(e) => {
                // Without a session every data call would fail the same way
                warn!(error = %e, "login failed, producing empty report");
                report.warnings.push(format!("login failed: {}", e));
                return report;
            }
        };
        report.logged_in = true;

        report.info = degrade(self.api.get_info(&token), "user info", &mut report.warnings);
        report.accounts = degrade(self.api.get_accounts(&token), "accounts", &mut report.warnings);
        report.credit_cards = degrade(self.api.get_credit_cards(&token), "credit cards", &mut report.warnings);

        let mut targets: Vec<(MovementSource, String, String)> = Vec::new();
        for account in &report.accounts {
            match &account.number {
                Some(number) => targets.push((
                    MovementSource::Account,
                    number.clone(),
                    account.currency_or_default().to_string(),
                )),
                None => report.warnings.push("skipped an account without a number".to_string()),
            }
        }
        for card in &report.credit_cards {
            match &card.number {
                Some(number) => targets.push((
                    MovementSource::CreditCard,
                    number.clone(),
                    card.currency_or_default().to_string(),
                )),
                None => report.warnings.push("skipped a credit card without a number".to_string()),
            }
        }

        let total = targets.len();
        for (i, (source, number, currency)) in targets.iter().enumerate() {
            on_fetch(FetchProgress {
                index: i + 1,
                total,
                source: *source,
                number: number.as_str(),
            });

            let fetched = self.api.get_movements(&token, *source, number, currency, &window);
            let movements = degrade(
                fetched,
                &format!("movements for {} {}", source, number),
                &mut report.warnings,
            );
            debug!(%source, number = %number, count = movements.len(), "movements fetched");

            let slot = report.movements.entry(number.clone()).or_default();
            if !slot.is_empty() {
                debug!(number = %number, "account and card share a number, merging movements");
            }
            slot.extend(movements);
        }

        report.totals = aggregate_with(&report.movements, policy);
        for account in &report.totals.overflowed {
            warn!(account = %account, "totals exceed the decimal range and were clamped");
            report
                .warnings
                .push(format!("totals for {} exceed the supported range and were clamped", account));
        }
        report.logged_out = self.sessions.logout(token);

        info!(
            accounts = report.accounts.len(),
            credit_cards = report.credit_cards.len(),
            warnings = report.warnings.len(),
            "report complete"
        );
        report
    }
}

/// Turn a failed call into an empty value plus a warning
fn degrade<T: Default>(result: ProviderResult<T>, what: &str, warnings: &mut Vec<String>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(call = what, error = %e, "provider call failed, using empty result");
            warnings.push(format!("failed to fetch {}: {}", what, e));
            T::default()
        }
    }
}
