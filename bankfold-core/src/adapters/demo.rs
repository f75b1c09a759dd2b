//! Demo banking provider
//!
//! Serves deterministic canned data so the CLI can be tried without an
//! API key:
//! - 2 accounts (UYU checking, USD savings) and 1 credit card
//! - movements generated for every day of the requested window

use chrono::{Datelike, Duration};
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};

use crate::domain::result::{ProviderError, ProviderResult};
use crate::domain::{Account, CreditCard, Credentials, DateWindow, Movement, ProviderInfo, SessionToken};
use crate::ports::BankingApi;

const DEMO_SESSION_KEY: &str = "demo-session";

/// Demo data provider
#[derive(Debug, Default)]
pub struct DemoBankingApi;

impl DemoBankingApi {
    pub fn new() -> Self {
        Self
    }

    fn check_session(&self, token: &SessionToken) -> ProviderResult<()> {
        if token.as_str() == DEMO_SESSION_KEY {
            Ok(())
        } else {
            Err(ProviderError::Auth("unknown demo session".to_string()))
        }
    }
}

/// (detail, debit in cents, credit in cents, every n-th day)
const ACCOUNT_PATTERN: &[(&str, i64, i64, u32)] = &[
    ("Supermercado", 184_250, 0, 3),
    ("UTE", 254_000, 0, 30),
    ("Transferencia recibida", 0, 1_500_000, 14),
    ("Cafe", 12_000, 0, 2),
];

const SAVINGS_PATTERN: &[(&str, i64, i64, u32)] = &[
    ("Sueldo", 0, 250_000, 30),
    ("Intereses", 0, 315, 30),
];

const CARD_PATTERN: &[(&str, i64, i64, u32)] = &[
    ("Netflix", 1_599, 0, 30),
    ("Restaurante", 4_750, 0, 6),
    ("Devolucion", 0, 2_000, 45),
];

fn generate_movements(window: &DateWindow, pattern: &[(&str, i64, i64, u32)]) -> Vec<Movement> {
    let mut movements = Vec::new();
    let mut day = window.start();
    while day <= window.end() {
        let ordinal = day.ordinal();
        for (detail, debit, credit, every) in pattern {
            if ordinal % every != 0 {
                continue;
            }
            let mut movement = Movement {
                debit: (*debit != 0).then(|| Decimal::new(*debit, 2)),
                credit: (*credit != 0).then(|| Decimal::new(*credit, 2)),
                ..Default::default()
            };
            movement.extra.insert("date".to_string(), json!(day.format("%d/%m/%Y").to_string()));
            movement.extra.insert("detail".to_string(), json!(detail));
            movements.push(movement);
        }
        day += Duration::days(1);
    }
    movements
}

impl BankingApi for DemoBankingApi {
    fn name(&self) -> &str {
        "demo"
    }

    fn login(&self, credentials: &Credentials) -> ProviderResult<SessionToken> {
        if credentials.username.is_empty() {
            return Err(ProviderError::Auth("username required".to_string()));
        }
        SessionToken::new(DEMO_SESSION_KEY)
            .ok_or_else(|| ProviderError::Auth("no demo session".to_string()))
    }

    fn logout(&self, token: &SessionToken) -> ProviderResult<()> {
        self.check_session(token)
    }

    fn get_providers(&self) -> ProviderResult<Vec<ProviderInfo>> {
        Ok(vec![ProviderInfo {
            code: Some("test".to_string()),
            name: Some("Demo Bank".to_string()),
            country: Some("UY".to_string()),
            ..Default::default()
        }])
    }

    fn get_info(&self, token: &SessionToken) -> ProviderResult<JsonValue> {
        self.check_session(token)?;
        Ok(json!({ "name": "Demo User", "document": "00000000", "email": "demo@example.com" }))
    }

    fn get_accounts(&self, token: &SessionToken) -> ProviderResult<Vec<Account>> {
        self.check_session(token)?;
        let mut checking = Account::new("1000-01", "UYU");
        checking.name = Some("Cuenta Corriente".to_string());
        checking.balance = Some(Decimal::new(482_347, 2));
        let mut savings = Account::new("1000-02", "USD");
        savings.name = Some("Caja de Ahorro".to_string());
        savings.balance = Some(Decimal::new(1_875_000, 2));
        Ok(vec![checking, savings])
    }

    fn get_credit_cards(&self, token: &SessionToken) -> ProviderResult<Vec<CreditCard>> {
        self.check_session(token)?;
        let mut card = CreditCard::new("4509-0001", "USD");
        card.name = Some("Visa Gold".to_string());
        card.balance_dollar = Some(Decimal::new(284_763, 2));
        Ok(vec![card])
    }

    fn get_account_movements(
        &self,
        token: &SessionToken,
        account_number: &str,
        _currency: &str,
        window: &DateWindow,
    ) -> ProviderResult<Vec<Movement>> {
        self.check_session(token)?;
        Ok(match account_number {
            "1000-01" => generate_movements(window, ACCOUNT_PATTERN),
            "1000-02" => generate_movements(window, SAVINGS_PATTERN),
            _ => Vec::new(),
        })
    }

    fn get_credit_card_movements(
        &self,
        token: &SessionToken,
        card_number: &str,
        _currency: &str,
        window: &DateWindow,
    ) -> ProviderResult<Vec<Movement>> {
        self.check_session(token)?;
        Ok(match card_number {
            "4509-0001" => generate_movements(window, CARD_PATTERN),
            _ => Vec::new(),
        })
    }
}
