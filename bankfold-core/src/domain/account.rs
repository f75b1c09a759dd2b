//! Account and credit card metadata as returned by the provider

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::de;

/// Currency used when the provider omits one
pub const DEFAULT_CURRENCY: &str = "USD";

/// A bank account
///
/// Only the fields the client reads are typed; everything else the
/// provider sends is kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    /// Account number, used as the aggregation key
    #[serde(default, deserialize_with = "de::optional_id")]
    pub number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de::optional_amount")]
    pub balance: Option<Decimal>,
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

impl Account {
    pub fn new(number: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            number: Some(number.into()),
            currency: Some(currency.into()),
            ..Default::default()
        }
    }

    /// Currency for movement queries, defaulting to USD
    pub fn currency_or_default(&self) -> &str {
        currency_or_default(&self.currency)
    }
}

/// A credit card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreditCard {
    /// Card number, used as the aggregation key
    #[serde(default, deserialize_with = "de::optional_id")]
    pub number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de::optional_amount")]
    pub balance_local: Option<Decimal>,
    #[serde(default, deserialize_with = "de::optional_amount")]
    pub balance_dollar: Option<Decimal>,
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

impl CreditCard {
    pub fn new(number: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            number: Some(number.into()),
            currency: Some(currency.into()),
            ..Default::default()
        }
    }

    pub fn currency_or_default(&self) -> &str {
        currency_or_default(&self.currency)
    }
}

/// A bank supported by the provider (from the public provider list)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderInfo {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

fn currency_or_default(currency: &Option<String>) -> &str {
    currency
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(DEFAULT_CURRENCY)
}
