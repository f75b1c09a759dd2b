//! Movement (transaction record) domain model

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::de;

/// A single ledger entry on an account or credit card
///
/// A record may carry a debit, a credit, both, or neither. Provider fields
/// the client does not interpret (date, detail, reference...) stay in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    #[serde(default, deserialize_with = "de::optional_amount")]
    pub debit: Option<Decimal>,
    #[serde(default, deserialize_with = "de::optional_amount")]
    pub credit: Option<Decimal>,
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

impl Movement {
    pub fn debit(amount: Decimal) -> Self {
        Self {
            debit: Some(amount),
            ..Default::default()
        }
    }

    pub fn credit(amount: Decimal) -> Self {
        Self {
            credit: Some(amount),
            ..Default::default()
        }
    }

    /// Debit amount if it counts toward expenses (present and non-zero)
    pub fn qualifying_debit(&self) -> Option<Decimal> {
        self.debit.filter(|d| !d.is_zero())
    }

    /// Credit amount if it counts toward credits (present and non-zero)
    pub fn qualifying_credit(&self) -> Option<Decimal> {
        self.credit.filter(|c| !c.is_zero())
    }
}
