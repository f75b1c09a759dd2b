//! Per-account expense/credit/balance totals
//!
//! Folds movement lists into three maps keyed by account or card number.
//! Amounts are `Decimal`, so sums are exact and independent of record
//! order.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Movement;

/// Account or card number used to group movements
pub type AccountId = String;

/// How `balance` treats an account missing from `expenses` or `credits`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalancePolicy {
    /// Every input account gets a balance; a missing side counts as zero
    #[default]
    MissingAsZero,
    /// Only accounts with both expenses and credits get a balance
    RequireBoth,
}

/// Aggregated totals
///
/// `expenses` and `credits` only hold accounts with at least one
/// qualifying record of that kind. There are no zero placeholders.
///
/// A sum that exceeds the `Decimal` range is clamped to `Decimal::MAX`
/// (or `MIN`) and its account is listed in `overflowed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    pub expenses: BTreeMap<AccountId, Decimal>,
    pub credits: BTreeMap<AccountId, Decimal>,
    pub balance: BTreeMap<AccountId, Decimal>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub overflowed: BTreeSet<AccountId>,
}

impl Aggregate {
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.credits.is_empty() && self.balance.is_empty()
    }

    /// Every account id appearing in any of the three maps, sorted
    pub fn account_ids(&self) -> BTreeSet<&str> {
        self.expenses
            .keys()
            .chain(self.credits.keys())
            .chain(self.balance.keys())
            .map(String::as_str)
            .collect()
    }

    /// Sum of all expenses, clamped to the `Decimal` range
    pub fn total_expenses(&self) -> Decimal {
        saturating_sum(self.expenses.values())
    }

    /// Sum of all credits, clamped to the `Decimal` range
    pub fn total_credits(&self) -> Decimal {
        saturating_sum(self.credits.values())
    }
}

/// Aggregate with the default balance policy (`MissingAsZero`)
pub fn aggregate<'a, I, M>(movements_by_account: I) -> Aggregate
where
    I: IntoIterator<Item = (&'a AccountId, &'a M)>,
    M: AsRef<[Movement]> + 'a + ?Sized,
{
    aggregate_with(movements_by_account, BalancePolicy::default())
}

/// Aggregate movements per account with an explicit balance policy
pub fn aggregate_with<'a, I, M>(movements_by_account: I, policy: BalancePolicy) -> Aggregate
where
    I: IntoIterator<Item = (&'a AccountId, &'a M)>,
    M: AsRef<[Movement]> + 'a + ?Sized,
{
    let mut result = Aggregate::default();
    let mut seen: BTreeSet<&AccountId> = BTreeSet::new();

    for (account, movements) in movements_by_account {
        seen.insert(account);
        for movement in movements.as_ref() {
            if let Some(debit) = movement.qualifying_debit() {
                let total = result.expenses.entry(account.clone()).or_insert(Decimal::ZERO);
                if !accumulate(total, debit) {
                    result.overflowed.insert(account.clone());
                }
            }
            if let Some(credit) = movement.qualifying_credit() {
                let total = result.credits.entry(account.clone()).or_insert(Decimal::ZERO);
                if !accumulate(total, credit) {
                    result.overflowed.insert(account.clone());
                }
            }
        }
    }

    for account in seen {
        let expenses = result.expenses.get(account).copied();
        let credits = result.credits.get(account).copied();
        let sides = match (policy, credits, expenses) {
            (BalancePolicy::RequireBoth, Some(c), Some(e)) => Some((c, e)),
            (BalancePolicy::RequireBoth, _, _) => None,
            (BalancePolicy::MissingAsZero, c, e) => {
                Some((c.unwrap_or(Decimal::ZERO), e.unwrap_or(Decimal::ZERO)))
            }
        };
        if let Some((credits, expenses)) = sides {
            let balance = credits.checked_sub(expenses).unwrap_or_else(|| {
                result.overflowed.insert(account.clone());
                credits.saturating_sub(expenses)
            });
            result.balance.insert(account.clone(), balance);
        }
    }

    result
}

/// Add `amount` to `total`, clamping on overflow. Returns false if clamped.
fn accumulate(total: &mut Decimal, amount: Decimal) -> bool {
    match total.checked_add(amount) {
        Some(sum) => {
            *total = sum;
            true
        }
        None => {
            *total = total.saturating_add(amount);
            false
        }
    }
}

fn saturating_sum<'a>(values: impl Iterator<Item = &'a Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
}
