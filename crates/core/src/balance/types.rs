//! Balance domain types.

use std::collections::BTreeMap;

use fairshare_shared::types::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One user owing another in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPair {
    /// Debtor.
    pub from_user_id: UserId,
    /// Creditor.
    pub to_user_id: UserId,
    /// Amount owed in major units, strictly positive.
    pub amount: Decimal,
    /// Upper-case currency code.
    pub currency: String,
}

impl SettlementPair {
    /// Returns true if the user is the debtor or the creditor.
    #[must_use]
    pub fn involves(&self, user_id: UserId) -> bool {
        self.from_user_id == user_id || self.to_user_id == user_id
    }
}

/// A user's signed position per currency.
///
/// Positive means the user is owed money, negative means the user owes.
/// Settled currencies are not present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetBalance(BTreeMap<String, Decimal>);

impl NetBalance {
    /// Fold settlement pairs into the user's position.
    ///
    /// Adds the amount where the user is the creditor and subtracts it where
    /// the user is the debtor.
    #[must_use]
    pub fn from_pairs(user_id: UserId, pairs: &[SettlementPair]) -> Self {
        let mut net = BTreeMap::new();
        for pair in pairs {
            let signed = if pair.to_user_id == user_id {
                pair.amount
            } else if pair.from_user_id == user_id {
                -pair.amount
            } else {
                continue;
            };
            *net.entry(pair.currency.clone()).or_insert(Decimal::ZERO) += signed;
        }
        Self::from_map(net)
    }

    /// Build from a currency map, dropping settled currencies.
    #[must_use]
    pub fn from_map(mut amounts: BTreeMap<String, Decimal>) -> Self {
        amounts.retain(|_, amount| !amount.is_zero());
        Self(amounts)
    }

    /// Position in a currency; zero when settled or unknown.
    #[must_use]
    pub fn get(&self, currency: &str) -> Decimal {
        self.0
            .get(&currency.to_ascii_uppercase())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns true if the user is settled in every currency.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(currency, amount)` in currency order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(code, amount)| (code.as_str(), *amount))
    }
}

/// The authoritative balances source: currency → user → signed net.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSheet(BTreeMap<String, BTreeMap<UserId, Decimal>>);

impl BalanceSheet {
    /// Record a user's net amount in a currency, accumulating repeats.
    pub fn add(&mut self, currency: impl Into<String>, user_id: UserId, amount: Decimal) {
        *self
            .0
            .entry(currency.into())
            .or_default()
            .entry(user_id)
            .or_insert(Decimal::ZERO) += amount;
    }

    /// The user's position across all currencies.
    #[must_use]
    pub fn net_for(&self, user_id: UserId) -> NetBalance {
        let amounts = self
            .0
            .iter()
            .filter_map(|(code, users)| users.get(&user_id).map(|a| (code.clone(), *a)))
            .collect();
        NetBalance::from_map(amounts)
    }

    /// Currencies present in the sheet.
    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns true if the sheet holds no balances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where a [`BalanceView`]'s net position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSource {
    /// Authoritative balances map.
    Balances,
    /// Folded from settlement pairs.
    Pairs,
}

/// Everything a balance view displays for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceView {
    /// Viewing user.
    pub user_id: UserId,
    /// Net position per currency.
    pub net: NetBalance,
    /// Settlement pairs to display.
    pub pairs: Vec<SettlementPair>,
    /// Source of `net`.
    pub source: BalanceSource,
    /// Unreadable or zero entries skipped in the sources that were used.
    pub dropped_entries: usize,
}
