//! Schema checks for loosely shaped settlement payloads.
//!
//! The remote service has shipped settlement pairs under several field names
//! and wrappers over time. These functions are the only place that looks at
//! raw JSON: they either return canonical typed records or an
//! `UnrecognizedShape` failure. Individual entries that cannot be read, or that
//! carry a zero amount, are dropped and counted.

use std::str::FromStr;

use fairshare_shared::types::{UserId, normalize_code};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::debug;

use super::error::NormalizeError;
use super::types::{BalanceSheet, SettlementPair};

const PAIR_WRAPPERS: &[&str] = &["pairs", "settlements", "debts", "data"];
const BALANCE_WRAPPERS: &[&str] = &["balances", "data"];

const FROM_KEYS: &[&str] = &[
    "from_user_id",
    "from",
    "fromUserId",
    "from_id",
    "debtor_id",
    "debtor",
    "payer",
];
const TO_KEYS: &[&str] = &[
    "to_user_id",
    "to",
    "toUserId",
    "to_id",
    "creditor_id",
    "creditor",
    "payee",
];
const AMOUNT_KEYS: &[&str] = &["amount", "value", "total"];
const CURRENCY_KEYS: &[&str] = &["currency", "currency_code", "currencyCode", "code"];

/// Normalized records plus the number of entries that were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<T> {
    /// Canonical records.
    pub value: T,
    /// Entries skipped as invalid or zero.
    pub dropped: usize,
}

/// Normalize a settlement-pairs payload.
///
/// Accepts an array (optionally wrapped in `pairs`, `settlements`, `debts`
/// or `data`) whose entries are objects with any of the known field aliases,
/// or positional arrays `[from, to, amount, currency]`.
///
/// # Errors
///
/// Returns `UnrecognizedShape` if the payload is not an array of entries.
pub fn normalize_pairs(raw: &Value) -> Result<Normalized<Vec<SettlementPair>>, NormalizeError> {
    let entries = unwrap_array(raw).ok_or(NormalizeError::UnrecognizedShape {
        expected: "settlement pair list",
        found: json_kind(raw),
    })?;

    let pairs: Vec<SettlementPair> = entries.iter().filter_map(parse_pair).collect();
    let dropped = entries.len() - pairs.len();
    if dropped > 0 {
        debug!(dropped, kept = pairs.len(), "Dropped invalid settlement pairs");
    }

    Ok(Normalized {
        value: pairs,
        dropped,
    })
}

/// Normalize a balances payload: currency → user → signed net amount.
///
/// Accepts the map directly or wrapped in `balances` or `data`.
///
/// # Errors
///
/// Returns `UnrecognizedShape` if the payload is not an object, or if none of
/// its entries is a per-user map.
pub fn normalize_balances(raw: &Value) -> Result<Normalized<BalanceSheet>, NormalizeError> {
    let unrecognized = || NormalizeError::UnrecognizedShape {
        expected: "currency balance map",
        found: json_kind(raw),
    };
    let currencies = unwrap_object(raw).ok_or_else(unrecognized)?;

    let mut sheet = BalanceSheet::default();
    let mut dropped = 0;
    let mut maps_seen = 0;

    for (code, users) in currencies {
        let (Some(code), Some(users)) = (normalize_code(code), users.as_object()) else {
            dropped += 1;
            continue;
        };
        maps_seen += 1;

        for (user, amount) in users {
            match (parse_user_key(user), parse_amount(amount)) {
                (Some(user_id), Some(amount)) if !amount.is_zero() => {
                    sheet.add(code.clone(), user_id, amount);
                }
                _ => dropped += 1,
            }
        }
    }

    if maps_seen == 0 && !currencies.is_empty() {
        return Err(unrecognized());
    }
    if dropped > 0 {
        debug!(dropped, "Dropped invalid balance entries");
    }

    Ok(Normalized {
        value: sheet,
        dropped,
    })
}

fn unwrap_array(raw: &Value) -> Option<&Vec<Value>> {
    match raw {
        Value::Array(entries) => Some(entries),
        Value::Object(map) => PAIR_WRAPPERS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}

fn unwrap_object(raw: &Value) -> Option<&Map<String, Value>> {
    let map = raw.as_object()?;
    let inner = BALANCE_WRAPPERS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_object));
    Some(inner.unwrap_or(map))
}

fn parse_pair(entry: &Value) -> Option<SettlementPair> {
    let (from, to, amount, currency) = match entry {
        Value::Object(fields) => (
            lookup(fields, FROM_KEYS)?,
            lookup(fields, TO_KEYS)?,
            lookup(fields, AMOUNT_KEYS)?,
            lookup(fields, CURRENCY_KEYS)?,
        ),
        Value::Array(items) if items.len() >= 4 => (&items[0], &items[1], &items[2], &items[3]),
        _ => return None,
    };

    let from_user_id = parse_id(from)?;
    let to_user_id = parse_id(to)?;
    let amount = parse_amount(amount)?;
    let currency = normalize_code(currency.as_str()?)?;

    if from_user_id == to_user_id || amount <= Decimal::ZERO {
        return None;
    }

    Some(SettlementPair {
        from_user_id,
        to_user_id,
        amount,
        currency,
    })
}

fn lookup<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| fields.get(*key).filter(|v| !v.is_null()))
}

fn parse_id(value: &Value) -> Option<UserId> {
    match value {
        Value::Number(n) => n.as_i64().map(UserId::new),
        Value::String(s) => UserId::from_str(s).ok(),
        _ => None,
    }
}

fn parse_user_key(key: &str) -> Option<UserId> {
    UserId::from_str(key).ok()
}

/// Parse an amount without going through floating point.
///
/// serde_json keeps the source text of numbers (`arbitrary_precision`), so
/// `0.1` stays `0.1` and long fractions are not rounded.
fn parse_amount(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
