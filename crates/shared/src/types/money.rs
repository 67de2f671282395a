//! Currency descriptor with minor-unit precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts travel as integer minor units; `decimals` says how many fractional
//! digits one major unit has.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest supported number of fractional digits.
pub const MAX_DECIMALS: u32 = 8;

/// A currency as handed over by the currency catalog.
///
/// Deserialization goes through [`Currency::new`], so a parsed currency always
/// has a normalized code and a supported precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CurrencyFields")]
pub struct Currency {
    /// ISO 4217 style code (e.g., "USD", "JPY"), always upper-case.
    pub code: String,
    /// Display symbol (e.g., "$").
    pub symbol: String,
    /// Number of fractional digits of the minor unit.
    pub decimals: u32,
}

/// Unchecked wire form of a [`Currency`].
#[derive(Deserialize)]
struct CurrencyFields {
    code: String,
    #[serde(default)]
    symbol: String,
    decimals: u32,
}

impl TryFrom<CurrencyFields> for Currency {
    type Error = CurrencyError;

    fn try_from(fields: CurrencyFields) -> Result<Self, Self::Error> {
        Self::new(fields.code, fields.symbol, fields.decimals)
    }
}

/// Errors raised when building a [`Currency`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// The code is empty or contains non-alphanumeric characters.
    #[error("Invalid currency code: {0:?}")]
    InvalidCode(String),

    /// The precision is outside `0..=MAX_DECIMALS`.
    #[error("Unsupported currency precision: {0} (max {MAX_DECIMALS})")]
    InvalidPrecision(u32),
}

impl Currency {
    /// Creates a currency, upper-casing the code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is blank or the precision is unsupported.
    pub fn new(
        code: impl AsRef<str>,
        symbol: impl Into<String>,
        decimals: u32,
    ) -> Result<Self, CurrencyError> {
        let code = normalize_code(code.as_ref())
            .ok_or_else(|| CurrencyError::InvalidCode(code.as_ref().to_string()))?;
        if decimals > MAX_DECIMALS {
            return Err(CurrencyError::InvalidPrecision(decimals));
        }
        Ok(Self {
            code,
            symbol: symbol.into(),
            decimals,
        })
    }

    /// Returns true if the currency has no subdivision (e.g., JPY).
    #[must_use]
    pub const fn is_whole(&self) -> bool {
        self.decimals == 0
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Trims and upper-cases a currency code; `None` when it is not a plausible code.
#[must_use]
pub fn normalize_code(raw: &str) -> Option<String> {
    let code = raw.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(code.to_ascii_uppercase())
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
