//! Balance error types.

use fairshare_shared::AppError;
use thiserror::Error;

/// A settlement payload that matches no known schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Top-level shape is not what the schema check expects.
    #[error("Unrecognized settlement payload: expected {expected}, found {found}")]
    UnrecognizedShape {
        /// What the schema check was looking for.
        expected: &'static str,
        /// JSON kind actually received.
        found: &'static str,
    },
}

impl NormalizeError {
    /// Machine-checkable reason tag.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::UnrecognizedShape { .. } => "unrecognized_shape",
        }
    }
}

/// Failure reported by a [`SettlementSource`](super::SettlementSource) read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Settlement source unavailable: {0}")]
pub struct SourceError(pub String);

impl SourceError {
    /// Creates a source error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Balance view errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// Neither the balances map nor the settlement pairs could be used.
    #[error("No settlement data available (balances: {balances}; pairs: {pairs})")]
    SourcesUnavailable {
        /// Why the balances source failed.
        balances: String,
        /// Why the pairs source failed.
        pairs: String,
    },
}

impl BalanceError {
    /// Machine-checkable reason tag.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::SourcesUnavailable { .. } => "sources_unavailable",
        }
    }
}

impl From<BalanceError> for AppError {
    fn from(err: BalanceError) -> Self {
        Self::ExternalService(err.to_string())
    }
}
