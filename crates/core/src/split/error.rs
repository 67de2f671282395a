//! Split error types.
//!
//! Every failure in the allocation pipeline is a validation outcome with a
//! machine-checkable reason, never a panic.

use fairshare_shared::AppError;
use fairshare_shared::types::UserId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors converting between major and minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Precision outside the supported range.
    #[error("Unsupported currency precision: {0}")]
    InvalidPrecision(u32),

    /// The scaled amount does not fit in 64 bits.
    #[error("Amount {amount} does not fit in minor units at {decimals} decimals")]
    Overflow {
        /// Major-unit amount that overflowed.
        amount: Decimal,
        /// Requested precision.
        decimals: u32,
    },
}

/// Errors from the largest-remainder distribution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistributionError {
    /// All weights are zero (or there are none).
    #[error("Total weight must be greater than zero")]
    ZeroTotalWeight,

    /// The total to distribute is negative.
    #[error("Total must not be negative: {0}")]
    NegativeTotal(i64),

    /// An intermediate value left the representable range.
    #[error("Distribution overflowed")]
    Overflow,
}

/// Reasons a split selection cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// The selection has no participants.
    #[error("Split must have at least one participant")]
    NoParticipants,

    /// Every participant has zero shares.
    #[error("Total share weight must be greater than zero")]
    ZeroTotalWeight,

    /// Custom amounts do not add up to the transaction total.
    #[error("Custom amounts are {} by {}", direction(.delta), magnitude(.delta))]
    CustomSumMismatch {
        /// Signed difference `sum(custom) - total` in major units.
        delta: Decimal,
        /// Same difference in minor units.
        delta_minor: i64,
    },

    /// The same user appears more than once.
    #[error("Participant {0} appears more than once")]
    DuplicateParticipant(UserId),

    /// A custom amount is negative.
    #[error("Amount for participant {0} must not be negative")]
    NegativeAmount(UserId),

    /// The transaction total is negative.
    #[error("Transaction total must not be negative")]
    NegativeTotal,

    /// Currency precision is unsupported.
    #[error("Unsupported currency precision: {0}")]
    InvalidPrecision(u32),

    /// An amount is too large to represent.
    #[error("Amount is too large")]
    AmountOverflow,

    /// The computed allocation broke the sum invariant.
    #[error("Allocation sums to {actual} but total is {expected}")]
    AllocationMismatch {
        /// Expected total in minor units.
        expected: i64,
        /// Actual sum in minor units.
        actual: i64,
    },
}

fn direction(delta: &Decimal) -> &'static str {
    if delta.is_sign_negative() {
        "short"
    } else {
        "over"
    }
}

fn magnitude(delta: &Decimal) -> Decimal {
    delta.abs()
}

impl SplitError {
    /// Machine-checkable reason tag.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NoParticipants => "no_participants",
            Self::ZeroTotalWeight => "zero_total_weight",
            Self::CustomSumMismatch { .. } => "custom_sum_mismatch",
            Self::DuplicateParticipant(_) => "duplicate_participant",
            Self::NegativeAmount(_) => "negative_amount",
            Self::NegativeTotal => "negative_total",
            Self::InvalidPrecision(_) => "invalid_precision",
            Self::AmountOverflow => "amount_overflow",
            Self::AllocationMismatch { .. } => "allocation_mismatch",
        }
    }
}

impl From<ConversionError> for SplitError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::InvalidPrecision(decimals) => Self::InvalidPrecision(decimals),
            ConversionError::Overflow { .. } => Self::AmountOverflow,
        }
    }
}

impl From<DistributionError> for SplitError {
    fn from(err: DistributionError) -> Self {
        match err {
            DistributionError::ZeroTotalWeight => Self::ZeroTotalWeight,
            DistributionError::NegativeTotal(_) => Self::NegativeTotal,
            DistributionError::Overflow => Self::AmountOverflow,
        }
    }
}

impl From<SplitError> for AppError {
    fn from(err: SplitError) -> Self {
        match err {
            SplitError::AllocationMismatch { .. } => Self::Internal(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
