//! Business rule validation for split selections and allocations.

use std::collections::HashSet;

use super::converter::MinorUnitConverter;
use super::error::SplitError;
use super::types::{PerPersonAllocation, SplitMode, SplitRequest, SplitSelection};
use super::weights::WeightAllocator;

/// Largest accepted difference between custom amounts and the total, in minor units.
pub const CUSTOM_TOLERANCE_MINOR: i64 = 1;

/// Validator for split selections.
///
/// Knows nothing about who paid; callers make sure the payer is a participant.
pub struct SplitValidator;

impl SplitValidator {
    /// Check a complete request: selection rules, total, and custom sums.
    ///
    /// Returns the total in minor units on success.
    ///
    /// # Errors
    ///
    /// Returns the first rule the request violates.
    pub fn validate(request: &SplitRequest) -> Result<i64, SplitError> {
        Self::validate_selection(&request.selection)?;

        let decimals = request.currency.decimals;
        let total_minor = MinorUnitConverter::to_minor(request.total, decimals)?;
        if total_minor < 0 {
            return Err(SplitError::NegativeTotal);
        }

        if request.selection.mode == SplitMode::Custom {
            let amounts = WeightAllocator::direct_amounts(&request.selection, decimals)?;
            Self::validate_custom(&amounts, total_minor, decimals)?;
        }
        Ok(total_minor)
    }

    /// Check mode-independent and mode-specific selection rules.
    ///
    /// - `Equal`: at least one participant
    /// - `Shares`: at least one participant and a positive share total
    /// - every mode: no user appears twice
    ///
    /// # Errors
    ///
    /// Returns the first rule the selection violates.
    pub fn validate_selection(selection: &SplitSelection) -> Result<(), SplitError> {
        if selection.is_empty() {
            return Err(SplitError::NoParticipants);
        }

        let mut seen = HashSet::with_capacity(selection.participants.len());
        for participant in &selection.participants {
            if !seen.insert(participant.user_id) {
                return Err(SplitError::DuplicateParticipant(participant.user_id));
            }
        }

        if selection.mode == SplitMode::Shares
            && selection.participants.iter().all(|p| p.shares == 0)
        {
            return Err(SplitError::ZeroTotalWeight);
        }
        Ok(())
    }

    /// Check that custom amounts add up to the total within one minor unit.
    ///
    /// Returns the signed difference `sum(amounts) - total` on success.
    ///
    /// # Errors
    ///
    /// Returns `CustomSumMismatch` carrying the signed difference when it
    /// exceeds [`CUSTOM_TOLERANCE_MINOR`].
    pub fn validate_custom(
        amounts_minor: &[i64],
        total_minor: i64,
        decimals: u32,
    ) -> Result<i64, SplitError> {
        let sum: i128 = amounts_minor.iter().map(|&a| i128::from(a)).sum();
        let delta = i64::try_from(sum - i128::from(total_minor))
            .map_err(|_| SplitError::AmountOverflow)?;

        if delta.abs() > CUSTOM_TOLERANCE_MINOR {
            return Err(SplitError::CustomSumMismatch {
                delta: MinorUnitConverter::from_minor(delta, decimals)?,
                delta_minor: delta,
            });
        }
        Ok(delta)
    }

    /// Check the output invariant: non-negative amounts summing to the total.
    ///
    /// # Errors
    ///
    /// Returns `AllocationMismatch` if the invariant does not hold.
    pub fn validate_allocation(
        allocations: &[PerPersonAllocation],
        total_minor: i64,
    ) -> Result<(), SplitError> {
        let sum: i128 = allocations
            .iter()
            .map(|a| i128::from(a.amount_minor))
            .sum();
        let negative = allocations.iter().any(|a| a.amount_minor < 0);

        if negative || sum != i128::from(total_minor) {
            return Err(SplitError::AllocationMismatch {
                expected: total_minor,
                actual: i64::try_from(sum).unwrap_or(i64::MAX),
            });
        }
        Ok(())
    }
}
