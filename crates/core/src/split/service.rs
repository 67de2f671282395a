//! Split service: selection in, transaction payload out.
//!
//! Pipeline:
//! 1. Validate the request and convert the total to minor units
//! 2. Derive weights and distribute, or take custom amounts as entered
//! 3. Check the sum invariant and build the payload

use fairshare_shared::config::{AllocationConfig, TieBreak};
use tracing::debug;

use super::converter::MinorUnitConverter;
use super::distributor::FairDistributor;
use super::error::SplitError;
use super::types::{
    AllocationLine, Participant, PerPersonAllocation, SplitMode, SplitPayload, SplitRequest,
};
use super::validation::SplitValidator;
use super::weights::{WeightAllocator, Weights};

/// Split service for allocation and payload building.
#[derive(Debug, Clone, Default)]
pub struct SplitService {
    config: AllocationConfig,
}

impl SplitService {
    /// Create a split service.
    #[must_use]
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    /// Allocate the request total among its participants.
    ///
    /// Allocations come back in the selection's order, one per participant.
    ///
    /// # Errors
    ///
    /// Returns a [`SplitError`] describing why the selection cannot be submitted.
    pub fn allocate(
        &self,
        request: &SplitRequest,
    ) -> Result<Vec<PerPersonAllocation>, SplitError> {
        let total_minor = SplitValidator::validate(request)?;
        let selection = &request.selection;
        let decimals = request.currency.decimals;

        let order = self.ranking_order(&selection.participants);
        let amounts = match WeightAllocator::weights(selection)? {
            Weights::Proportional(weights) => {
                let ranked: Vec<u64> = order.iter().map(|&i| weights[i]).collect();
                let distributed = FairDistributor::distribute(total_minor, &ranked)?;

                let mut amounts = vec![0; weights.len()];
                for (&index, amount) in order.iter().zip(distributed) {
                    amounts[index] = amount;
                }
                amounts
            }
            Weights::Direct => {
                let mut amounts = WeightAllocator::direct_amounts(selection, decimals)?;
                let delta = custom_delta(&amounts, total_minor)?;
                if delta != 0 {
                    absorb_delta(&mut amounts, &order, delta);
                }
                amounts
            }
        };

        let allocations: Vec<PerPersonAllocation> = selection
            .participants
            .iter()
            .zip(amounts)
            .map(|(p, amount_minor)| PerPersonAllocation {
                user_id: p.user_id,
                amount_minor,
            })
            .collect();

        SplitValidator::validate_allocation(&allocations, total_minor)?;

        debug!(
            mode = %selection.mode,
            participants = allocations.len(),
            total_minor,
            "Split allocated"
        );

        Ok(allocations)
    }

    /// Allocate and build the split section of the transaction request.
    ///
    /// # Errors
    ///
    /// Returns a [`SplitError`] describing why the selection cannot be submitted.
    pub fn build_payload(&self, request: &SplitRequest) -> Result<SplitPayload, SplitError> {
        let allocations = self.allocate(request)?;
        let decimals = request.currency.decimals;
        let mode = request.selection.mode;

        let lines = allocations
            .iter()
            .zip(&request.selection.participants)
            .map(|(allocation, participant)| {
                Ok(AllocationLine {
                    user_id: allocation.user_id,
                    amount_minor: allocation.amount_minor,
                    amount: MinorUnitConverter::from_minor(allocation.amount_minor, decimals)?,
                    shares: (mode == SplitMode::Shares).then_some(participant.shares),
                })
            })
            .collect::<Result<Vec<_>, SplitError>>()?;

        let total_minor = MinorUnitConverter::to_minor(request.total, decimals)?;

        Ok(SplitPayload {
            mode,
            currency: request.currency.code.to_ascii_uppercase(),
            total_minor,
            total: MinorUnitConverter::from_minor(total_minor, decimals)?,
            allocations: lines,
        })
    }

    /// Participant indices in tie-break order.
    fn ranking_order(&self, participants: &[Participant]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..participants.len()).collect();
        if self.config.tie_break == TieBreak::ParticipantId {
            order.sort_by_key(|&i| participants[i].user_id);
        }
        order
    }
}

/// Signed difference `sum(amounts) - total` of already validated custom amounts.
fn custom_delta(amounts: &[i64], total_minor: i64) -> Result<i64, SplitError> {
    let sum: i128 = amounts.iter().map(|&a| i128::from(a)).sum();
    i64::try_from(sum - i128::from(total_minor)).map_err(|_| SplitError::AmountOverflow)
}

/// Fold a one-unit custom rounding difference into the largest amount.
///
/// The first participant in `order` wins ties, so the result stays deterministic.
fn absorb_delta(amounts: &mut [i64], order: &[usize], delta: i64) {
    let Some(&largest) = order
        .iter()
        .reduce(|best, i| if amounts[*i] > amounts[*best] { i } else { best })
    else {
        return;
    };
    amounts[largest] -= delta;
}
