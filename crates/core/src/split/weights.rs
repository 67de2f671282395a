//! Weight derivation from a split selection.

use rust_decimal::Decimal;

use super::converter::MinorUnitConverter;
use super::error::SplitError;
use super::types::{SplitMode, SplitSelection};

/// Weights handed to the distributor, or a signal that amounts are direct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Weights {
    /// Proportional weights in participant order.
    Proportional(Vec<u64>),
    /// Custom mode: amounts are taken as entered.
    Direct,
}

/// Turns a [`SplitSelection`] into the input of the allocation step.
pub struct WeightAllocator;

impl WeightAllocator {
    /// Derive the weight vector for a selection.
    ///
    /// - `Equal`: every participant weighs `1`
    /// - `Shares`: the participant's share count; `0` keeps the participant
    ///   in the roster with a zero amount
    /// - `Custom`: [`Weights::Direct`], no proportional computation
    ///
    /// # Errors
    ///
    /// Returns `NoParticipants` for an empty selection and `ZeroTotalWeight`
    /// when every share count is zero.
    pub fn weights(selection: &SplitSelection) -> Result<Weights, SplitError> {
        if selection.is_empty() {
            return Err(SplitError::NoParticipants);
        }

        match selection.mode {
            SplitMode::Equal => {
                let count = selection.participants.len();
                Ok(Weights::Proportional(vec![1; count]))
            }
            SplitMode::Shares => {
                let weights: Vec<u64> = selection
                    .participants
                    .iter()
                    .map(|p| u64::from(p.shares))
                    .collect();
                if weights.iter().all(|&w| w == 0) {
                    return Err(SplitError::ZeroTotalWeight);
                }
                Ok(Weights::Proportional(weights))
            }
            SplitMode::Custom => Ok(Weights::Direct),
        }
    }

    /// Convert each participant's custom amount into minor units.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount is negative or cannot be converted.
    pub fn direct_amounts(
        selection: &SplitSelection,
        decimals: u32,
    ) -> Result<Vec<i64>, SplitError> {
        selection
            .participants
            .iter()
            .map(|p| {
                if p.custom_amount < Decimal::ZERO {
                    return Err(SplitError::NegativeAmount(p.user_id));
                }
                Ok(MinorUnitConverter::to_minor(p.custom_amount, decimals)?)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::types::Participant;
    use fairshare_shared::types::UserId;
    use rust_decimal_macros::dec;

    fn roster(mode: SplitMode, shares: &[u32]) -> SplitSelection {
        let participants = shares
            .iter()
            .zip(1_i64..)
            .map(|(&s, id)| {
                Participant::new(UserId::new(id), format!("member {id}")).with_shares(s)
            })
            .collect();
        SplitSelection::new(mode, participants)
    }

    #[test]
    fn test_equal_weights_ignore_shares() {
        let selection = roster(SplitMode::Equal, &[5, 0, 2]);
        assert_eq!(
            WeightAllocator::weights(&selection).unwrap(),
            Weights::Proportional(vec![1, 1, 1])
        );
    }

    #[test]
    fn test_share_weights() {
        let selection = roster(SplitMode::Shares, &[1, 0, 3]);
        assert_eq!(
            WeightAllocator::weights(&selection).unwrap(),
            Weights::Proportional(vec![1, 0, 3])
        );
    }

    #[test]
    fn test_all_zero_shares() {
        let selection = roster(SplitMode::Shares, &[0, 0]);
        assert_eq!(
            WeightAllocator::weights(&selection),
            Err(SplitError::ZeroTotalWeight)
        );
    }

    #[test]
    fn test_empty_selection() {
        for mode in [SplitMode::Equal, SplitMode::Shares, SplitMode::Custom] {
            assert_eq!(
                WeightAllocator::weights(&roster(mode, &[])),
                Err(SplitError::NoParticipants)
            );
        }
    }

    #[test]
    fn test_custom_is_direct() {
        let selection = roster(SplitMode::Custom, &[0, 0]);
        assert_eq!(WeightAllocator::weights(&selection).unwrap(), Weights::Direct);
    }

    #[test]
    fn test_direct_amounts() {
        let selection = SplitSelection::new(
            SplitMode::Custom,
            vec![
                Participant::new(UserId::new(1), "a").with_custom_amount(dec!(10.005)),
                Participant::new(UserId::new(2), "b").with_custom_amount(dec!(0)),
                Participant::new(UserId::new(3), "c").with_custom_amount(dec!(89.99)),
            ],
        );
        assert_eq!(
            WeightAllocator::direct_amounts(&selection, 2).unwrap(),
            vec![1001, 0, 8999]
        );
    }

    #[test]
    fn test_direct_amounts_negative() {
        let selection = SplitSelection::new(
            SplitMode::Custom,
            vec![Participant::new(UserId::new(4), "d").with_custom_amount(dec!(-1))],
        );
        assert_eq!(
            WeightAllocator::direct_amounts(&selection, 2),
            Err(SplitError::NegativeAmount(UserId::new(4)))
        );
    }
}
