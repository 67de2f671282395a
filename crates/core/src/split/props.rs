//! Property-based tests for split allocation.
//!
//! - Exactness: allocations always sum to the total
//! - Boundedness: each allocation is the floor of its exact share or one more
//! - Determinism: identical inputs give identical outputs
//! - Custom validity: custom mode is valid iff within one minor unit

use proptest::prelude::*;
use rust_decimal::Decimal;

use fairshare_shared::types::{Currency, UserId};

use super::distributor::FairDistributor;
use super::service::SplitService;
use super::types::{Participant, SplitMode, SplitRequest, SplitSelection};
use super::validation::SplitValidator;

/// Strategy to generate totals in minor units (0 to 10,000,000.00).
fn total_minor() -> impl Strategy<Value = i64> {
    0i64..1_000_000_000i64
}

/// Strategy to generate weight vectors with at least one positive weight.
fn weights() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..1_000, 1..40).prop_filter("total weight must be positive", |w| {
        w.iter().any(|&x| x > 0)
    })
}

fn exact_floor(total: i64, weight: u64, weight_sum: u64) -> i128 {
    i128::from(total) * i128::from(weight) / i128::from(weight_sum)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* total and weights, the allocations SHALL sum to the total.
    #[test]
    fn prop_distribute_sum_invariant(total in total_minor(), weights in weights()) {
        let result = FairDistributor::distribute(total, &weights).unwrap();
        prop_assert_eq!(result.len(), weights.len());
        prop_assert_eq!(result.iter().sum::<i64>(), total);
    }

    /// *For any* total and weights, each allocation SHALL be the floor of the
    /// exact share or one more.
    #[test]
    fn prop_distribute_bounded(total in total_minor(), weights in weights()) {
        let result = FairDistributor::distribute(total, &weights).unwrap();
        let weight_sum: u64 = weights.iter().sum();

        for (i, (&amount, &weight)) in result.iter().zip(&weights).enumerate() {
            let floor = exact_floor(total, weight, weight_sum);
            let amount = i128::from(amount);
            prop_assert!(
                amount == floor || amount == floor + 1,
                "Allocation {} = {} outside [{}, {}]",
                i, amount, floor, floor + 1
            );
        }
    }

    /// *For any* weight of zero, the allocation SHALL be zero.
    #[test]
    fn prop_distribute_zero_weight_gets_zero(total in total_minor(), weights in weights()) {
        let result = FairDistributor::distribute(total, &weights).unwrap();
        for (&amount, &weight) in result.iter().zip(&weights) {
            if weight == 0 {
                prop_assert_eq!(amount, 0);
            }
        }
    }

    /// *For any* input, calling distribute twice SHALL produce the same result.
    #[test]
    fn prop_distribute_deterministic(total in total_minor(), weights in weights()) {
        let first = FairDistributor::distribute(total, &weights).unwrap();
        let second = FairDistributor::distribute(total, &weights).unwrap();
        prop_assert_eq!(first, second);
    }

    /// *For any* roster order, the participant-id tie-break SHALL give each
    /// user the same amount.
    #[test]
    fn prop_service_order_independent(
        total in total_minor(),
        shares in prop::collection::vec(1u32..10, 1..12),
    ) {
        let participants: Vec<Participant> = shares
            .iter()
            .zip(1_i64..)
            .map(|(&s, id)| Participant::new(UserId::new(id), "m").with_shares(s))
            .collect();
        let mut reversed = participants.clone();
        reversed.reverse();

        let currency = Currency::new("USD", "$", 2).unwrap();
        let make = |participants: Vec<Participant>| SplitRequest {
            total: Decimal::new(total, 2),
            currency: currency.clone(),
            selection: SplitSelection::new(SplitMode::Shares, participants),
        };

        let service = SplitService::default();
        let mut a = service.allocate(&make(participants)).unwrap();
        let mut b = service.allocate(&make(reversed)).unwrap();
        a.sort_by_key(|x| x.user_id);
        b.sort_by_key(|x| x.user_id);
        prop_assert_eq!(a, b);
    }

    /// *For any* custom amounts, validation SHALL succeed iff the sum is within
    /// one minor unit of the total.
    #[test]
    fn prop_custom_validity_law(
        amounts in prop::collection::vec(0i64..100_000, 1..10),
        offset in -5i64..=5,
    ) {
        let sum: i64 = amounts.iter().sum();
        let total = sum - offset;
        prop_assume!(total >= 0);

        let result = SplitValidator::validate_custom(&amounts, total, 2);
        prop_assert_eq!(result.is_ok(), offset.abs() <= 1);
    }

    /// *For any* accepted custom split, the produced allocation SHALL sum to
    /// the total.
    #[test]
    fn prop_custom_allocation_exact(
        cents in prop::collection::vec(0i64..100_000, 1..10),
        offset in -1i64..=1,
    ) {
        let sum: i64 = cents.iter().sum();
        let total = sum - offset;
        prop_assume!(total >= 0);

        let participants = cents
            .iter()
            .zip(1_i64..)
            .map(|(&c, id)| {
                Participant::new(UserId::new(id), "m").with_custom_amount(Decimal::new(c, 2))
            })
            .collect();
        let request = SplitRequest {
            total: Decimal::new(total, 2),
            currency: Currency::new("EUR", "€", 2).unwrap(),
            selection: SplitSelection::new(SplitMode::Custom, participants),
        };

        let result = SplitService::default().allocate(&request).unwrap();
        prop_assert_eq!(result.iter().map(|a| a.amount_minor).sum::<i64>(), total);
        prop_assert!(result.iter().all(|a| a.amount_minor >= 0));
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    // =========================================================================
    // Scenarios - Specific Examples
    // =========================================================================

    /// 100 minor units among 3 equal participants.
    #[test]
    fn test_equal_non_divisible() {
        let result = FairDistributor::distribute(100, &[1, 1, 1]).unwrap();
        assert_eq!(result.iter().sum::<i64>(), 100);
        assert!(result.iter().all(|&a| a == 33 || a == 34));
        assert_eq!(result, vec![34, 33, 33]);
    }

    /// Shares [1, 1, 2] of 100 divide exactly.
    #[test]
    fn test_shares_divisible() {
        assert_eq!(
            FairDistributor::distribute(100, &[1, 1, 2]).unwrap(),
            vec![25, 25, 50]
        );
    }

    /// Shares [1, 1, 1] of 100 give the extra unit to the first position.
    #[test]
    fn test_shares_non_divisible() {
        assert_eq!(
            FairDistributor::distribute(100, &[1, 1, 1]).unwrap(),
            vec![34, 33, 33]
        );
    }
}
