//! Integer distribution using the Largest Remainder Method (Hare–Niemeyer).
//!
//! The Largest Remainder Method works by:
//! 1. Calculate exact proportional shares `T * W[i] / sum(W)`
//! 2. Round each share down
//! 3. Calculate the remainder (total - sum of rounded)
//! 4. Give one extra unit to the entries with the largest fractional parts
//!
//! All arithmetic is done on integers. Fractional parts are compared as the
//! numerators `T * W[i] mod sum(W)`, which share the denominator `sum(W)`, so
//! no rational or floating-point value is ever materialised.
//!
//! Ties between equal fractional parts go to the lower position in the weight
//! vector. Callers that want a different tie-break reorder the weights first.

use super::error::DistributionError;

/// Distributes an integer total over an integer weight vector.
///
/// Guarantees:
/// - Sum of the result EXACTLY equals the total
/// - Each entry is `floor(T * W[i] / sum(W))` or one more
/// - Output depends only on the total, the weights and their order
pub struct FairDistributor;

impl FairDistributor {
    /// Distribute `total` minor units proportionally to `weights`.
    ///
    /// # Errors
    ///
    /// Returns an error if `total` is negative or the weights sum to zero.
    ///
    /// # Example
    ///
    /// ```
    /// use fairshare_core::split::FairDistributor;
    ///
    /// // 100 / 3 = [34, 33, 33]
    /// assert_eq!(FairDistributor::distribute(100, &[1, 1, 1]).unwrap(), vec![34, 33, 33]);
    /// assert_eq!(FairDistributor::distribute(100, &[1, 1, 2]).unwrap(), vec![25, 25, 50]);
    /// ```
    pub fn distribute(total: i64, weights: &[u64]) -> Result<Vec<i64>, DistributionError> {
        let total_units =
            u128::try_from(total).map_err(|_| DistributionError::NegativeTotal(total))?;

        let weight_sum = weights
            .iter()
            .try_fold(0_u128, |acc, &w| acc.checked_add(u128::from(w)))
            .ok_or(DistributionError::Overflow)?;
        if weight_sum == 0 {
            return Err(DistributionError::ZeroTotalWeight);
        }

        // T < 2^63 and W[i] < 2^64, so the product always fits in 128 bits.
        let mut floors = Vec::with_capacity(weights.len());
        let mut fractions = Vec::with_capacity(weights.len());
        for (position, &weight) in weights.iter().enumerate() {
            let scaled = total_units * u128::from(weight);
            floors.push(scaled / weight_sum);
            fractions.push((position, scaled % weight_sum));
        }

        let allocated: u128 = floors.iter().sum();
        let remainder = usize::try_from(total_units - allocated)
            .map_err(|_| DistributionError::Overflow)?;

        if remainder > 0 {
            // Largest fractional part first, then lowest position.
            fractions.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            for &(position, _) in fractions.iter().take(remainder) {
                floors[position] += 1;
            }
        }

        floors
            .into_iter()
            .map(|amount| i64::try_from(amount).map_err(|_| DistributionError::Overflow))
            .collect()
    }

    /// Distribute `total` minor units evenly across `count` recipients.
    ///
    /// The first `total % count` recipients receive one extra unit.
    ///
    /// # Errors
    ///
    /// Returns an error if `total` is negative or `count` is zero.
    pub fn distribute_equal(total: i64, count: usize) -> Result<Vec<i64>, DistributionError> {
        Self::distribute(total, &vec![1; count])
    }
}
