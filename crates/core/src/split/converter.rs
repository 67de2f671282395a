//! Conversion between major (decimal) and minor (integer) currency units.
//!
//! CRITICAL: Rounding happens exactly once, when a user-entered major amount
//! enters the pipeline. Everything downstream works on integer minor units and
//! only turns back into decimals at the display boundary.

use fairshare_shared::types::MAX_DECIMALS;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::error::ConversionError;

/// Converter between major and minor units.
///
/// Uses `RoundingStrategy::MidpointAwayFromZero`, so `0.005` at 2 decimals
/// becomes `1` and `-0.005` becomes `-1`.
pub struct MinorUnitConverter;

impl MinorUnitConverter {
    /// Convert a major-unit amount into integer minor units.
    ///
    /// # Errors
    ///
    /// Returns an error if `decimals` exceeds [`MAX_DECIMALS`] or the result
    /// does not fit in an `i64`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use fairshare_core::split::MinorUnitConverter;
    ///
    /// assert_eq!(MinorUnitConverter::to_minor(dec!(12.345), 2).unwrap(), 1235);
    /// assert_eq!(MinorUnitConverter::to_minor(dec!(1500), 0).unwrap(), 1500);
    /// ```
    pub fn to_minor(amount: Decimal, decimals: u32) -> Result<i64, ConversionError> {
        let factor = Self::factor(decimals)?;
        let overflow = || ConversionError::Overflow { amount, decimals };

        amount
            .checked_mul(factor)
            .ok_or_else(overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(overflow)
    }

    /// Convert integer minor units back into a major-unit amount.
    ///
    /// The result carries exactly `decimals` fractional digits, so `-200` at
    /// 2 decimals is `-2.00`.
    ///
    /// # Errors
    ///
    /// Returns an error if `decimals` exceeds [`MAX_DECIMALS`].
    pub fn from_minor(amount_minor: i64, decimals: u32) -> Result<Decimal, ConversionError> {
        Self::check_precision(decimals)?;
        Ok(Decimal::new(amount_minor, decimals))
    }

    /// Render minor units as a fixed-scale major-unit string.
    ///
    /// # Errors
    ///
    /// Returns an error if `decimals` exceeds [`MAX_DECIMALS`].
    pub fn format(amount_minor: i64, decimals: u32) -> Result<String, ConversionError> {
        Ok(Self::from_minor(amount_minor, decimals)?.to_string())
    }

    fn factor(decimals: u32) -> Result<Decimal, ConversionError> {
        Self::check_precision(decimals)?;
        Ok(Decimal::from(10_i64.pow(decimals)))
    }

    fn check_precision(decimals: u32) -> Result<(), ConversionError> {
        if decimals > MAX_DECIMALS {
            return Err(ConversionError::InvalidPrecision(decimals));
        }
        Ok(())
    }
}
