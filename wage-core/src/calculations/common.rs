//! Common utility functions for wage calculations.
//!
//! Conversions between conventional percentages and ratios, and the parsing
//! of user-entered rates, shared by the pipeline stages and the override
//! operations.

use rust_decimal::Decimal;

use crate::WageModelError;

/// Multiplier applied to base pay to obtain the 60%-FTE astro rate.
pub fn fte60_factor() -> Decimal {
    Decimal::new(12, 1)
}

/// Converts a conventional percentage into a growth ratio.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_core::calculations::common::percent_to_ratio;
///
/// assert_eq!(percent_to_ratio(dec!(3)), dec!(1.03));
/// assert_eq!(percent_to_ratio(dec!(-2.5)), dec!(0.975));
/// ```
pub fn percent_to_ratio(percent: Decimal) -> Decimal {
    Decimal::ONE + percent / Decimal::ONE_HUNDRED
}

/// Converts a growth ratio back into a conventional percentage.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_core::calculations::common::ratio_to_percent;
///
/// assert_eq!(ratio_to_percent(dec!(1.05)), dec!(5));
/// ```
///
/// Saturates at the bounds of [`Decimal`] rather than overflowing.
pub fn ratio_to_percent(ratio: Decimal) -> Decimal {
    ratio
        .saturating_sub(Decimal::ONE)
        .saturating_mul(Decimal::ONE_HUNDRED)
}

/// Parses a user-entered percentage such as `"3"`, `" 2.5 "` or `"4%"`.
///
/// # Errors
///
/// Returns [`WageModelError::InvalidRate`] if the text is not a number.
pub fn parse_percent(text: &str) -> Result<Decimal, WageModelError> {
    let trimmed = text.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    number
        .parse::<Decimal>()
        .map_err(|_| WageModelError::InvalidRate {
            rate: text.to_string(),
            reason: "inputted rate must be a number".to_string(),
        })
}

/// Parses a user-entered percentage and converts it to a ratio.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_core::calculations::common::parse_rate;
///
/// assert_eq!(parse_rate("3").unwrap(), dec!(1.03));
/// assert!(parse_rate("three").is_err());
/// ```
pub fn parse_rate(text: &str) -> Result<Decimal, WageModelError> {
    parse_percent(text).map(percent_to_ratio)
}
