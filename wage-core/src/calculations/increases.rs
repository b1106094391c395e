//! Year-over-year increase ratios.
//!
//! Gross increases come straight from the wage grids; net increases divide
//! out the year's inflation so that a ratio above 1 means purchasing power
//! went up.

use rust_decimal::Decimal;
use tracing::debug;

use super::common::ratio_to_percent;
use crate::{IncreaseGrid, InflationTable, Level, WageGrid, WageModelError, Year};

/// Computes `wage(L, Y) / wage(L, Y - 1)` for every year but the first.
///
/// # Errors
///
/// Returns [`WageModelError::DataFormat`] if a prior-year wage is zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_core::calculations::gross_increases;
/// use wage_core::{Grid, Level};
///
/// let wages = Grid::from_fn(vec![2020, 2021], |_, year| {
///     if year == 2020 { dec!(1000) } else { dec!(1030) }
/// });
/// let gross = gross_increases(&wages).unwrap();
///
/// assert_eq!(gross.years(), &[2021]);
/// assert_eq!(gross.get(Level::Premaster, 2021), Some(dec!(1.03)));
/// ```
pub fn gross_increases(wages: &WageGrid) -> Result<IncreaseGrid, WageModelError> {
    let years = wages.years().iter().skip(1).copied().collect();
    let gross = IncreaseGrid::try_from_fn(years, |level, year| {
        let current = cell(wages, level, year)?;
        let previous = cell(wages, level, year - 1)?;
        current.checked_div(previous).ok_or_else(|| {
            WageModelError::DataFormat(format!(
                "cannot compute increase for {level} {year}: {} wage is zero",
                year - 1
            ))
        })
    })?;
    debug!(years = gross.years().len(), "computed gross increases");
    Ok(gross)
}

/// Computes `gross(L, Y) / (1 + inflation(Y) / 100)` for every cell.
///
/// # Errors
///
/// Returns [`WageModelError::DataFormat`] if the inflation table has no rate
/// for one of the years, or a rate of exactly -100%.
pub fn net_increases(
    gross: &IncreaseGrid,
    inflation: &InflationTable,
) -> Result<IncreaseGrid, WageModelError> {
    let net = IncreaseGrid::try_from_fn(gross.years().to_vec(), |level, year| {
        let factor = inflation.factor(year).ok_or_else(|| {
            WageModelError::DataFormat(format!("no inflation rate for {year}"))
        })?;
        cell(gross, level, year)?
            .checked_div(factor)
            .ok_or_else(|| {
                WageModelError::DataFormat(format!("inflation for {year} leaves no net increase"))
            })
    })?;
    debug!(years = net.years().len(), "computed net increases");
    Ok(net)
}

/// Multiplies a wage by a growth ratio, reporting overflow as an unusable
/// rate.
pub(crate) fn grow(
    wage: Decimal,
    ratio: Decimal,
    level: Level,
    year: Year,
) -> Result<Decimal, WageModelError> {
    wage.checked_mul(ratio).ok_or_else(|| WageModelError::InvalidRate {
        rate: format!("{}%", ratio_to_percent(ratio).normalize()),
        reason: format!("the {level} wage for {year} would overflow"),
    })
}

pub(crate) fn cell(
    grid: &crate::Grid,
    level: Level,
    year: Year,
) -> Result<Decimal, WageModelError> {
    grid.get(level, year).ok_or_else(|| {
        WageModelError::DataFormat(format!("no value for {level} in {year}"))
    })
}
