//! Inflation-adjusted wage series.

use rust_decimal::Decimal;
use tracing::debug;

use super::increases::{cell, grow};
use crate::models::describe_years;
use crate::{IncreaseGrid, RealWageGrid, WageGrid, WageModelError, Year};

/// Restates `seed` in `base_year` currency by chaining net increases.
///
/// The result covers `base_year` through the last year of `seed`. At the
/// base year the real wage equals the nominal seed value; every later year
/// is the prior real wage times that year's net increase.
///
/// # Errors
///
/// Returns [`WageModelError::DataFormat`] if `base_year` is not a year of
/// `seed`, or if `net` has no ratio for a year after `base_year`, and
/// [`WageModelError::InvalidRate`] if chaining overflows.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_core::calculations::real_wages;
/// use wage_core::{Grid, Level};
///
/// let nominal = Grid::from_fn(vec![2021, 2022], |_, _| dec!(2000));
/// let net = Grid::from_fn(vec![2022], |_, _| dec!(0.95));
///
/// let real = real_wages(&nominal, &net, 2021).unwrap();
///
/// assert_eq!(real.get(Level::Candidate, 2021), Some(dec!(2000)));
/// assert_eq!(real.get(Level::Candidate, 2022), Some(dec!(1900)));
/// ```
pub fn real_wages(
    seed: &WageGrid,
    net: &IncreaseGrid,
    base_year: Year,
) -> Result<RealWageGrid, WageModelError> {
    if !seed.contains_year(base_year) {
        return Err(WageModelError::DataFormat(format!(
            "base year {base_year} is outside the wage years {}",
            describe_years(seed.years())
        )));
    }

    let years: Vec<Year> = seed
        .years()
        .iter()
        .copied()
        .filter(|&year| year >= base_year)
        .collect();

    let year_count = years.len();
    let mut running = Decimal::ZERO;
    let real = RealWageGrid::try_from_fn(years, |level, year| {
        running = if year == base_year {
            cell(seed, level, year)?
        } else {
            grow(running, cell(net, level, year)?, level, year)?
        };
        Ok(running)
    })?;

    debug!(base_year, years = year_count, "computed real wages");
    Ok(real)
}
