//! Rebuilding wage grids from increase ratios, the 60%-FTE series, and the
//! astro-over-base floor.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::common::fte60_factor;
use super::increases::{cell, grow};
use crate::{IncreaseGrid, Level, WageGrid, WageModelError, Year};

/// A cell raised to the base scale by [`enforce_floor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorAdjustment {
    pub level: Level,
    pub year: Year,
    /// Astro wage produced by the recompute, before clamping.
    pub astro: Decimal,
    /// Base wage the cell was clamped to.
    pub base: Decimal,
}

/// Derives the 60%-FTE astro rate: `trunc(base × 1.2)` per cell.
///
/// # Errors
///
/// Returns [`WageModelError::DataFormat`] if a base wage is too large to
/// scale.
pub fn derive_fte60(base: &WageGrid) -> Result<WageGrid, WageModelError> {
    let factor = fte60_factor();
    WageGrid::try_from_fn(base.years().to_vec(), |level, year| {
        let wage = cell(base, level, year)?;
        wage.checked_mul(factor)
            .map(|scaled| scaled.trunc())
            .ok_or_else(|| {
                WageModelError::DataFormat(format!(
                    "base wage {wage} for {level} in {year} is too large"
                ))
            })
    })
}

/// Rebuilds a wage grid by compounding `gross` onto the first year of
/// `wages`, over the full year range.
///
/// `wage(L, Y) = wage(L, Y - 1) × gross(L, Y)`. The first year keeps its
/// value; every later year is recomputed even if its ratio is unchanged.
///
/// # Errors
///
/// - [`WageModelError::DataFormat`] if `gross` lacks a year of `wages`
///   other than the first.
/// - [`WageModelError::InvalidRate`] if compounding overflows.
pub fn wages_from_increases(
    wages: &WageGrid,
    gross: &IncreaseGrid,
) -> Result<WageGrid, WageModelError> {
    let first_year = wages.first_year();
    let mut running = Decimal::ZERO;
    WageGrid::try_from_fn(wages.years().to_vec(), |level, year| {
        running = if Some(year) == first_year {
            cell(wages, level, year)?
        } else {
            grow(running, cell(gross, level, year)?, level, year)?
        };
        Ok(running)
    })
}

/// Advances the frozen 60%-FTE grid one year along the base raises.
///
/// Unlike [`wages_from_increases`], each year starts from the *frozen*
/// prior-year value rather than the recomputed one:
/// `projection(L, Y) = fte60(L, Y - 1) × base_gross(L, Y)`. The first year
/// is copied unchanged.
pub fn fte60_projection(
    fte60: &WageGrid,
    base_gross: &IncreaseGrid,
) -> Result<WageGrid, WageModelError> {
    let first_year = fte60.first_year();
    WageGrid::try_from_fn(fte60.years().to_vec(), |level, year| {
        if Some(year) == first_year {
            cell(fte60, level, year)
        } else {
            grow(
                cell(fte60, level, year - 1)?,
                cell(base_gross, level, year)?,
                level,
                year,
            )
        }
    })
}

/// Clamps every astro cell that does not pay more than base up to the base
/// value.
///
/// Cells are compared on their whole-currency part, so an astro wage that
/// exceeds base by less than one unit still counts as "not above base".
/// Returns the clamped grid and one [`FloorAdjustment`] per cell whose value
/// actually changed.
///
/// # Errors
///
/// Returns [`WageModelError::DataFormat`] if the grids cover different years.
pub fn enforce_floor(
    astro: &WageGrid,
    base: &WageGrid,
) -> Result<(WageGrid, Vec<FloorAdjustment>), WageModelError> {
    let clamped = astro.zip_map(base, |astro, base| {
        if astro.trunc() <= base.trunc() { base } else { astro }
    })?;

    let adjustments: Vec<FloorAdjustment> = astro
        .cells()
        .zip(base.cells())
        .filter(|((_, _, astro), (_, _, base))| astro.trunc() <= base.trunc() && astro != base)
        .map(|((level, year, astro), (_, _, base))| FloorAdjustment {
            level,
            year,
            astro,
            base,
        })
        .collect();

    debug!(adjusted = adjustments.len(), "enforced astro floor");
    Ok((clamped, adjustments))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::Grid;
    use crate::calculations::gross_increases;

    fn grid(rows: [[Decimal; 3]; 3]) -> WageGrid {
        Grid::from_fn(vec![2020, 2021, 2022], |level, year| {
            rows[level.index()][(year - 2020) as usize]
        })
    }

    // =========================================================================
    // derive_fte60 tests
    // =========================================================================

    #[test]
    fn derive_fte60_truncates_after_scaling() {
        let base = grid([
            [dec!(1000), dec!(1001), dec!(2999.99)],
            [dec!(1234), dec!(0), dec!(1)],
            [dec!(999.9), dec!(10), dec!(5)],
        ]);

        let fte60 = derive_fte60(&base).unwrap();

        // 1001 * 1.2 = 1201.2, 2999.99 * 1.2 = 3599.988, 1234 * 1.2 = 1480.8
        assert_eq!(fte60.row(Level::Premaster), &[dec!(1200), dec!(1201), dec!(3599)]);
        assert_eq!(fte60.row(Level::Intermediate), &[dec!(1480), dec!(0), dec!(1)]);
        assert_eq!(fte60.row(Level::Candidate), &[dec!(1199), dec!(12), dec!(6)]);
    }

    #[test]
    fn derive_fte60_rejects_wage_too_large_to_scale() {
        let base = grid([[Decimal::MAX; 3], [dec!(1); 3], [dec!(1); 3]]);

        let result = derive_fte60(&base);

        assert!(matches!(result, Err(WageModelError::DataFormat(msg)) if msg.contains("premaster in 2020")));
    }

    // =========================================================================
    // wages_from_increases tests
    // =========================================================================

    #[test]
    fn wages_from_increases_reproduces_source_grid() {
        let wages = grid([
            [dec!(1000), dec!(1030), dec!(1081.5)],
            [dec!(2000), dec!(2100), dec!(2100)],
            [dec!(3000), dec!(2850), dec!(2992.5)],
        ]);
        let gross = gross_increases(&wages).unwrap();

        let rebuilt = wages_from_increases(&wages, &gross).unwrap();

        assert_eq!(rebuilt, wages);
    }

    #[test]
    fn wages_from_increases_cascades_edits_forward() {
        let wages = grid([
            [dec!(1000), dec!(1000), dec!(1000)],
            [dec!(2000), dec!(2000), dec!(2000)],
            [dec!(3000), dec!(3000), dec!(3000)],
        ]);
        let mut gross = gross_increases(&wages).unwrap();
        gross.set(Level::Premaster, 2021, dec!(1.1));

        let rebuilt = wages_from_increases(&wages, &gross).unwrap();

        assert_eq!(rebuilt.row(Level::Premaster), &[dec!(1000), dec!(1100), dec!(1100)]);
        assert_eq!(rebuilt.row(Level::Intermediate), wages.row(Level::Intermediate));
    }

    #[test]
    fn wages_from_increases_requires_every_later_year() {
        let wages = grid([[dec!(1); 3]; 3]);
        let gross = Grid::from_fn(vec![2021], |_, _| dec!(1));

        let result = wages_from_increases(&wages, &gross);

        assert!(matches!(result, Err(WageModelError::DataFormat(_))));
    }

    #[test]
    fn wages_from_increases_reports_overflow_as_invalid_rate() {
        let wages = grid([[dec!(1000); 3]; 3]);
        let mut gross = gross_increases(&wages).unwrap();
        gross.set(Level::Candidate, 2021, Decimal::MAX);

        let result = wages_from_increases(&wages, &gross);

        assert!(matches!(result, Err(WageModelError::InvalidRate { .. })));
    }

    // =========================================================================
    // fte60_projection tests
    // =========================================================================

    #[test]
    fn fte60_projection_steps_from_frozen_prior_year() {
        let fte60 = grid([
            [dec!(1200), dec!(1200), dec!(1200)],
            [dec!(2400), dec!(2400), dec!(2400)],
            [dec!(3600), dec!(3600), dec!(3600)],
        ]);
        let base_gross = Grid::from_fn(vec![2021, 2022], |_, _| dec!(1.1));

        let projection = fte60_projection(&fte60, &base_gross).unwrap();

        // Not compounded: 2022 is 1200 * 1.1, not 1320 * 1.1.
        assert_eq!(
            projection.row(Level::Premaster),
            &[dec!(1200), dec!(1320), dec!(1320)]
        );
        assert_eq!(projection.get(Level::Candidate, 2022), Some(dec!(3960)));
    }

    // =========================================================================
    // enforce_floor tests
    // =========================================================================

    #[test]
    fn enforce_floor_clamps_astro_below_base() {
        let base = grid([[dec!(1000); 3]; 3]);
        let astro = grid([
            [dec!(1200), dec!(900), dec!(1100)],
            [dec!(1000), dec!(1000.5), dec!(1001)],
            [dec!(999.99), dec!(1500), dec!(1500)],
        ]);

        let (clamped, adjustments) = enforce_floor(&astro, &base).unwrap();

        assert_eq!(clamped.row(Level::Premaster), &[dec!(1200), dec!(1000), dec!(1100)]);
        // 1000.5 truncates to 1000 and so is pulled back to base.
        assert_eq!(clamped.row(Level::Intermediate), &[dec!(1000), dec!(1000), dec!(1001)]);
        assert_eq!(clamped.row(Level::Candidate), &[dec!(1000), dec!(1500), dec!(1500)]);
        assert_eq!(
            adjustments,
            vec![
                FloorAdjustment {
                    level: Level::Premaster,
                    year: 2021,
                    astro: dec!(900),
                    base: dec!(1000),
                },
                FloorAdjustment {
                    level: Level::Intermediate,
                    year: 2021,
                    astro: dec!(1000.5),
                    base: dec!(1000),
                },
                FloorAdjustment {
                    level: Level::Candidate,
                    year: 2020,
                    astro: dec!(999.99),
                    base: dec!(1000),
                },
            ]
        );
    }

    #[test]
    fn enforce_floor_leaves_higher_astro_untouched() {
        let base = grid([[dec!(1000); 3]; 3]);
        let astro = grid([[dec!(1500); 3]; 3]);

        let (clamped, adjustments) = enforce_floor(&astro, &base).unwrap();

        assert_eq!(clamped, astro);
        assert!(adjustments.is_empty());
    }
}
