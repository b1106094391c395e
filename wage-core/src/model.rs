//! The wage projection model.

use std::fmt;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::calculations::FloorAdjustment;
use crate::format::Report;
use crate::{
    ComparisonGrid, IncreaseGrid, InflationOverride, InflationTable, RaiseOverride,
    RealWageGrid, Snapshot, WageGrid, WageModelError, Year,
};

/// Year whose currency real wages are expressed in unless configured otherwise.
pub const DEFAULT_BASE_YEAR: Year = 2021;

/// Base and astro pay scales with every derived projection.
///
/// The model keeps the snapshot it was built with alongside the current one,
/// so [`WageModel::reset`] can discard all overrides without reloading the
/// source tables.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_core::{Grid, Level, WageModel};
///
/// let base = Grid::from_fn(vec![2020, 2021], |_, year| {
///     if year == 2020 { dec!(1000) } else { dec!(1030) }
/// });
/// let astro = Grid::from_fn(vec![2020, 2021], |_, _| dec!(1500));
///
/// let mut model = WageModel::new(base, astro).unwrap();
/// let clamped = model.set_raise_rate("astro", "premaster", &[(2021, "-50")]).unwrap();
///
/// assert_eq!(clamped.len(), 1);
/// assert_eq!(model.astro_wages().get(Level::Premaster, 2021), Some(dec!(1030)));
/// ```
#[derive(Debug, Clone)]
pub struct WageModel {
    initial: Snapshot,
    current: Snapshot,
}

impl WageModel {
    /// Builds a model with the default inflation table and base year.
    pub fn new(
        base_wages: WageGrid,
        astro_wages: WageGrid,
    ) -> Result<Self, WageModelError> {
        Self::with_settings(
            base_wages,
            astro_wages,
            InflationTable::default(),
            DEFAULT_BASE_YEAR,
        )
    }

    /// Builds a model with an explicit inflation table and base year.
    ///
    /// # Errors
    ///
    /// Returns [`WageModelError::DataFormat`] if the grids cover different
    /// years, `base_year` is outside them, a wage is zero, or `inflation`
    /// lacks a rate for one of the years after the first.
    pub fn with_settings(
        base_wages: WageGrid,
        astro_wages: WageGrid,
        inflation: InflationTable,
        base_year: Year,
    ) -> Result<Self, WageModelError> {
        let snapshot = Snapshot::compute(base_wages, astro_wages, inflation, base_year)?;
        debug!(
            base_year,
            first_year = snapshot.base_wages.first_year(),
            last_year = snapshot.base_wages.last_year(),
            "wage model constructed"
        );
        Ok(Self {
            initial: snapshot.clone(),
            current: snapshot,
        })
    }

    /// The latest set of computed grids.
    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    pub fn years(&self) -> &[Year] {
        self.current.base_wages.years()
    }

    pub fn base_year(&self) -> Year {
        self.current.base_year
    }

    pub fn inflation(&self) -> &InflationTable {
        &self.current.inflation
    }

    pub fn base_wages(&self) -> &WageGrid {
        &self.current.base_wages
    }

    pub fn astro_wages(&self) -> &WageGrid {
        &self.current.astro_wages
    }

    pub fn astro_wages_fte60(&self) -> &WageGrid {
        &self.current.astro_wages_fte60
    }

    pub fn fte60_projection(&self) -> &WageGrid {
        &self.current.fte60_projection
    }

    pub fn base_gross_increase(&self) -> &IncreaseGrid {
        &self.current.base_gross_increase
    }

    pub fn astro_gross_increase(&self) -> &IncreaseGrid {
        &self.current.astro_gross_increase
    }

    pub fn base_net_increase(&self) -> &IncreaseGrid {
        &self.current.base_net_increase
    }

    pub fn astro_net_increase(&self) -> &IncreaseGrid {
        &self.current.astro_net_increase
    }

    pub fn base_real_wages(&self) -> &RealWageGrid {
        &self.current.base_real_wages
    }

    pub fn astro_real_wages(&self) -> &RealWageGrid {
        &self.current.astro_real_wages
    }

    pub fn fte60_real_wages(&self) -> &RealWageGrid {
        &self.current.fte60_real_wages
    }

    /// Cells where astro pays no more than base, after rounding.
    pub fn astro_is_base(&self) -> ComparisonGrid {
        self.current.astro_is_base()
    }

    /// Overrides raise rates from raw text, as entered at a prompt.
    ///
    /// `rates` pairs each year with a percentage (`"3"` for 3%). Returns the
    /// astro cells that were clamped up to base by the recompute.
    ///
    /// # Errors
    ///
    /// - [`WageModelError::InvalidParameter`] for an unknown `track` or
    ///   `level`, or a year with no raise to override.
    /// - [`WageModelError::InvalidRate`] if a rate is not a number.
    ///
    /// The model is unchanged on error.
    pub fn set_raise_rate<S: AsRef<str>>(
        &mut self,
        track: &str,
        level: &str,
        rates: &[(Year, S)],
    ) -> Result<Vec<FloorAdjustment>, WageModelError> {
        let raise = RaiseOverride::parse(track, level, rates)?;
        self.apply_raise(&raise)
    }

    /// Applies a pre-validated raise override and recomputes every grid.
    pub fn apply_raise(
        &mut self,
        raise: &RaiseOverride,
    ) -> Result<Vec<FloorAdjustment>, WageModelError> {
        let (next, adjustments) = self.current.with_raise(raise)?;
        info!(
            track = %raise.track,
            level = %raise.level,
            years = ?raise.years().collect::<Vec<_>>(),
            clamped = adjustments.len(),
            "raise rates updated"
        );
        self.current = next;
        Ok(adjustments)
    }

    /// Overrides inflation for each of `years` with the matching entry of
    /// `rates` (in percent) and recomputes net increases and real wages.
    ///
    /// # Errors
    ///
    /// - [`WageModelError::LengthMismatch`] if the lists differ in length.
    /// - [`WageModelError::InvalidRate`] if a rate is -100% or lower.
    ///
    /// The model is unchanged on error.
    pub fn set_inflation(
        &mut self,
        years: &[Year],
        rates: &[Decimal],
    ) -> Result<(), WageModelError> {
        let update = InflationOverride::new(years, rates)?;
        self.apply_inflation(&update)
    }

    pub fn apply_inflation(
        &mut self,
        update: &InflationOverride,
    ) -> Result<(), WageModelError> {
        self.current = self.current.with_inflation(update)?;
        info!(years = update.rates().len(), "inflation rates updated");
        Ok(())
    }

    /// Discards every override, restoring the grids computed at construction.
    pub fn reset(&mut self) {
        self.current = self.initial.clone();
        info!("wage model reset to loaded tables");
    }
}

impl fmt::Display for WageModel {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", Report::new(&self.current))
    }
}
