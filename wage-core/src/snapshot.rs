//! Immutable results of the recompute pipeline.
//!
//! A [`Snapshot`] is never edited in place. Every operation that changes an
//! input (a raise rate, an inflation rate) builds a complete new snapshot
//! from the previous one, so callers either see the old grids or the new
//! ones, never a mix.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculations::{
    FloorAdjustment, derive_fte60, enforce_floor, fte60_projection, gross_increases,
    net_increases, real_wages, wages_from_increases,
};
use crate::models::describe_years;
use crate::{
    ComparisonGrid, Grid, IncreaseGrid, InflationOverride, InflationTable, RaiseOverride,
    RealWageGrid, Track, WageGrid, WageModelError, Year,
};

/// Every grid derived from one set of wages and inflation rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Year whose currency the real-wage grids are expressed in.
    pub base_year: Year,
    pub base_wages: WageGrid,
    pub astro_wages: WageGrid,
    /// 60%-FTE astro rate, derived once from the loaded base wages.
    pub astro_wages_fte60: WageGrid,
    /// 60%-FTE series advanced along the current base raises.
    pub fte60_projection: WageGrid,
    pub base_gross_increase: IncreaseGrid,
    pub astro_gross_increase: IncreaseGrid,
    pub base_net_increase: IncreaseGrid,
    pub astro_net_increase: IncreaseGrid,
    pub base_real_wages: RealWageGrid,
    pub astro_real_wages: RealWageGrid,
    pub fte60_real_wages: RealWageGrid,
    pub inflation: InflationTable,
}

/// Output of the gross stage, input to [`Snapshot::assemble`].
struct GrossStage {
    base_wages: WageGrid,
    astro_wages: WageGrid,
    fte60_projection: WageGrid,
    base_gross_increase: IncreaseGrid,
    astro_gross_increase: IncreaseGrid,
}

impl Snapshot {
    /// Runs the whole pipeline on freshly loaded wages.
    ///
    /// # Errors
    ///
    /// Returns [`WageModelError::DataFormat`] if the two grids cover
    /// different years, `base_year` is not one of them, a wage is zero, or
    /// `inflation` lacks a rate for a year after the first.
    pub fn compute(
        base_wages: WageGrid,
        astro_wages: WageGrid,
        inflation: InflationTable,
        base_year: Year,
    ) -> Result<Self, WageModelError> {
        if base_wages.years() != astro_wages.years() {
            return Err(WageModelError::DataFormat(format!(
                "base and astro tables cover different years: {} vs {}",
                describe_years(base_wages.years()),
                describe_years(astro_wages.years())
            )));
        }

        let astro_wages_fte60 = derive_fte60(&base_wages)?;
        let gross = GrossStage {
            base_gross_increase: gross_increases(&base_wages)?,
            astro_gross_increase: gross_increases(&astro_wages)?,
            fte60_projection: astro_wages_fte60.clone(),
            base_wages,
            astro_wages,
        };
        Self::assemble(gross, astro_wages_fte60, inflation, base_year)
    }

    /// Runs the net and real stages on top of a finished gross stage.
    fn assemble(
        gross: GrossStage,
        astro_wages_fte60: WageGrid,
        inflation: InflationTable,
        base_year: Year,
    ) -> Result<Self, WageModelError> {
        let base_net_increase = net_increases(&gross.base_gross_increase, &inflation)?;
        let astro_net_increase = net_increases(&gross.astro_gross_increase, &inflation)?;

        let base_real_wages = real_wages(&gross.base_wages, &base_net_increase, base_year)?;
        let astro_real_wages = real_wages(&gross.astro_wages, &astro_net_increase, base_year)?;
        // The 60%-FTE rate tracks the base scale, so it follows base net raises.
        let fte60_real_wages = real_wages(&astro_wages_fte60, &base_net_increase, base_year)?;

        Ok(Self {
            base_year,
            base_wages: gross.base_wages,
            astro_wages: gross.astro_wages,
            astro_wages_fte60,
            fte60_projection: gross.fte60_projection,
            base_gross_increase: gross.base_gross_increase,
            astro_gross_increase: gross.astro_gross_increase,
            base_net_increase,
            astro_net_increase,
            base_real_wages,
            astro_real_wages,
            fte60_real_wages,
            inflation,
        })
    }

    /// Reruns gross → net → real on the current wages and inflation.
    ///
    /// With unchanged inputs the result equals `self`.
    pub fn recompute(&self) -> Result<Self, WageModelError> {
        let gross = GrossStage {
            base_gross_increase: gross_increases(&self.base_wages)?,
            astro_gross_increase: gross_increases(&self.astro_wages)?,
            fte60_projection: self.fte60_projection.clone(),
            base_wages: self.base_wages.clone(),
            astro_wages: self.astro_wages.clone(),
        };
        Self::assemble(
            gross,
            self.astro_wages_fte60.clone(),
            self.inflation.clone(),
            self.base_year,
        )
    }

    /// Applies new inflation rates and reruns the net and real stages.
    ///
    /// Wages and gross increases are carried over unchanged.
    pub fn with_inflation(
        &self,
        update: &InflationOverride,
    ) -> Result<Self, WageModelError> {
        let mut inflation = self.inflation.clone();
        for &(year, rate) in update.rates() {
            inflation.set_rate(year, rate);
        }

        let gross = GrossStage {
            base_wages: self.base_wages.clone(),
            astro_wages: self.astro_wages.clone(),
            fte60_projection: self.fte60_projection.clone(),
            base_gross_increase: self.base_gross_increase.clone(),
            astro_gross_increase: self.astro_gross_increase.clone(),
        };
        Self::assemble(gross, self.astro_wages_fte60.clone(), inflation, self.base_year)
    }

    /// Writes new raise ratios into one gross-increase grid and rebuilds every
    /// wage grid from the ratios.
    ///
    /// The rebuild covers the whole year range. Astro cells that end up not
    /// paying more than base are clamped to base, after which the astro
    /// ratios are recomputed from the clamped wages. Returns the new snapshot
    /// and the clamped cells.
    ///
    /// # Errors
    ///
    /// Returns [`WageModelError::InvalidParameter`] if a year of `raise` has
    /// no raise to override (the first year, or a year outside the tables).
    pub fn with_raise(
        &self,
        raise: &RaiseOverride,
    ) -> Result<(Self, Vec<FloorAdjustment>), WageModelError> {
        let mut base_gross = self.base_gross_increase.clone();
        let mut astro_gross = self.astro_gross_increase.clone();
        let target = match raise.track {
            Track::Base => &mut base_gross,
            Track::Astro => &mut astro_gross,
        };
        for &(year, ratio) in &raise.rates {
            if !target.set(raise.level, year, ratio) {
                return Err(WageModelError::InvalidParameter(format!(
                    "no raise to override in {year}; raises cover {}",
                    describe_years(target.years())
                )));
            }
        }

        let base_wages = wages_from_increases(&self.base_wages, &base_gross)?;
        let astro_wages = wages_from_increases(&self.astro_wages, &astro_gross)?;
        let projection = fte60_projection(&self.astro_wages_fte60, &base_gross)?;

        debug!("checking if astro wages ever fall below base wages");
        let (astro_wages, adjustments) = enforce_floor(&astro_wages, &base_wages)?;
        for adjustment in &adjustments {
            info!(
                level = %adjustment.level,
                year = adjustment.year,
                astro = %adjustment.astro,
                base = %adjustment.base,
                "astro wage not above base; clamped to base"
            );
        }
        if !adjustments.is_empty() {
            astro_gross = gross_increases(&astro_wages)?;
        }

        let gross = GrossStage {
            base_wages,
            astro_wages,
            fte60_projection: projection,
            base_gross_increase: base_gross,
            astro_gross_increase: astro_gross,
        };
        let snapshot = Self::assemble(
            gross,
            self.astro_wages_fte60.clone(),
            self.inflation.clone(),
            self.base_year,
        )?;
        Ok((snapshot, adjustments))
    }

    /// Cells where astro pays no more than base, compared after rounding to
    /// whole currency units.
    pub fn astro_is_base(&self) -> ComparisonGrid {
        Grid::from_fn(self.base_wages.years().to_vec(), |level, year| {
            match (
                self.astro_wages.get(level, year),
                self.base_wages.get(level, year),
            ) {
                (Some(astro), Some(base)) => astro.round() <= base.round(),
                _ => false,
            }
        })
    }
}
