//! Validated parameters for the two editing operations.
//!
//! Both types can be built from raw user text. Building them performs every
//! check that does not need the model, so a front end can report bad input
//! before any recompute starts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{parse_percent, percent_to_ratio};
use crate::{Level, Track, WageModelError, Year};

/// New raise rates for one level of one pay scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaiseOverride {
    pub track: Track,
    pub level: Level,
    /// Growth ratios keyed by year (1.03 = +3%).
    pub rates: Vec<(Year, Decimal)>,
}

impl RaiseOverride {
    /// Builds an override from conventional percentages (`3` for 3%).
    pub fn from_percentages<I>(
        track: Track,
        level: Level,
        percentages: I,
    ) -> Self
    where
        I: IntoIterator<Item = (Year, Decimal)>,
    {
        Self {
            track,
            level,
            rates: percentages
                .into_iter()
                .map(|(year, percent)| (year, percent_to_ratio(percent)))
                .collect(),
        }
    }

    /// Builds an override from raw text, as typed at a prompt.
    ///
    /// # Errors
    ///
    /// - [`WageModelError::InvalidParameter`] if `level` or `track` is not
    ///   recognised.
    /// - [`WageModelError::InvalidRate`] if any rate is not a number.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use wage_core::{Level, RaiseOverride, Track};
    ///
    /// let raise = RaiseOverride::parse("astro", "Premaster", &[(2025, "3"), (2026, "2.5")]).unwrap();
    ///
    /// assert_eq!(raise.track, Track::Astro);
    /// assert_eq!(raise.level, Level::Premaster);
    /// assert_eq!(raise.rates, vec![(2025, dec!(1.03)), (2026, dec!(1.025))]);
    /// ```
    pub fn parse<S: AsRef<str>>(
        track: &str,
        level: &str,
        entries: &[(Year, S)],
    ) -> Result<Self, WageModelError> {
        let level: Level = level.parse()?;
        let track: Track = track.parse()?;
        let percentages = entries
            .iter()
            .map(|(year, text)| Ok((*year, parse_percent(text.as_ref())?)))
            .collect::<Result<Vec<_>, WageModelError>>()?;
        Ok(Self::from_percentages(track, level, percentages))
    }

    pub fn years(&self) -> impl Iterator<Item = Year> + '_ {
        self.rates.iter().map(|&(year, _)| year)
    }
}

/// Replacement inflation rates, in percent, for a set of years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflationOverride {
    rates: Vec<(Year, Decimal)>,
}

impl InflationOverride {
    /// Pairs `years` with `rates` position by position.
    ///
    /// # Errors
    ///
    /// - [`WageModelError::LengthMismatch`] if the lists differ in length.
    /// - [`WageModelError::InvalidRate`] if a rate is -100% or lower, which
    ///   would make the inflation factor zero or negative.
    pub fn new(
        years: &[Year],
        rates: &[Decimal],
    ) -> Result<Self, WageModelError> {
        if years.len() != rates.len() {
            return Err(WageModelError::LengthMismatch {
                years: years.len(),
                rates: rates.len(),
            });
        }
        if let Some(rate) = rates.iter().find(|&&rate| rate <= -Decimal::ONE_HUNDRED) {
            return Err(WageModelError::InvalidRate {
                rate: rate.to_string(),
                reason: "inflation must be above -100%".to_string(),
            });
        }
        Ok(Self {
            rates: years.iter().copied().zip(rates.iter().copied()).collect(),
        })
    }

    /// Like [`InflationOverride::new`], parsing each rate from text first.
    pub fn parse<S: AsRef<str>>(
        years: &[Year],
        rates: &[S],
    ) -> Result<Self, WageModelError> {
        if years.len() != rates.len() {
            return Err(WageModelError::LengthMismatch {
                years: years.len(),
                rates: rates.len(),
            });
        }
        let rates = rates
            .iter()
            .map(|text| parse_percent(text.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(years, &rates)
    }

    pub fn rates(&self) -> &[(Year, Decimal)] {
        &self.rates
    }
}
