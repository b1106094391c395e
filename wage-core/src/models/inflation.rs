use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Year;

/// Annual inflation rates in percent (`4.98` means 4.98%), keyed by year.
///
/// The default table holds Seattle-area CPI figures for 2021–2024, as
/// published by the BLS West region
/// (<https://www.bls.gov/regions/west/news-release/consumerpriceindex_seattle.htm>),
/// followed by projections of 3.5%, 3% and 3%.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InflationTable {
    rates: BTreeMap<Year, Decimal>,
}

impl Default for InflationTable {
    fn default() -> Self {
        Self::from_pairs([
            (2021, Decimal::new(498, 2)),
            (2022, Decimal::new(893, 2)),
            (2023, Decimal::new(575, 2)),
            (2024, Decimal::new(435, 2)),
            (2025, Decimal::new(35, 1)),
            (2026, Decimal::from(3)),
            (2027, Decimal::from(3)),
        ])
    }
}

impl InflationTable {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Year, Decimal)>,
    {
        Self {
            rates: pairs.into_iter().collect(),
        }
    }

    /// Inflation for `year` in percent, if known.
    pub fn rate(
        &self,
        year: Year,
    ) -> Option<Decimal> {
        self.rates.get(&year).copied()
    }

    /// Sets (or adds) the rate for `year`, returning the previous value.
    pub fn set_rate(
        &mut self,
        year: Year,
        rate: Decimal,
    ) -> Option<Decimal> {
        self.rates.insert(year, rate)
    }

    /// `1 + rate / 100` for `year`, if known.
    pub fn factor(
        &self,
        year: Year,
    ) -> Option<Decimal> {
        self.rate(year)
            .map(|rate| Decimal::ONE + rate / Decimal::ONE_HUNDRED)
    }
}
