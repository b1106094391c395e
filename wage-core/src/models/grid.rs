//! Level × year tables.
//!
//! A [`Grid`] holds one value per (level, year) cell. The levels are always
//! the three entries of [`Level::ALL`]; the years are an ascending run of
//! consecutive calendar years shared by every row.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Level, WageModelError};

/// Calendar year used as a grid column key.
pub type Year = i32;

/// A table indexed by [`Level`] and [`Year`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T = Decimal> {
    years: Vec<Year>,
    rows: [Vec<T>; 3],
}

/// Monthly pay in nominal currency units.
pub type WageGrid = Grid;

/// Year-over-year ratios (1.03 = +3%), covering every wage year but the first.
pub type IncreaseGrid = Grid;

/// Monthly pay restated in base-year currency units.
pub type RealWageGrid = Grid;

/// Cell-by-cell boolean test between two grids.
pub type ComparisonGrid = Grid<bool>;

/// Checks that `years` is an ascending run of consecutive years.
pub(crate) fn validate_years(years: &[Year]) -> Result<(), WageModelError> {
    if let Some(pair) = years.windows(2).find(|pair| pair[1] != pair[0] + 1) {
        return Err(WageModelError::DataFormat(format!(
            "years must be consecutive and ascending, found {} followed by {}",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

impl<T: Copy> Grid<T> {
    /// Builds a grid by evaluating `f` for every cell.
    pub fn from_fn<F>(
        years: Vec<Year>,
        mut f: F,
    ) -> Self
    where
        F: FnMut(Level, Year) -> T,
    {
        let rows = Level::ALL.map(|level| years.iter().map(|&year| f(level, year)).collect());
        Self { years, rows }
    }

    /// Builds a grid by evaluating a fallible `f` for every cell, stopping at
    /// the first error.
    ///
    /// Cells are visited level-major and, within a level, in ascending year
    /// order, so `f` may carry state from one year to the next.
    pub fn try_from_fn<E, F>(
        years: Vec<Year>,
        mut f: F,
    ) -> Result<Self, E>
    where
        F: FnMut(Level, Year) -> Result<T, E>,
    {
        let mut rows: [Vec<T>; 3] = Default::default();
        for level in Level::ALL {
            let row = &mut rows[level.index()];
            row.reserve(years.len());
            for &year in &years {
                row.push(f(level, year)?);
            }
        }
        Ok(Self { years, rows })
    }

    pub fn years(&self) -> &[Year] {
        &self.years
    }

    pub fn first_year(&self) -> Option<Year> {
        self.years.first().copied()
    }

    pub fn last_year(&self) -> Option<Year> {
        self.years.last().copied()
    }

    pub fn contains_year(
        &self,
        year: Year,
    ) -> bool {
        self.year_index(year).is_some()
    }

    fn year_index(
        &self,
        year: Year,
    ) -> Option<usize> {
        self.years.binary_search(&year).ok()
    }

    pub fn get(
        &self,
        level: Level,
        year: Year,
    ) -> Option<T> {
        self.year_index(year)
            .map(|index| self.rows[level.index()][index])
    }

    /// All values for one level, in year order.
    pub fn row(
        &self,
        level: Level,
    ) -> &[T] {
        &self.rows[level.index()]
    }

    /// Overwrites a single cell. Returns `false` if `year` is not a column
    /// of this grid.
    pub fn set(
        &mut self,
        level: Level,
        year: Year,
        value: T,
    ) -> bool {
        match self.year_index(year) {
            Some(index) => {
                self.rows[level.index()][index] = value;
                true
            }
            None => false,
        }
    }

    pub fn map<U, F>(
        &self,
        mut f: F,
    ) -> Grid<U>
    where
        U: Copy,
        F: FnMut(T) -> U,
    {
        Grid {
            years: self.years.clone(),
            rows: Level::ALL.map(|level| self.row(level).iter().map(|&v| f(v)).collect()),
        }
    }

    /// Combines two grids with identical years cell by cell.
    pub fn zip_map<V, U, F>(
        &self,
        other: &Grid<V>,
        mut f: F,
    ) -> Result<Grid<U>, WageModelError>
    where
        V: Copy,
        U: Copy,
        F: FnMut(T, V) -> U,
    {
        if self.years != other.years {
            return Err(WageModelError::DataFormat(format!(
                "year ranges differ: {} vs {}",
                describe_years(&self.years),
                describe_years(&other.years)
            )));
        }
        Ok(Grid {
            years: self.years.clone(),
            rows: Level::ALL.map(|level| {
                self.row(level)
                    .iter()
                    .zip(other.row(level))
                    .map(|(&a, &b)| f(a, b))
                    .collect()
            }),
        })
    }

    /// Every cell as `(level, year, value)`, level-major.
    pub fn cells(&self) -> impl Iterator<Item = (Level, Year, T)> + '_ {
        Level::ALL.into_iter().flat_map(move |level| {
            self.years
                .iter()
                .zip(self.row(level))
                .map(move |(&year, &value)| (level, year, value))
        })
    }
}

impl Grid {
    /// Builds a wage grid from named rows, as read from a source table.
    ///
    /// # Errors
    ///
    /// Returns [`WageModelError::DataFormat`] if:
    /// - `years` is empty or not consecutive
    /// - a row names a level outside the fixed set, or names one twice
    /// - a level is missing
    /// - a row does not have one value per year
    pub fn from_level_rows(
        years: Vec<Year>,
        rows: Vec<(String, Vec<Decimal>)>,
    ) -> Result<Self, WageModelError> {
        if years.is_empty() {
            return Err(WageModelError::DataFormat(
                "table has no year columns".to_string(),
            ));
        }
        validate_years(&years)?;

        let mut slots: [Option<Vec<Decimal>>; 3] = Default::default();
        for (name, values) in rows {
            let level = Level::parse(&name).ok_or_else(|| {
                WageModelError::DataFormat(format!("unknown level '{}'", name.trim()))
            })?;
            if values.len() != years.len() {
                return Err(WageModelError::DataFormat(format!(
                    "level '{level}' has {} values for {} years",
                    values.len(),
                    years.len()
                )));
            }
            let slot = &mut slots[level.index()];
            if slot.is_some() {
                return Err(WageModelError::DataFormat(format!(
                    "level '{level}' appears more than once"
                )));
            }
            *slot = Some(values);
        }

        let mut rows: [Vec<Decimal>; 3] = Default::default();
        for level in Level::ALL {
            rows[level.index()] = slots[level.index()].take().ok_or_else(|| {
                WageModelError::DataFormat(format!("level '{level}' is missing"))
            })?;
        }

        Ok(Self { years, rows })
    }
}

pub(crate) fn describe_years(years: &[Year]) -> String {
    match (years.first(), years.last()) {
        (Some(first), Some(last)) => format!("{first}-{last}"),
        _ => "no years".to_string(),
    }
}
