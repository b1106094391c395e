//! Text rendering of grids and the full wage report.

use std::fmt;

use rust_decimal::Decimal;

use crate::calculations::common::ratio_to_percent;
use crate::{Grid, Level, Snapshot};

/// How the cells of a grid are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// `$` followed by the whole-currency part: `$1030`.
    Currency,
    /// A ratio shown as a percentage change with one decimal: `3.0%`.
    Percentage,
    /// `true` or `false`.
    Comparison,
    /// The value rounded to three decimals.
    Raw,
}

/// A value that can appear in a rendered grid cell.
pub trait CellValue: Copy {
    fn render(
        self,
        mode: DisplayMode,
    ) -> String;
}

impl CellValue for Decimal {
    fn render(
        self,
        mode: DisplayMode,
    ) -> String {
        match mode {
            DisplayMode::Currency => format!("${}", self.trunc()),
            DisplayMode::Percentage => format!("{:.1}%", ratio_to_percent(self).round_dp(1)),
            DisplayMode::Comparison => (!self.is_zero()).to_string(),
            DisplayMode::Raw => self.round_dp(3).normalize().to_string(),
        }
    }
}

impl CellValue for bool {
    fn render(
        self,
        _mode: DisplayMode,
    ) -> String {
        self.to_string()
    }
}

/// A grid laid out as a table: a header of years, then one row per level.
pub struct GridTable<'a, T> {
    grid: &'a Grid<T>,
    mode: DisplayMode,
}

impl<'a, T: CellValue> GridTable<'a, T> {
    pub fn new(
        grid: &'a Grid<T>,
        mode: DisplayMode,
    ) -> Self {
        Self { grid, mode }
    }
}

impl<T: CellValue> fmt::Display for GridTable<'_, T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let cells: Vec<Vec<String>> = Level::ALL
            .iter()
            .map(|&level| {
                self.grid
                    .row(level)
                    .iter()
                    .map(|&value| value.render(self.mode))
                    .collect()
            })
            .collect();

        let width = self
            .grid
            .years()
            .iter()
            .map(|year| year.to_string().len())
            .chain(cells.iter().flatten().map(String::len))
            .max()
            .unwrap_or(0);
        let label_width = Level::ALL
            .iter()
            .map(|level| level.as_str().len())
            .max()
            .unwrap_or(0);

        write!(f, "{:<label_width$}", "level")?;
        for year in self.grid.years() {
            write!(f, "  {year:>width$}")?;
        }
        writeln!(f)?;

        for (level, row) in Level::ALL.iter().zip(&cells) {
            write!(f, "{:<label_width$}", level.as_str())?;
            for cell in row {
                write!(f, "  {cell:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Renders `grid` as a text table in the given mode.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use wage_core::format::{DisplayMode, format_grid};
/// use wage_core::Grid;
///
/// let gross = Grid::from_fn(vec![2021, 2022], |_, _| dec!(1.035));
///
/// let table = format_grid(&gross, DisplayMode::Percentage);
///
/// assert!(table.starts_with("level"));
/// assert!(table.contains("premaster     3.5%  3.5%"));
/// ```
pub fn format_grid<T: CellValue>(
    grid: &Grid<T>,
    mode: DisplayMode,
) -> String {
    GridTable::new(grid, mode).to_string()
}

const SEPARATOR_WIDTH: usize = 20;

/// The full wage report: wages, the astro/base comparison, increases, and
/// real wages.
pub struct Report<'a> {
    snapshot: &'a Snapshot,
    fte60: bool,
}

impl<'a> Report<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot,
            fte60: false,
        }
    }

    /// Appends the 60%-FTE grids to the report.
    pub fn with_fte60(
        mut self,
        fte60: bool,
    ) -> Self {
        self.fte60 = fte60;
        self
    }
}

fn section<T: CellValue>(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    grid: &Grid<T>,
    mode: DisplayMode,
) -> fmt::Result {
    writeln!(f, "{title}")?;
    write!(f, "{}", GridTable::new(grid, mode))
}

fn separator(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "_".repeat(SEPARATOR_WIDTH))?;
    writeln!(f)
}

impl fmt::Display for Report<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = self.snapshot;
        let dollars = format!("({} Dollars)", s.base_year);

        section(f, "Base Pay:", &s.base_wages, DisplayMode::Currency)?;
        writeln!(f)?;
        section(f, "Astro Pay:", &s.astro_wages, DisplayMode::Currency)?;
        separator(f)?;

        section(f, "Astro Pay is Base Pay:", &s.astro_is_base(), DisplayMode::Comparison)?;
        separator(f)?;

        section(f, "Base Gross Increases:", &s.base_gross_increase, DisplayMode::Percentage)?;
        writeln!(f)?;
        section(f, "Astro Gross Increases:", &s.astro_gross_increase, DisplayMode::Percentage)?;
        separator(f)?;

        section(f, "Base Net Increases:", &s.base_net_increase, DisplayMode::Percentage)?;
        writeln!(f)?;
        section(f, "Astro Net Increases:", &s.astro_net_increase, DisplayMode::Percentage)?;
        separator(f)?;

        section(f, &format!("Base Real Pay {dollars}:"), &s.base_real_wages, DisplayMode::Currency)?;
        writeln!(f)?;
        section(f, &format!("Astro Real Pay {dollars}:"), &s.astro_real_wages, DisplayMode::Currency)?;

        if self.fte60 {
            separator(f)?;
            section(f, "Astro FTE60 Pay:", &s.astro_wages_fte60, DisplayMode::Currency)?;
            writeln!(f)?;
            section(f, "Astro FTE60 Projected Pay:", &s.fte60_projection, DisplayMode::Currency)?;
            writeln!(f)?;
            section(
                f,
                &format!("Astro FTE60 Real Pay {dollars}:"),
                &s.fte60_real_wages,
                DisplayMode::Currency,
            )?;
        }
        Ok(())
    }
}
