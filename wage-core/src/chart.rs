//! Line-chart descriptions of the wage grids.
//!
//! Charts are plain data: a title, axis labels, series of `(year, value)`
//! points and horizontal reference lines. Rendering them is left to whatever
//! plotting surface consumes the serialized form.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::{Grid, Level, Snapshot, Year};

const FTE60_OPACITY: f64 = 0.3;
const REFERENCE_OPACITY: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dotted,
}

/// One plotted line, with a marker at every point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub level: Level,
    pub color: &'static str,
    pub style: LineStyle,
    pub opacity: f64,
    pub points: Vec<(Year, f64)>,
}

/// A horizontal line across the whole chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub level: Level,
    pub color: &'static str,
    pub style: LineStyle,
    pub opacity: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub reference_lines: Vec<ReferenceLine>,
}

/// Which lines the inflation-adjusted chart includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealChartOptions {
    /// Plot the base real-wage series next to astro.
    pub base: bool,
    /// Plot the 60%-FTE real-wage series.
    pub fte60: bool,
    /// Draw each level's base real wage at the base year as a reference line.
    pub base_reference: bool,
    /// Draw each level's astro real wage at the base year as a reference line.
    pub astro_reference: bool,
}

impl Default for RealChartOptions {
    fn default() -> Self {
        Self {
            base: true,
            fte60: false,
            base_reference: false,
            astro_reference: true,
        }
    }
}

/// Plot color for a level, shared by every chart.
pub fn level_color(level: Level) -> &'static str {
    match level {
        Level::Premaster => "red",
        Level::Intermediate => "orange",
        Level::Candidate => "green",
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn series(
    grid: &Grid,
    level: Level,
    label: String,
    style: LineStyle,
    opacity: f64,
) -> Series {
    Series {
        label,
        level,
        color: level_color(level),
        style,
        opacity,
        points: grid
            .years()
            .iter()
            .zip(grid.row(level))
            .map(|(&year, &value)| (year, to_f64(value)))
            .collect(),
    }
}

fn reference_line(
    grid: &Grid,
    level: Level,
    year: Year,
    style: LineStyle,
) -> Option<ReferenceLine> {
    grid.get(level, year).map(|value| ReferenceLine {
        level,
        color: level_color(level),
        style,
        opacity: REFERENCE_OPACITY,
        value: to_f64(value),
    })
}

/// Nominal monthly wages by level: base dotted, astro solid, and optionally
/// the 60%-FTE rate as a translucent solid line.
pub fn gross_wage_chart(
    snapshot: &Snapshot,
    fte60: bool,
) -> ChartSpec {
    let mut lines = Vec::new();
    for level in Level::ALL {
        lines.push(series(
            &snapshot.base_wages,
            level,
            format!("base {level}"),
            LineStyle::Dotted,
            1.0,
        ));
        lines.push(series(
            &snapshot.astro_wages,
            level,
            format!("astro {level}"),
            LineStyle::Solid,
            1.0,
        ));
        if fte60 {
            lines.push(series(
                &snapshot.astro_wages_fte60,
                level,
                format!("astro {level} FTE60"),
                LineStyle::Solid,
                FTE60_OPACITY,
            ));
        }
    }

    ChartSpec {
        title: "Gross Wages by Level".to_string(),
        x_label: "Year".to_string(),
        y_label: "Monthly Rate [$]".to_string(),
        series: lines,
        reference_lines: Vec::new(),
    }
}

/// Real monthly wages by level, in base-year currency.
pub fn real_wage_chart(
    snapshot: &Snapshot,
    options: RealChartOptions,
) -> ChartSpec {
    let base_year = snapshot.base_year;
    let mut lines = Vec::new();
    let mut references = Vec::new();

    for level in Level::ALL {
        lines.push(series(
            &snapshot.astro_real_wages,
            level,
            format!("astro {level}"),
            LineStyle::Solid,
            1.0,
        ));
        if options.base {
            lines.push(series(
                &snapshot.base_real_wages,
                level,
                format!("base {level}"),
                LineStyle::Dotted,
                1.0,
            ));
        }
        if options.base_reference {
            references.extend(reference_line(
                &snapshot.base_real_wages,
                level,
                base_year,
                LineStyle::Dotted,
            ));
        }
        if options.astro_reference {
            references.extend(reference_line(
                &snapshot.astro_real_wages,
                level,
                base_year,
                LineStyle::Solid,
            ));
        }
        if options.fte60 {
            lines.push(series(
                &snapshot.fte60_real_wages,
                level,
                format!("astro {level} FTE60"),
                LineStyle::Solid,
                FTE60_OPACITY,
            ));
        }
    }

    ChartSpec {
        title: format!("Inflation Adjusted Wages by Level ({base_year} Dollars)"),
        x_label: "Year".to_string(),
        y_label: format!("Monthly Rate [{base_year} $]"),
        series: lines,
        reference_lines: references,
    }
}
