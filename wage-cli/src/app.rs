//! Glue between the command line, the scenario file and the wage model.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};
use wage_core::chart::ChartSpec;
use wage_core::format::Report;
use wage_core::{DEFAULT_BASE_YEAR, FloorAdjustment, WageModel, Year};
use wage_data::WageTableLoader;

use crate::config::ScenarioConfig;

pub const DEFAULT_BASE_WAGES: &str = "base_wages.csv";
pub const DEFAULT_ASTRO_WAGES: &str = "astro_wages.csv";

/// Number of trailing years a raise prompt asks about when none are given.
pub const DEFAULT_RAISE_YEARS: usize = 3;

/// Values given on the command line. Each one beats the scenario file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub base_wages: Option<PathBuf>,
    pub astro_wages: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved run settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_wages: PathBuf,
    pub astro_wages: PathBuf,
    pub base_year: Year,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub scenario: ScenarioConfig,
}

impl Settings {
    /// Layers the command line over the scenario file over the defaults.
    pub fn resolve(
        cli: CliOverrides,
        scenario: ScenarioConfig,
    ) -> Self {
        Self {
            base_wages: cli
                .base_wages
                .or_else(|| scenario.base_wages.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_WAGES)),
            astro_wages: cli
                .astro_wages
                .or_else(|| scenario.astro_wages.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ASTRO_WAGES)),
            base_year: scenario.base_year.unwrap_or(DEFAULT_BASE_YEAR),
            log_level: cli.log_level.or_else(|| scenario.log_level.clone()),
            log_file: cli.log_file.or_else(|| scenario.log_file.clone()),
            scenario,
        }
    }
}

/// Reads the scenario file if one was given, otherwise an empty scenario.
pub fn load_scenario(path: Option<&Path>) -> Result<ScenarioConfig> {
    match path {
        Some(path) => ScenarioConfig::load_from_path(path)
            .with_context(|| format!("failed to load scenario {}", path.display())),
        None => Ok(ScenarioConfig::default()),
    }
}

/// Loads both wage tables and builds the model, then applies the scenario's
/// raises.
pub fn load_model(settings: &Settings) -> Result<WageModel> {
    let base = WageTableLoader::load_from_file(&settings.base_wages)
        .with_context(|| format!("failed to load base wages from {}", settings.base_wages.display()))?;
    let astro = WageTableLoader::load_from_file(&settings.astro_wages).with_context(|| {
        format!("failed to load astro wages from {}", settings.astro_wages.display())
    })?;
    let inflation = settings.scenario.inflation_table()?;

    let mut model = WageModel::with_settings(base, astro, inflation, settings.base_year)
        .context("failed to build wage model")?;
    settings
        .scenario
        .apply_raises(&mut model)
        .context("failed to apply scenario raises")?;

    debug!(
        years = model.years().len(),
        raises = settings.scenario.raises.len(),
        "model ready"
    );
    Ok(model)
}

/// The years a raise override targets when none are named: the last few
/// years that have a raise.
pub fn default_raise_years(model: &WageModel) -> Vec<Year> {
    let years = model.base_gross_increase().years();
    years[years.len().saturating_sub(DEFAULT_RAISE_YEARS)..].to_vec()
}

pub fn render_report(
    model: &WageModel,
    fte60: bool,
) -> String {
    Report::new(model.snapshot()).with_fte60(fte60).to_string()
}

/// One line per clamped cell, for printing after a raise.
pub fn describe_adjustments(adjustments: &[FloorAdjustment]) -> Vec<String> {
    adjustments
        .iter()
        .map(|a| {
            format!(
                "astro {} {} raised from ${} to base pay ${}",
                a.level,
                a.year,
                a.astro.trunc(),
                a.base.trunc()
            )
        })
        .collect()
}

/// Writes `chart` to `path` as pretty-printed JSON.
pub fn write_chart(
    chart: &ChartSpec,
    path: &Path,
) -> Result<()> {
    let json = serde_json::to_string_pretty(chart).context("failed to serialize chart")?;
    fs::write(path, json).with_context(|| format!("failed to write chart to {}", path.display()))?;
    info!(path = %path.display(), series = chart.series.len(), "chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use wage_core::{Grid, InflationTable, Level};

    use super::*;

    fn model() -> WageModel {
        let years: Vec<Year> = (2020..=2027).collect();
        let base = Grid::from_fn(years.clone(), |_, _| dec!(1000));
        let astro = Grid::from_fn(years, |_, _| dec!(1200));
        WageModel::with_settings(base, astro, InflationTable::default(), 2021).unwrap()
    }

    // =========================================================================
    // Settings
    // =========================================================================

    #[test]
    fn test_resolve_defaults_without_cli_or_scenario() {
        let settings = Settings::resolve(CliOverrides::default(), ScenarioConfig::default());

        assert_eq!(settings.base_wages, PathBuf::from("base_wages.csv"));
        assert_eq!(settings.astro_wages, PathBuf::from("astro_wages.csv"));
        assert_eq!(settings.base_year, 2021);
        assert_eq!(settings.log_level, None);
    }

    #[test]
    fn test_resolve_cli_beats_scenario() {
        let scenario = ScenarioConfig::from_toml(
            "base_year = 2023\nbase_wages = \"file.csv\"\nastro_wages = \"astro.csv\"\nlog_level = \"warn\"",
        )
        .unwrap();
        let cli = CliOverrides {
            base_wages: Some(PathBuf::from("cli.csv")),
            log_level: Some("debug".to_string()),
            ..CliOverrides::default()
        };

        let settings = Settings::resolve(cli, scenario);

        assert_eq!(settings.base_wages, PathBuf::from("cli.csv"));
        assert_eq!(settings.astro_wages, PathBuf::from("astro.csv"));
        assert_eq!(settings.base_year, 2023);
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_load_scenario_without_path_is_empty() {
        assert_eq!(load_scenario(None).unwrap(), ScenarioConfig::default());
    }

    #[test]
    fn test_load_model_reports_missing_table() {
        let settings = Settings::resolve(
            CliOverrides {
                base_wages: Some(PathBuf::from("/nonexistent/base.csv")),
                ..CliOverrides::default()
            },
            ScenarioConfig::default(),
        );

        let err = load_model(&settings).unwrap_err();

        assert!(err.to_string().contains("/nonexistent/base.csv"));
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn test_default_raise_years_are_last_three() {
        assert_eq!(default_raise_years(&model()), vec![2025, 2026, 2027]);
    }

    #[test]
    fn test_render_report_with_fte60_adds_sections() {
        let model = model();

        let plain = render_report(&model, false);
        let full = render_report(&model, true);

        assert!(plain.starts_with("Base Pay:"));
        assert!(full.starts_with(&plain));
        assert!(full.len() > plain.len());
    }

    #[test]
    fn test_describe_adjustments() {
        let adjustments = vec![FloorAdjustment {
            level: Level::Candidate,
            year: 2026,
            astro: dec!(998.7),
            base: dec!(1000),
        }];

        assert_eq!(
            describe_adjustments(&adjustments),
            vec!["astro candidate 2026 raised from $998 to base pay $1000".to_string()]
        );
    }
}
