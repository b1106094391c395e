//! TOML scenario files.
//!
//! A scenario names the input tables and adjusts the model before any
//! command runs. Every key is optional:
//!
//! ```toml
//! base_year = 2021
//! base_wages = "data/base_wages.csv"
//! astro_wages = "data/astro_wages.csv"
//! log_level = "info"
//! log_file = "wage-projection.log"
//!
//! [inflation]
//! 2025 = 3.5
//!
//! [[raise]]
//! track = "astro"
//! level = "premaster"
//! rates = { 2025 = "3", 2026 = "3", 2027 = "3" }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use wage_core::{InflationOverride, InflationTable, WageModel, WageModelError, Year};

/// Errors that can occur while reading or applying a scenario file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read scenario file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A table key that should be a year is not one.
    #[error("'{0}' is not a year")]
    InvalidYear(String),

    /// A raise rate is neither a string nor a number.
    #[error("raise rate for {year} must be a number or a string, found {kind}")]
    InvalidRateValue { year: Year, kind: String },

    #[error(transparent)]
    Model(#[from] WageModelError),
}

/// One `[[raise]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RaiseConfig {
    pub track: String,
    pub level: String,
    /// Percent raise keyed by year, as numbers or text.
    pub rates: BTreeMap<String, toml::Value>,
}

impl RaiseConfig {
    /// The rates as `(year, text)` pairs, in year order.
    pub fn entries(&self) -> Result<Vec<(Year, String)>, ConfigError> {
        let mut entries = self
            .rates
            .iter()
            .map(|(key, value)| {
                let year = parse_year(key)?;
                let text = match value {
                    toml::Value::String(text) => text.clone(),
                    toml::Value::Integer(number) => number.to_string(),
                    toml::Value::Float(number) => number.to_string(),
                    other => {
                        return Err(ConfigError::InvalidRateValue {
                            year,
                            kind: other.type_str().to_string(),
                        });
                    }
                };
                Ok((year, text))
            })
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|&(year, _)| year);
        Ok(entries)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    pub base_year: Option<Year>,
    pub base_wages: Option<PathBuf>,
    pub astro_wages: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    /// Inflation in percent keyed by year, merged over the default table.
    #[serde(default)]
    pub inflation: BTreeMap<String, Decimal>,
    #[serde(default, rename = "raise")]
    pub raises: Vec<RaiseConfig>,
}

fn parse_year(key: &str) -> Result<Year, ConfigError> {
    key.trim()
        .parse::<Year>()
        .map_err(|_| ConfigError::InvalidYear(key.to_string()))
}

impl ScenarioConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw)?;
        debug!(path = %path.display(), raises = config.raises.len(), "loaded scenario");
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// The default inflation table with this scenario's rates merged in.
    ///
    /// Rates pass the same checks as an inflation override, so a rate of
    /// -100% or lower is rejected.
    pub fn inflation_table(&self) -> Result<InflationTable, ConfigError> {
        let (years, rates): (Vec<Year>, Vec<Decimal>) = self
            .inflation
            .iter()
            .map(|(key, &rate)| Ok((parse_year(key)?, rate)))
            .collect::<Result<Vec<_>, ConfigError>>()?
            .into_iter()
            .unzip();
        let update = InflationOverride::new(&years, &rates)?;

        let mut table = InflationTable::default();
        for &(year, rate) in update.rates() {
            table.set_rate(year, rate);
        }
        Ok(table)
    }

    /// Applies every `[[raise]]` entry to `model`, in file order.
    pub fn apply_raises(
        &self,
        model: &mut WageModel,
    ) -> Result<(), ConfigError> {
        for raise in &self.raises {
            model.set_raise_rate(&raise.track, &raise.level, &raise.entries()?)?;
        }
        Ok(())
    }
}
