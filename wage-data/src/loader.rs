//! CSV loader for wage tables.
//!
//! ## CSV Format
//!
//! A wage table holds one monthly wage per level and year. Two layouts are
//! accepted and told apart by the header row; the first column is the row key
//! and its header text is ignored.
//!
//! Levels as rows, years as columns:
//!
//! ```csv
//! level,2020,2021,2022
//! premaster,2522,2597,2714
//! intermediate,2673,2753,2877
//! candidate,2834,2919,3050
//! ```
//!
//! Years as rows, levels as columns:
//!
//! ```csv
//! year,premaster,intermediate,candidate
//! 2020,2522,2673,2834
//! 2021,2597,2753,2919
//! 2022,2714,2877,3050
//! ```
//!
//! Level names are matched case-insensitively. Cells may carry a leading `$`
//! and comma thousands separators (`$2,522.50`).

use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;
use wage_core::{Grid, Level, WageGrid, WageModelError, Year};

/// Errors that can occur when loading a wage table.
#[derive(Debug, Error)]
pub enum WageTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV was readable but does not describe a valid wage table.
    #[error(transparent)]
    Format(#[from] WageModelError),
}

impl From<csv::Error> for WageTableLoaderError {
    fn from(err: csv::Error) -> Self {
        WageTableLoaderError::CsvParse(err.to_string())
    }
}

/// Orientation of a wage table on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// One row per level, one column per year.
    LevelRows,
    /// One row per year, one column per level.
    YearRows,
}

impl TableLayout {
    /// Picks the layout from the header cells after the row-key column.
    pub fn detect(columns: &[&str]) -> Result<Self, WageTableLoaderError> {
        if columns.is_empty() {
            return Err(data_format("table has no value columns".to_string()));
        }
        if columns.iter().all(|column| column.parse::<Year>().is_ok()) {
            Ok(TableLayout::LevelRows)
        } else if columns.iter().all(|column| Level::parse(column).is_some()) {
            Ok(TableLayout::YearRows)
        } else {
            Err(data_format(format!(
                "header must list either years or level names after the first column, found '{}'",
                columns.join(",")
            )))
        }
    }
}

fn data_format(message: String) -> WageTableLoaderError {
    WageTableLoaderError::Format(WageModelError::DataFormat(message))
}

/// Parses one wage cell, tolerating a `$` prefix and comma separators.
fn parse_cell(
    cell: &str,
    row: usize,
    column: &str,
) -> Result<Decimal, WageTableLoaderError> {
    let normalized = cell.trim().trim_start_matches('$').replace(',', "");
    normalized.parse::<Decimal>().map_err(|_| {
        data_format(format!(
            "row {row}, column '{column}': '{cell}' is not a number"
        ))
    })
}

fn parse_year(
    key: &str,
    row: usize,
) -> Result<Year, WageTableLoaderError> {
    key.parse::<Year>()
        .map_err(|_| data_format(format!("row {row}: '{key}' is not a year")))
}

/// Loader for wage tables from CSV data.
pub struct WageTableLoader;

impl WageTableLoader {
    /// Parse a wage table from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    ///
    /// # Errors
    ///
    /// * [`WageTableLoaderError::CsvParse`] if the CSV is structurally
    ///   invalid (for example a row with the wrong number of fields).
    /// * [`WageTableLoaderError::Format`] if the header fits neither layout,
    ///   a cell is not a number, or the table breaks a grid rule (unknown,
    ///   missing or duplicate level, non-consecutive years).
    pub fn parse<R: Read>(reader: R) -> Result<WageGrid, WageTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns: Vec<&str> = headers.iter().skip(1).collect();
        let layout = TableLayout::detect(&columns)?;
        let records = csv_reader
            .records()
            .collect::<Result<Vec<_>, _>>()?;

        let grid = match layout {
            TableLayout::LevelRows => Self::from_level_rows(&columns, &records)?,
            TableLayout::YearRows => Self::from_year_rows(&columns, &records)?,
        };

        debug!(
            ?layout,
            first_year = grid.first_year(),
            last_year = grid.last_year(),
            "parsed wage table"
        );
        Ok(grid)
    }

    fn from_level_rows(
        columns: &[&str],
        records: &[csv::StringRecord],
    ) -> Result<WageGrid, WageTableLoaderError> {
        let years = columns
            .iter()
            .enumerate()
            .map(|(index, column)| parse_year(column, index))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let row_number = index + 1;
                let name = record.get(0).unwrap_or_default().to_string();
                let values = record
                    .iter()
                    .skip(1)
                    .zip(columns)
                    .map(|(cell, column)| parse_cell(cell, row_number, column))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((name, values))
            })
            .collect::<Result<Vec<_>, WageTableLoaderError>>()?;

        Ok(Grid::from_level_rows(years, rows)?)
    }

    fn from_year_rows(
        columns: &[&str],
        records: &[csv::StringRecord],
    ) -> Result<WageGrid, WageTableLoaderError> {
        let mut years = Vec::with_capacity(records.len());
        let mut values: Vec<Vec<Decimal>> = vec![Vec::with_capacity(records.len()); columns.len()];

        for (index, record) in records.iter().enumerate() {
            let row_number = index + 1;
            years.push(parse_year(record.get(0).unwrap_or_default(), row_number)?);
            for ((cell, column), column_values) in
                record.iter().skip(1).zip(columns).zip(values.iter_mut())
            {
                column_values.push(parse_cell(cell, row_number, column)?);
            }
        }

        let rows = columns
            .iter()
            .map(|column| column.to_string())
            .zip(values)
            .collect();
        Ok(Grid::from_level_rows(years, rows)?)
    }

    /// Parse CSV text (the full file contents) into a wage grid.
    pub fn load_from_str(input: &str) -> Result<WageGrid, WageTableLoaderError> {
        Self::parse(input.trim_start_matches('\u{feff}').as_bytes())
    }

    /// Convenience wrapper: read a file from disk and delegate to
    /// [`WageTableLoader::load_from_str`].
    pub fn load_from_file(path: &Path) -> Result<WageGrid, WageTableLoaderError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| WageTableLoaderError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::load_from_str(&contents)
    }
}
