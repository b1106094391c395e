mod grid;
mod inflation;
mod level;
mod track;

pub(crate) use grid::{describe_years, validate_years};
pub use grid::{ComparisonGrid, Grid, IncreaseGrid, RealWageGrid, WageGrid, Year};
pub use inflation::InflationTable;
pub use level::Level;
pub use track::Track;
