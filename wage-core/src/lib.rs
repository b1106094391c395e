pub mod calculations;
pub mod chart;
pub mod error;
pub mod format;
pub mod model;
pub mod models;
pub mod overrides;
pub mod snapshot;

pub use calculations::FloorAdjustment;
pub use error::WageModelError;
pub use model::{DEFAULT_BASE_YEAR, WageModel};
pub use models::*;
pub use overrides::{InflationOverride, RaiseOverride};
pub use snapshot::Snapshot;
