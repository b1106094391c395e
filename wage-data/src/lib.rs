pub mod loader;

pub use loader::{TableLayout, WageTableLoader, WageTableLoaderError};
