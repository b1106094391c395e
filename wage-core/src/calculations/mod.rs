//! Wage projection calculations.
//!
//! Each stage of the recompute pipeline is a pure function from grids to a
//! new grid:
//!
//! 1. [`gross_increases`]: wages → year-over-year ratios
//! 2. [`net_increases`]: gross ratios ÷ inflation factor
//! 3. [`real_wages`]: chained net ratios from the base year
//!
//! Raise overrides additionally run [`wages_from_increases`],
//! [`fte60_projection`] and [`enforce_floor`].

pub mod common;
pub mod increases;
pub mod projection;
pub mod real_wages;

pub use increases::{gross_increases, net_increases};
pub use projection::{
    FloorAdjustment, derive_fte60, enforce_floor, fte60_projection, wages_from_increases,
};
pub use real_wages::real_wages;
