//! Grouped sums, averages and chart series.
//!
//! The listings pass fills [`types::GroupedData`]; this module turns those
//! sums into rounded averages, export rows and per-room-type series for the
//! charts.

pub mod aggregate;
pub mod types;
pub mod utility;
