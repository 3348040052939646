pub mod analyzers;
pub mod calendar;
pub mod chart;
pub mod error;
pub mod listings;
pub mod menu;
pub mod output;
pub mod source;
