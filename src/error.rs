//! Error kinds surfaced by the reading and aggregation passes.

use thiserror::Error;

/// Failures raised while reading the calendar or listings datasets.
///
/// Every variant is fatal for the run: the readers never skip a row that
/// fails numeric parsing once it has passed the empty-field filters.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("{dataset} header is missing required column '{column}'")]
    Schema {
        dataset: &'static str,
        column: &'static str,
    },

    #[error("listing {listing_id}: price '{value}' is not a number")]
    PriceFormat { listing_id: String, value: String },

    #[error("listing {listing_id}: rating '{value}' is not a number")]
    RatingFormat { listing_id: String, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
