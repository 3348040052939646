//! Listings pass: join against the calendar and accumulate group sums.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::analyzers::types::{GroupedData, ScanStats};
use crate::calendar::CalendarIndex;
use crate::error::DataError;
use crate::source::{csv_reader, ensure_columns, open_gzip};

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "price",
    "review_scores_rating",
    "neighbourhood_cleansed",
    "room_type",
];

/// Fixed calendar length used for occupancy, regardless of leap years.
pub const NIGHTS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Deserialize)]
struct ListingRow {
    id: String,
    price: String,
    #[serde(rename = "review_scores_rating")]
    rating: String,
    #[serde(rename = "neighbourhood_cleansed")]
    neighbourhood: String,
    room_type: String,
}

/// Output of the listings pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListingsSummary {
    pub grouped: GroupedData,
    /// Distinct neighbourhoods in first-seen order.
    pub neighbourhoods: Vec<String>,
    /// Distinct room types in first-seen order.
    pub room_types: Vec<String>,
    pub stats: ScanStats,
}

impl ListingsSummary {
    /// Streams a listings CSV, keeping only listings present in `calendar`
    /// with both a price and a rating.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Schema`] for a missing required column,
    /// [`DataError::PriceFormat`] or [`DataError::RatingFormat`] when a
    /// non-empty value is not numeric, and [`DataError::Csv`] for unreadable
    /// rows. Any of these aborts the pass.
    #[tracing::instrument(name = "listings_pass", skip_all, fields(calendar_listings = calendar.len()))]
    pub fn from_reader<R: Read>(reader: R, calendar: &CalendarIndex) -> Result<Self, DataError> {
        let mut rdr = csv_reader(reader);
        ensure_columns(rdr.headers()?, REQUIRED_COLUMNS, "listings")?;

        let mut summary = ListingsSummary::default();

        for result in rdr.deserialize() {
            let row: ListingRow = result?;
            summary.stats.rows_read += 1;

            let Some(unavailable) = calendar.unavailable_nights(&row.id) else {
                debug!(listing_id = %row.id, "Skipping listing absent from calendar");
                summary.stats.not_in_calendar += 1;
                continue;
            };

            if row.price.is_empty() {
                debug!(listing_id = %row.id, "Skipping listing without price");
                summary.stats.missing_price += 1;
                continue;
            }

            if row.rating.is_empty() {
                debug!(listing_id = %row.id, "Skipping listing without rating");
                summary.stats.missing_rating += 1;
                continue;
            }

            let price = normalize_price(&row.price).ok_or_else(|| DataError::PriceFormat {
                listing_id: row.id.clone(),
                value: row.price.clone(),
            })?;
            let rating = parse_rating(&row.rating).ok_or_else(|| DataError::RatingFormat {
                listing_id: row.id.clone(),
                value: row.rating.clone(),
            })?;
            let occupancy = unavailable as f64 / NIGHTS_PER_YEAR;

            summary
                .grouped
                .entry(&row.neighbourhood, &row.room_type)
                .add(occupancy, price, rating);
            summary.stats.rows_used += 1;

            push_distinct(&mut summary.neighbourhoods, row.neighbourhood);
            push_distinct(&mut summary.room_types, row.room_type);
        }

        info!(
            rows_read = summary.stats.rows_read,
            rows_used = summary.stats.rows_used,
            not_in_calendar = summary.stats.not_in_calendar,
            missing_price = summary.stats.missing_price,
            missing_rating = summary.stats.missing_rating,
            groups = summary.grouped.len(),
            listings = summary.grouped.listing_count(),
            "Listings aggregated"
        );

        Ok(summary)
    }

    /// Reads a gzip-compressed listings file.
    pub fn from_path(path: &Path, calendar: &CalendarIndex) -> Result<Self> {
        let reader = open_gzip(path)?;
        Self::from_reader(reader, calendar)
            .with_context(|| format!("reading listings {}", path.display()))
    }
}

/// Runs both passes: the calendar must be fully indexed before the listings
/// pass starts.
pub fn load(calendar_path: &Path, listings_path: &Path) -> Result<ListingsSummary> {
    let calendar = CalendarIndex::from_path(calendar_path)?;
    ListingsSummary::from_path(listings_path, &calendar)
}

/// Strips the single leading currency symbol and thousands separators from a
/// price such as `"$1,234.50"`. Returns `None` unless what remains is a
/// finite number greater than zero.
pub fn normalize_price(price: &str) -> Option<f64> {
    let mut chars = price.chars();
    chars.next()?;
    let value: f64 = chars.as_str().replace(',', "").trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Parses a review score, ignoring surrounding whitespace. Returns `None`
/// unless the score is a finite, non-negative number.
pub fn parse_rating(rating: &str) -> Option<f64> {
    let value: f64 = rating.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

fn push_distinct(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}
