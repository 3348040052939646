//! Calendar pass: unavailable nights per listing.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::error::DataError;
use crate::source::{csv_reader, ensure_columns, open_gzip};

const REQUIRED_COLUMNS: &[&str] = &["listing_id", "available"];

/// Encoding used by the calendar for a night that is not available.
const UNAVAILABLE: &str = "f";

#[derive(Debug, Deserialize)]
struct CalendarRow {
    listing_id: String,
    available: String,
}

/// Unavailable-night counts keyed by listing identifier.
///
/// Every identifier seen in the calendar is present, including those with
/// zero unavailable nights.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CalendarIndex {
    nights: HashMap<String, u32>,
}

impl CalendarIndex {
    /// Streams a calendar CSV and counts unavailable nights per listing.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Schema`] if `listing_id` or `available` is missing
    /// from the header, or [`DataError::Csv`] for rows that cannot be read.
    #[tracing::instrument(name = "calendar_pass", skip_all)]
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut rdr = csv_reader(reader);
        ensure_columns(rdr.headers()?, REQUIRED_COLUMNS, "calendar")?;

        let mut nights: HashMap<String, u32> = HashMap::new();
        let mut rows = 0u64;

        for result in rdr.deserialize() {
            let row: CalendarRow = result?;
            rows += 1;

            let counter = nights.entry(row.listing_id).or_insert(0);
            if row.available == UNAVAILABLE {
                *counter += 1;
            }
        }

        info!(rows, listings = nights.len(), "Calendar indexed");
        Ok(Self { nights })
    }

    /// Reads a gzip-compressed calendar file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = open_gzip(path)?;
        Self::from_reader(reader).with_context(|| format!("reading calendar {}", path.display()))
    }

    /// Unavailable nights for a listing, `None` if the calendar never saw it.
    pub fn unavailable_nights(&self, listing_id: &str) -> Option<u32> {
        self.nights.get(listing_id).copied()
    }

    pub fn len(&self) -> usize {
        self.nights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nights.is_empty()
    }
}
