//! Output formatting and persistence for group averages.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::{GroupAverages, ScanStats};

/// Full report emitted by `summary --json`.
#[derive(Debug, Serialize)]
pub struct SummaryReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub city: &'a str,
    pub scan: ScanStats,
    pub groups: &'a [GroupAverages],
}

impl<'a> SummaryReport<'a> {
    pub fn new(city: &'a str, scan: ScanStats, groups: &'a [GroupAverages]) -> Self {
        Self {
            generated_at: Utc::now(),
            city,
            scan,
            groups,
        }
    }
}

/// Writes an aligned text table of group averages.
pub fn print_pretty<W: Write>(out: &mut W, city: &str, rows: &[GroupAverages]) -> Result<()> {
    writeln!(out, "Averages for {city}")?;
    writeln!(
        out,
        "{:<28} {:<18} {:>8} {:>11} {:>10} {:>7}",
        "Neighbourhood", "Room type", "Listings", "Occupancy%", "Price", "Rating"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<28} {:<18} {:>8} {:>11.2} {:>10.2} {:>7.2}",
            row.neighbourhood,
            row.room_type,
            row.listings,
            row.avg_occupancy_pct,
            row.avg_price,
            row.avg_rating
        )?;
    }
    Ok(())
}

/// Writes the report as pretty-printed JSON.
pub fn print_json<W: Write>(out: &mut W, report: &SummaryReport<'_>) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    Ok(())
}

/// Writes group averages to a CSV file with a header row, replacing any
/// existing file.
pub fn write_averages_csv(path: &Path, rows: &[GroupAverages]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing averages CSV");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "Averages exported");
    Ok(())
}
