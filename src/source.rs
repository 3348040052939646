//! Opening gzip-compressed CSV inputs.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::DataError;

/// Opens a `.csv.gz` file as a streaming, decompressing reader.
pub fn open_gzip(path: &Path) -> Result<GzDecoder<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(GzDecoder::new(BufReader::new(file)))
}

/// Builds a header-aware CSV reader over any byte stream.
pub fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader)
}

/// Checks that every name in `required` is present in the header row.
///
/// A UTF-8 BOM in front of the first header is ignored.
pub fn ensure_columns(
    headers: &csv::StringRecord,
    required: &[&'static str],
    dataset: &'static str,
) -> Result<(), DataError> {
    for &column in required {
        let found = headers
            .iter()
            .any(|h| h.trim_start_matches('\u{feff}') == column);
        if !found {
            return Err(DataError::Schema { dataset, column });
        }
    }
    Ok(())
}
