use flate2::Compression;
use flate2::write::GzEncoder;
use listing_stats::analyzers::aggregate::{SeriesTable, averages, group_averages};
use listing_stats::calendar::CalendarIndex;
use listing_stats::error::DataError;
use listing_stats::listings::{self, ListingsSummary};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CALENDAR: &str = "\
listing_id,date,available,price,adjusted_price,minimum_nights,maximum_nights
L1,2024-06-01,f,$100.00,,2,30
L1,2024-06-02,t,$100.00,,2,30
L1,2024-06-03,f,$100.00,,2,30
L2,2024-06-01,t,$80.00,,1,10
L2,2024-06-02,f,$80.00,,1,10
L3,2024-06-01,f,$60.00,,1,10
L4,2024-06-01,f,$45.00,,1,10
";

const LISTINGS: &str = "\
id,listing_url,name,neighbourhood_cleansed,room_type,price,review_scores_rating
L1,https://example.com/1,Sunny flat,Nørrebro,Entire home/apt,$100.00,4.5
L2,https://example.com/2,Room near lakes,Nørrebro,Private room,\"$1,080.00\",4.80
L3,https://example.com/3,No reviews yet,Vesterbro,Private room,$60.00,
L4,https://example.com/4,Unpriced,Vesterbro,Private room,,4.1
L5,https://example.com/5,Not in calendar,Amager Vest,Hotel room,$150.00,4.9
";

fn write_gz(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    encoder.write_all(contents.as_bytes()).unwrap();
    encoder.finish().unwrap();
    path
}

fn fixtures() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let calendar = write_gz(dir.path(), "calendar.csv.gz", CALENDAR);
    let listings = write_gz(dir.path(), "listings.csv.gz", LISTINGS);
    (dir, calendar, listings)
}

#[test]
fn test_full_pipeline() {
    let (_dir, calendar, listings) = fixtures();
    let summary = listings::load(&calendar, &listings).expect("pipeline should succeed");

    let acc = summary.grouped.get("Nørrebro", "Entire home/apt").unwrap();
    assert!((acc.occupancy_sum - 0.005479).abs() < 1e-6);
    assert_eq!(acc.price_sum, 100.0);
    assert_eq!(acc.rating_sum, 4.5);
    assert_eq!(acc.count, 1);

    assert_eq!(
        averages(&summary.grouped, "Nørrebro", "Entire home/apt"),
        (0.55, 100.0, 4.5)
    );
    assert_eq!(
        averages(&summary.grouped, "Nørrebro", "Private room"),
        (0.27, 1080.0, 4.8)
    );

    assert_eq!(summary.neighbourhoods, vec!["Nørrebro"]);
    assert_eq!(summary.room_types, vec!["Entire home/apt", "Private room"]);
    assert_eq!(summary.stats.rows_read, 5);
    assert_eq!(summary.stats.rows_used, 2);
    assert_eq!(summary.stats.missing_rating, 1);
    assert_eq!(summary.stats.missing_price, 1);
    assert_eq!(summary.stats.not_in_calendar, 1);
}

#[test]
fn test_calendar_counts_from_gzip() {
    let (_dir, calendar, _) = fixtures();
    let index = CalendarIndex::from_path(&calendar).unwrap();

    assert_eq!(index.len(), 4);
    assert_eq!(index.unavailable_nights("L1"), Some(2));
    assert_eq!(index.unavailable_nights("L2"), Some(1));
    assert_eq!(index.unavailable_nights("L5"), None);
}

#[test]
fn test_pipeline_is_idempotent() {
    let (_dir, calendar, listings) = fixtures();
    let first = listings::load(&calendar, &listings).unwrap();
    let second = listings::load(&calendar, &listings).unwrap();

    assert_eq!(first, second);
    assert_eq!(group_averages(&first), group_averages(&second));
}

#[test]
fn test_excluded_listings_do_not_appear() {
    let (_dir, calendar, listings) = fixtures();
    let summary = listings::load(&calendar, &listings).unwrap();

    assert!(!summary.neighbourhoods.iter().any(|n| n == "Amager Vest"));
    assert!(!summary.room_types.iter().any(|r| r == "Hotel room"));
    assert!(!summary.neighbourhoods.iter().any(|n| n == "Vesterbro"));

    let (o, p, r) = averages(&summary.grouped, "Amager Vest", "Hotel room");
    assert!(o.is_nan() && p.is_nan() && r.is_nan());
}

#[test]
fn test_series_table_from_gzip_pipeline() {
    let (_dir, calendar, listings) = fixtures();
    let summary = listings::load(&calendar, &listings).unwrap();
    let table = SeriesTable::build(&summary);

    let entire = table.series("ENTIRE_HOME_APT").unwrap();
    assert_eq!(entire.occupancy, vec![0.55]);
    assert_eq!(table.series("PRIVATE_ROOM").unwrap().price, vec![1080.0]);
}

#[test]
fn test_schema_error_surfaces_through_anyhow() {
    let dir = tempfile::tempdir().unwrap();
    let calendar = write_gz(dir.path(), "calendar.csv.gz", "listing_id,date\nL1,2024-06-01\n");

    let err = CalendarIndex::from_path(&calendar).unwrap_err();
    let data_err = err.downcast_ref::<DataError>().expect("typed error kept");
    assert!(matches!(data_err, DataError::Schema { column: "available", .. }));
}

#[test]
fn test_price_error_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let calendar = write_gz(dir.path(), "calendar.csv.gz", "listing_id,available\nL1,f\n");
    let listings = write_gz(
        dir.path(),
        "listings.csv.gz",
        "id,price,review_scores_rating,neighbourhood_cleansed,room_type\nL1,$??,4.0,Valby,Private room\n",
    );

    let index = CalendarIndex::from_path(&calendar).unwrap();
    let err = ListingsSummary::from_path(&listings, &index).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DataError>(),
        Some(DataError::PriceFormat { .. })
    ));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = listings::load(&dir.path().join("nope.csv.gz"), &dir.path().join("nope2.csv.gz"));
    assert!(result.is_err());
}
