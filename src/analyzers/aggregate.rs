use crate::analyzers::types::{GroupAverages, GroupedData, RoomTypeSeries};
use crate::analyzers::utility::{average, normalize_labels};
use crate::listings::ListingsSummary;
use std::collections::HashMap;

/// Average occupancy (percent), price and rating for one group.
///
/// Each value is rounded to 2 decimals. All three are NaN when the group has
/// no data, which the charts render as "no data".
pub fn averages(grouped: &GroupedData, neighbourhood: &str, room_type: &str) -> (f64, f64, f64) {
    match grouped.get(neighbourhood, room_type) {
        Some(acc) if acc.count > 0 => (
            average(acc.occupancy_sum * 100.0, acc.count),
            average(acc.price_sum, acc.count),
            average(acc.rating_sum, acc.count),
        ),
        _ => (f64::NAN, f64::NAN, f64::NAN),
    }
}

/// One row per group holding data, in neighbourhood then room-type order.
pub fn group_averages(summary: &ListingsSummary) -> Vec<GroupAverages> {
    let mut rows = Vec::new();

    for neighbourhood in &summary.neighbourhoods {
        for room_type in &summary.room_types {
            let Some(acc) = summary.grouped.get(neighbourhood, room_type) else {
                continue;
            };
            if acc.count == 0 {
                continue;
            }

            let (occupancy, price, rating) = averages(&summary.grouped, neighbourhood, room_type);
            rows.push(GroupAverages {
                neighbourhood: neighbourhood.clone(),
                room_type: room_type.clone(),
                listings: acc.count,
                avg_occupancy_pct: occupancy,
                avg_price: price,
                avg_rating: rating,
            });
        }
    }

    rows
}

/// Chart-ready averages: one series per normalized room type, each holding
/// one value per neighbourhood.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    pub neighbourhoods: Vec<String>,
    /// `(key, label)` pairs in first-seen order.
    pub room_types: Vec<(String, String)>,
    series: HashMap<String, RoomTypeSeries>,
}

impl SeriesTable {
    /// Builds the table from a listings summary.
    ///
    /// Room types that normalize to the same key share one series, filled from
    /// the first label seen for that key.
    pub fn build(summary: &ListingsSummary) -> Self {
        let room_types = normalize_labels(&summary.room_types);
        let mut series: HashMap<String, RoomTypeSeries> = HashMap::new();

        for neighbourhood in &summary.neighbourhoods {
            for (key, label) in &room_types {
                let (occupancy, price, rating) = averages(&summary.grouped, neighbourhood, label);
                let entry = series.entry(key.clone()).or_default();
                entry.occupancy.push(occupancy);
                entry.price.push(price);
                entry.rating.push(rating);
            }
        }

        Self {
            neighbourhoods: summary.neighbourhoods.clone(),
            room_types,
            series,
        }
    }

    pub fn series(&self, key: &str) -> Option<&RoomTypeSeries> {
        self.series.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::ScanStats;

    fn summary() -> ListingsSummary {
        let mut grouped = GroupedData::new();
        grouped.entry("Valby", "Private room").add(0.5, 100.0, 4.0);
        grouped.entry("Valby", "Private room").add(0.25, 51.0, 4.5);
        grouped.entry("Nørrebro", "Entire home/apt").add(2.0 / 365.0, 100.0, 4.5);

        ListingsSummary {
            grouped,
            neighbourhoods: vec!["Valby".into(), "Nørrebro".into()],
            room_types: vec!["Private room".into(), "Entire home/apt".into()],
            stats: ScanStats::default(),
        }
    }

    #[test]
    fn test_averages_absent_group_is_nan() {
        let s = summary();
        let (o, p, r) = averages(&s.grouped, "Valby", "Hotel room");
        assert!(o.is_nan() && p.is_nan() && r.is_nan());

        let (o, p, r) = averages(&s.grouped, "Christianshavn", "Private room");
        assert!(o.is_nan() && p.is_nan() && r.is_nan());
    }

    #[test]
    fn test_averages_zero_count_is_nan() {
        let mut grouped = GroupedData::new();
        grouped.entry("Valby", "Private room");
        let (o, p, r) = averages(&grouped, "Valby", "Private room");
        assert!(o.is_nan() && p.is_nan() && r.is_nan());
    }

    #[test]
    fn test_averages_divides_and_rounds() {
        let s = summary();
        assert_eq!(averages(&s.grouped, "Valby", "Private room"), (37.5, 75.5, 4.25));
    }

    #[test]
    fn test_averages_worked_example() {
        let s = summary();
        assert_eq!(averages(&s.grouped, "Nørrebro", "Entire home/apt"), (0.55, 100.0, 4.5));
    }

    #[test]
    fn test_group_averages_only_existing_groups() {
        let rows = group_averages(&summary());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].neighbourhood, "Valby");
        assert_eq!(rows[0].room_type, "Private room");
        assert_eq!(rows[0].listings, 2);
        assert_eq!(rows[1].neighbourhood, "Nørrebro");
        assert_eq!(rows[1].avg_occupancy_pct, 0.55);
    }

    #[test]
    fn test_series_table_has_one_value_per_neighbourhood() {
        let table = SeriesTable::build(&summary());

        assert_eq!(
            table.room_types,
            vec![
                ("PRIVATE_ROOM".to_string(), "Private room".to_string()),
                ("ENTIRE_HOME_APT".to_string(), "Entire home/apt".to_string()),
            ]
        );

        let private = table.series("PRIVATE_ROOM").unwrap();
        assert_eq!(private.price.len(), 2);
        assert_eq!(private.price[0], 75.5);
        assert!(private.price[1].is_nan());

        let entire = table.series("ENTIRE_HOME_APT").unwrap();
        assert!(entire.rating[0].is_nan());
        assert_eq!(entire.rating[1], 4.5);
        assert_eq!(entire.occupancy[1], 0.55);
    }

    #[test]
    fn test_series_table_merges_colliding_keys() {
        let mut s = summary();
        s.room_types.push("private room".into());
        let table = SeriesTable::build(&s);

        assert_eq!(table.room_types.len(), 2);
        assert_eq!(table.series("PRIVATE_ROOM").unwrap().price.len(), 2);
    }
}
