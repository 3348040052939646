//! Data types used by the aggregation pipeline.

use serde::Serialize;
use std::collections::HashMap;

/// Running sums for one `(neighbourhood, room_type)` group.
///
/// `count == 0` exactly when all three sums are zero; every contribution is
/// non-negative so the sums only ever grow.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GroupAccumulator {
    pub occupancy_sum: f64,
    pub price_sum: f64,
    pub rating_sum: f64,
    pub count: u64,
}

impl GroupAccumulator {
    /// Folds one accepted listing into the group.
    pub fn add(&mut self, occupancy: f64, price: f64, rating: f64) {
        self.occupancy_sum += occupancy;
        self.price_sum += price;
        self.rating_sum += rating;
        self.count += 1;
    }
}

/// Grouped sums keyed by neighbourhood, then room type.
///
/// Keys are stored exactly as they appear in the listings file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GroupedData {
    groups: HashMap<String, HashMap<String, GroupAccumulator>>,
}

impl GroupedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the accumulator for a group, creating an empty one if needed.
    pub fn entry(&mut self, neighbourhood: &str, room_type: &str) -> &mut GroupAccumulator {
        self.groups
            .entry(neighbourhood.to_string())
            .or_default()
            .entry(room_type.to_string())
            .or_default()
    }

    pub fn get(&self, neighbourhood: &str, room_type: &str) -> Option<&GroupAccumulator> {
        self.groups.get(neighbourhood)?.get(room_type)
    }

    /// Number of `(neighbourhood, room_type)` groups holding data.
    pub fn len(&self) -> usize {
        self.groups.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of listings folded into any group.
    pub fn listing_count(&self) -> u64 {
        self.groups
            .values()
            .flat_map(HashMap::values)
            .map(|acc| acc.count)
            .sum()
    }
}

/// Counters collected during the listings pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub rows_read: u64,
    pub rows_used: u64,
    pub not_in_calendar: u64,
    pub missing_price: u64,
    pub missing_rating: u64,
}

/// Averages for one existing group, as exported and printed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverages {
    pub neighbourhood: String,
    pub room_type: String,
    pub listings: u64,
    pub avg_occupancy_pct: f64,
    pub avg_price: f64,
    pub avg_rating: f64,
}

/// Per-room-type series, one entry per neighbourhood in display order.
///
/// NaN entries mark neighbourhoods without data for the room type.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoomTypeSeries {
    pub occupancy: Vec<f64>,
    pub price: Vec<f64>,
    pub rating: Vec<f64>,
}
