//! Text bar charts for the terminal.
//!
//! Charts are fixed-width and deterministic: one block per neighbourhood,
//! one horizontal bar per room type. Missing averages print as `no data`.
//!
//! Bars use `#`; the scale line shows the axis range the bars map onto.

use crate::analyzers::aggregate::SeriesTable;

/// Default bar width in columns.
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// Lower bound of the rating axis; ratings cluster near the top of the scale.
const RATING_AXIS_MIN: f64 = 3.5;
const RATING_AXIS_MAX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Occupancy,
    Price,
    Rating,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::Occupancy => "Occupancy",
            Metric::Price => "Price",
            Metric::Rating => "Rating",
        }
    }

    fn values(self, table: &SeriesTable, key: &str) -> Vec<f64> {
        let Some(series) = table.series(key) else {
            return Vec::new();
        };
        match self {
            Metric::Occupancy => series.occupancy.clone(),
            Metric::Price => series.price.clone(),
            Metric::Rating => series.rating.clone(),
        }
    }

    /// Axis range for the metric across the whole table.
    fn axis(self, table: &SeriesTable) -> (f64, f64) {
        if self == Metric::Rating {
            return (RATING_AXIS_MIN, RATING_AXIS_MAX);
        }

        let max = table
            .room_types
            .iter()
            .flat_map(|(key, _)| self.values(table, key))
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);

        if max.is_finite() && max > 0.0 {
            (0.0, max)
        } else {
            (0.0, 1.0)
        }
    }
}

/// Grouped bar chart of one metric.
pub fn render_bar_chart(table: &SeriesTable, metric: Metric, title: &str, width: usize) -> String {
    let width = width.max(10);
    let (min, max) = metric.axis(table);
    let label_width = label_width(table);

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&format!("{}: [{min:.2}, {max:.2}]\n", metric.label()));

    for (idx, neighbourhood) in table.neighbourhoods.iter().enumerate() {
        out.push('\n');
        out.push_str(neighbourhood);
        out.push('\n');

        for (key, label) in &table.room_types {
            let value = metric.values(table, key).get(idx).copied().unwrap_or(f64::NAN);
            out.push_str(&format!(
                "  {label:<label_width$} |{}| {}\n",
                bar(value, min, max, width),
                format_value(value)
            ));
        }
    }

    out
}

/// Occupancy bars with each room type's price and rating alongside.
pub fn render_occupancy_relation(table: &SeriesTable, width: usize) -> String {
    let width = width.max(10);
    let (min, max) = Metric::Occupancy.axis(table);
    let label_width = label_width(table);

    let mut out = String::new();
    out.push_str("Occupancy and its relation with Price and Rating\n");
    out.push_str(&format!("Occupancy: [{min:.2}, {max:.2}]\n"));

    for (idx, neighbourhood) in table.neighbourhoods.iter().enumerate() {
        out.push('\n');
        out.push_str(neighbourhood);
        out.push('\n');

        for (key, label) in &table.room_types {
            let Some(series) = table.series(key) else {
                continue;
            };
            let occupancy = series.occupancy.get(idx).copied().unwrap_or(f64::NAN);
            let price = series.price.get(idx).copied().unwrap_or(f64::NAN);
            let rating = series.rating.get(idx).copied().unwrap_or(f64::NAN);

            out.push_str(&format!(
                "  {label:<label_width$} |{}| {}  price {}  rating {}\n",
                bar(occupancy, min, max, width),
                format_value(occupancy),
                format_value(price),
                format_value(rating)
            ));
        }
    }

    out
}

fn label_width(table: &SeriesTable) -> usize {
    table
        .room_types
        .iter()
        .map(|(_, label)| label.chars().count())
        .max()
        .unwrap_or(0)
}

fn bar(value: f64, min: f64, max: f64, width: usize) -> String {
    let filled = if value.is_finite() && max > min {
        let u = ((value - min) / (max - min)).clamp(0.0, 1.0);
        (u * width as f64).round() as usize
    } else {
        0
    };
    format!("{}{}", "#".repeat(filled), " ".repeat(width - filled))
}

fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "no data".to_string()
    }
}
