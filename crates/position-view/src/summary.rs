//! Aggregates over the filtered records.

use serde::{Deserialize, Serialize};

use crate::position::Position;

/// Header figures for the filtered record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of records passing the filters.
    pub total: usize,

    /// Mean speed in km/h, rounded to the nearest integer.
    pub average_speed: i64,
}

impl Summary {
    /// Summarise the filtered records.
    #[must_use]
    pub fn of(records: &[&Position]) -> Self {
        Self { total: records.len(), average_speed: average_speed(records) }
    }
}

/// Mean speed over `records`, treating absent speeds as 0 and rounding
/// halves up. An empty set averages 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn average_speed(records: &[&Position]) -> i64 {
    if records.is_empty() {
        return 0;
    }
    let sum: f64 = records.iter().map(|r| r.speed()).sum();
    let mean = sum / records.len() as f64;
    (mean + 0.5).floor() as i64
}
