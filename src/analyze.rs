//! # Log Analysis
//!
//! Pure computation over a user's log history, ordered most-recent-first.
//!
//! Both log kinds reduce to the same shape for analysis: a categorical label
//! (waste type, transport mode) plus a numeric magnitude (quantity, emissions).
//! The [`Sample`] trait captures that shape so the totals and trend logic is
//! written once.
//!
//! Trend policy: compare the newest 5 entries against the 5 before them. Less
//! is better for both waste quantity and carbon emissions.

use indexmap::IndexMap;

use crate::models::{CarbonLogEntry, WasteLogEntry};

/// Entries per comparison window for trend detection.
pub const TREND_WINDOW: usize = 5;

pub trait Sample {
    fn category(&self) -> &str;
    fn magnitude(&self) -> f64;
}

impl Sample for WasteLogEntry {
    fn category(&self) -> &str {
        &self.waste_type
    }

    fn magnitude(&self) -> f64 {
        self.quantity
    }
}

impl Sample for CarbonLogEntry {
    fn category(&self) -> &str {
        &self.transport_mode
    }

    fn magnitude(&self) -> f64 {
        self.emissions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Worsening,
    Flat,
    InsufficientData,
}

/// Summed magnitude per category, keyed in first-encountered order.
pub fn category_totals<T: Sample>(entries: &[T]) -> IndexMap<String, f64> {
    let mut totals = IndexMap::new();

    for entry in entries {
        *totals.entry(entry.category().to_string()).or_insert(0.0) += entry.magnitude();
    }

    totals
}

/// The category with the strictly largest total. Equal totals keep the
/// category seen first in the input.
pub fn dominant_category<T: Sample>(entries: &[T]) -> Option<String> {
    let totals = category_totals(entries);

    let mut best: Option<(&str, f64)> = None;
    for (category, &total) in &totals {
        if best.is_none_or(|(_, current)| total > current) {
            best = Some((category, total));
        }
    }

    best.map(|(category, _)| category.to_string())
}

/// Newest-5 versus prior-5 comparison of summed magnitudes.
///
/// Fewer than [`TREND_WINDOW`] entries cannot be compared at all. A short or
/// empty prior window sums whatever exists, so exactly 5 positive entries
/// compare against zero and read as [`Trend::Worsening`].
pub fn trend_direction<T: Sample>(entries: &[T]) -> Trend {
    if entries.len() < TREND_WINDOW {
        return Trend::InsufficientData;
    }

    let recent: f64 = entries[..TREND_WINDOW].iter().map(Sample::magnitude).sum();
    let prior: f64 = entries[TREND_WINDOW..entries.len().min(2 * TREND_WINDOW)]
        .iter()
        .map(Sample::magnitude)
        .sum();

    if recent < prior {
        Trend::Improving
    } else if recent > prior {
        Trend::Worsening
    } else {
        Trend::Flat
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModeUsage {
    pub emissions: f64,
    pub distance: f64,
    pub trips: u32,
}

/// Per-transport-mode emission, distance, and trip totals, keyed in
/// first-encountered order.
pub fn mode_totals(entries: &[CarbonLogEntry]) -> IndexMap<String, ModeUsage> {
    let mut totals: IndexMap<String, ModeUsage> = IndexMap::new();

    for entry in entries {
        let usage = totals.entry(entry.transport_mode.clone()).or_default();
        usage.emissions += entry.emissions;
        usage.distance += entry.distance;
        usage.trips += 1;
    }

    totals
}
