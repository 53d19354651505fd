//! Sightings trend aggregation
//!
//! Turns the sightings table into a per-day count series. Rows whose date text
//! does not parse as a calendar date are dropped before counting.

use crate::models::Sighting;
use crate::query::ChartKind;
use crate::{Result, WildwatchError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A sightings row whose date parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedSighting {
    pub species: String,
    pub date: NaiveDate,
}

/// Parse the date text of a sightings row.
///
/// Accepts plain ISO dates, ISO/RFC 3339 timestamps (the date part is kept)
/// and slash-separated dates. Everything else is `None`.
#[must_use]
pub fn parse_sighting_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(timestamp.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y/%m/%d").ok()
}

/// Keep the rows with a parseable date, in table order
#[must_use]
pub fn dated_sightings(sightings: &[Sighting]) -> Vec<DatedSighting> {
    let dated: Vec<DatedSighting> = sightings
        .iter()
        .filter_map(|row| {
            parse_sighting_date(&row.date).map(|date| DatedSighting {
                species: row.species.clone(),
                date,
            })
        })
        .collect();

    debug!(
        "{} of {} sightings have a parseable date",
        dated.len(),
        sightings.len()
    );
    dated
}

/// One bar or line vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: usize,
}

/// Sightings per calendar day, ordered by date
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyCounts {
    counts: BTreeMap<NaiveDate, usize>,
}

impl DailyCounts {
    /// Group the dated rows of `sightings` by day.
    ///
    /// Returns a `NoData` error when no row has a parseable date.
    pub fn from_sightings(sightings: &[Sighting]) -> Result<Self> {
        let mut counts = BTreeMap::new();
        for row in dated_sightings(sightings) {
            *counts.entry(row.date).or_insert(0) += 1;
        }

        let counts = Self { counts };
        if counts.is_empty() {
            return Err(WildwatchError::no_data(
                "No sightings with a valid date to chart.",
            ));
        }
        Ok(counts)
    }

    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<usize> {
        self.counts.get(&date).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total sightings across all days
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.counts.keys().copied()
    }

    #[must_use]
    pub fn series(&self) -> Vec<TrendPoint> {
        self.counts
            .iter()
            .map(|(date, count)| TrendPoint {
                date: *date,
                count: *count,
            })
            .collect()
    }
}

/// Everything the chart widget needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendChart {
    pub kind: ChartKind,
    pub points: Vec<TrendPoint>,
}

impl TrendChart {
    #[must_use]
    pub fn new(kind: ChartKind, counts: &DailyCounts) -> Self {
        Self {
            kind,
            points: counts.series(),
        }
    }
}
