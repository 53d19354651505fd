//! Search filters
//!
//! Everything the user picks before triggering a search: the area, the animal
//! (preset or free text), the day window, the threatened-only toggle and the
//! chart style.

use crate::models::AreaSelection;
use crate::{Result, WildwatchError};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Animal selector entry that disables the species filter
pub const ALL_ANIMALS: &str = "All";

/// Animal selector entries in display order
pub const ANIMAL_OPTIONS: [&str; 27] = [
    ALL_ANIMALS,
    "Deer",
    "Tiger",
    "Elephant",
    "Leopard",
    "Bear",
    "Fox",
    "Wolf",
    "Lion",
    "Cheetah",
    "Monkey",
    "Zebra",
    "Giraffe",
    "Panda",
    "Kangaroo",
    "Rabbit",
    "Crocodile",
    "Peacock",
    "Falcon",
    "Eagle",
    "Owl",
    "Dolphin",
    "Shark",
    "Whale",
    "Snake",
    "Lizard",
    "Frog",
];

pub const MIN_DAYS: u32 = 7;
pub const MAX_DAYS: u32 = 30;
pub const DEFAULT_DAYS: u32 = 14;

/// Trend chart style
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Line => write!(f, "Line Chart"),
            ChartKind::Bar => write!(f, "Bar Chart"),
        }
    }
}

impl FromStr for ChartKind {
    type Err = WildwatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" | "line chart" => Ok(ChartKind::Line),
            "bar" | "bar chart" => Ok(ChartKind::Bar),
            other => Err(WildwatchError::validation(format!(
                "Unknown chart type '{other}'. Must be line or bar"
            ))),
        }
    }
}

/// Map a user-typed animal to its selector entry (case-insensitive)
pub fn canonical_animal(name: &str) -> Result<&'static str> {
    let wanted = name.trim();
    ANIMAL_OPTIONS
        .iter()
        .find(|option| option.eq_ignore_ascii_case(wanted))
        .copied()
        .ok_or_else(|| {
            WildwatchError::validation(format!(
                "Unknown animal '{wanted}'. Use --custom-animal for free-text names"
            ))
        })
}

/// Validate the day window against the 7..=30 slider range
pub fn validate_days(days: u32) -> Result<u32> {
    if (MIN_DAYS..=MAX_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(WildwatchError::validation(format!(
            "days must be between {MIN_DAYS} and {MAX_DAYS}, got {days}"
        )))
    }
}

/// A complete set of search filters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub area: AreaSelection,
    /// Preset animal, [`ALL_ANIMALS`] for no preset filter
    pub animal: String,
    /// Free-text override of the preset
    pub custom_animal: Option<String>,
    pub days: u32,
    pub threatened_only: bool,
    pub chart: ChartKind,
}

impl SearchQuery {
    /// Filters for `area` with every other control at its default
    #[must_use]
    pub fn new(area: AreaSelection) -> Self {
        Self {
            area,
            animal: ALL_ANIMALS.to_string(),
            custom_animal: None,
            days: DEFAULT_DAYS,
            threatened_only: false,
            chart: ChartKind::default(),
        }
    }

    pub fn with_animal(mut self, animal: &str) -> Result<Self> {
        self.animal = canonical_animal(animal)?.to_string();
        Ok(self)
    }

    #[must_use]
    pub fn with_custom_animal(mut self, custom: Option<String>) -> Self {
        self.custom_animal = custom;
        self
    }

    pub fn with_days(mut self, days: u32) -> Result<Self> {
        self.days = validate_days(days)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_threatened_only(mut self, threatened_only: bool) -> Self {
        self.threatened_only = threatened_only;
        self
    }

    #[must_use]
    pub fn with_chart(mut self, chart: ChartKind) -> Self {
        self.chart = chart;
        self
    }

    /// Species text sent as `q`, if any.
    ///
    /// A non-empty custom name wins over the preset, even when it trims down to
    /// nothing. "All" means no filter.
    #[must_use]
    pub fn query_term(&self) -> Option<String> {
        let term = match self.custom_animal.as_deref() {
            Some(custom) if !custom.is_empty() => custom.trim(),
            _ if self.animal != ALL_ANIMALS => self.animal.as_str(),
            _ => "",
        };

        (!term.is_empty()).then(|| term.to_string())
    }

    /// First day of the observation window
    #[must_use]
    pub fn window_start(&self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(i64::from(self.days))
    }
}
