//! Core data model for the usage-preparation pipeline.
//!
//! The pipeline moves between two shapes: [`WideRecord`] (one row per country,
//! one slot per year) and [`LongRecord`] (one row per country-year pair). Years
//! are plain bounded integers rather than a categorical type, so "previous
//! year" lookups are arithmetic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

pub const YEAR_MIN: u16 = 2000;
pub const YEAR_MAX: u16 = 2023;
/// Number of years covered by the pipeline (2000 through 2023 inclusive).
pub const YEAR_SPAN: usize = (YEAR_MAX - YEAR_MIN + 1) as usize;

/// Fallback usage percentage when the entire dataset carries no observations.
pub const DEFAULT_USAGE: f64 = 50.0;

/// A calendar year bounded to the pipeline's supported range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(u16);

impl Year {
    pub fn new(year: u16) -> Result<Self, PipelineError> {
        if (YEAR_MIN..=YEAR_MAX).contains(&year) {
            Ok(Year(year))
        } else {
            Err(PipelineError::YearOutOfRange(year))
        }
    }

    /// Parses a wide-table column label such as `"2007"`.
    pub fn parse_label(label: &str) -> Result<Self, PipelineError> {
        let value: u16 = label
            .trim()
            .parse()
            .map_err(|_| PipelineError::InvalidYearLabel(label.to_string()))?;
        Self::new(value)
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Zero-based offset from [`YEAR_MIN`], usable as a slot index.
    pub fn index(self) -> usize {
        (self.0 - YEAR_MIN) as usize
    }

    pub fn from_index(index: usize) -> Result<Self, PipelineError> {
        Self::new(YEAR_MIN + index as u16)
    }

    /// The preceding year, or `None` at the lower bound.
    pub fn prev(self) -> Option<Self> {
        (self.0 > YEAR_MIN).then(|| Year(self.0 - 1))
    }

    pub fn all() -> impl Iterator<Item = Year> {
        (YEAR_MIN..=YEAR_MAX).map(Year)
    }
}

impl TryFrom<u16> for Year {
    type Error = PipelineError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Year::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> u16 {
        year.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provenance of a usage value: observed in the source table or synthesized
/// by the imputer. Assigned exactly once per row and never mutated after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    Original,
    Imputed,
}

impl DataSource {
    pub fn label(self) -> &'static str {
        match self {
            DataSource::Original => "Original",
            DataSource::Imputed => "Imputed",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered growth bucket derived from year-over-year growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GrowthCategory {
    SignificantDecline,
    ModerateDecline,
    Stable,
    ModerateGrowth,
    HighGrowth,
}

impl GrowthCategory {
    pub fn label(self) -> &'static str {
        match self {
            GrowthCategory::SignificantDecline => "Significant Decline",
            GrowthCategory::ModerateDecline => "Moderate Decline",
            GrowthCategory::Stable => "Stable",
            GrowthCategory::ModerateGrowth => "Moderate Growth",
            GrowthCategory::HighGrowth => "High Growth",
        }
    }
}

impl fmt::Display for GrowthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One country in wide format: identity plus one optional usage value per year.
/// Missing slots are cells that were blank or failed numeric coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WideRecord {
    pub country_name: String,
    pub country_code: String,
    pub values: [Option<f64>; YEAR_SPAN],
}

impl WideRecord {
    pub fn new(country_name: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            country_name: country_name.into(),
            country_code: country_code.into(),
            values: [None; YEAR_SPAN],
        }
    }

    pub fn value(&self, year: Year) -> Option<f64> {
        self.values[year.index()]
    }

    pub fn set_value(&mut self, year: Year, value: Option<f64>) {
        self.values[year.index()] = value;
    }
}

/// One country-year row of the canonical long table.
///
/// `internet_usage` and `data_source` are populated by the imputer;
/// `yoy_growth`, `growth_category`, and `cagr_3yr` by the growth stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub country_name: String,
    pub country_code: String,
    pub year: Year,
    pub internet_usage: Option<f64>,
    pub data_source: Option<DataSource>,
    pub yoy_growth: Option<f64>,
    pub growth_category: Option<GrowthCategory>,
    pub cagr_3yr: Option<f64>,
}

impl LongRecord {
    pub fn new(
        country_name: impl Into<String>,
        country_code: impl Into<String>,
        year: Year,
        internet_usage: Option<f64>,
    ) -> Self {
        Self {
            country_name: country_name.into(),
            country_code: country_code.into(),
            year,
            internet_usage,
            data_source: None,
            yoy_growth: None,
            growth_category: None,
            cagr_3yr: None,
        }
    }
}
