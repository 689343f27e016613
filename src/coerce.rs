//! Numeric coercion: the entry guard between raw string cells and the typed
//! wide table.
//!
//! Mirrors the loader contract: any year cell that fails to parse as a finite
//! number degrades to missing instead of raising, so dirty source data never
//! propagates garbage into regression fitting.

use crate::{
    error::PipelineError,
    model::{WideRecord, Year},
};

pub const COUNTRY_NAME_COLUMN: &str = "country_name";
pub const COUNTRY_CODE_COLUMN: &str = "country_code";

/// Coerces a single raw cell to a usage percentage. Blank, unparseable, and
/// non-finite values become `None`, as do numbers outside the [0, 100]
/// domain; the imputer treats all of them as gaps to fill.
pub fn coerce_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && (0.0..=100.0).contains(value))
}

/// Column positions of a wide-format header row.
///
/// Identity columns are matched by name (case-insensitive); every remaining
/// column whose label parses as an integer must be a year in 2000-2023. Other
/// labels (`region`, `gdp_per_capita`, ...) are metadata the pipeline ignores.
#[derive(Debug, Clone)]
pub struct WideLayout {
    name_idx: usize,
    code_idx: usize,
    year_columns: Vec<(usize, Year)>,
}

impl WideLayout {
    pub fn from_headers(headers: &[String]) -> Result<Self, PipelineError> {
        let name_idx = find_column(headers, COUNTRY_NAME_COLUMN)?;
        let code_idx = find_column(headers, COUNTRY_CODE_COLUMN)?;

        let mut year_columns = Vec::new();
        let mut seen = [false; crate::model::YEAR_SPAN];
        for (idx, header) in headers.iter().enumerate() {
            if idx == name_idx || idx == code_idx {
                continue;
            }
            let label = header.trim();
            if label.parse::<i64>().is_err() {
                continue;
            }
            let year = Year::parse_label(label)?;
            if seen[year.index()] {
                return Err(PipelineError::shape(format!(
                    "duplicate year column '{year}'"
                )));
            }
            seen[year.index()] = true;
            year_columns.push((idx, year));
        }
        if year_columns.is_empty() {
            return Err(PipelineError::shape(
                "no year columns found in header row".to_string(),
            ));
        }
        Ok(Self {
            name_idx,
            code_idx,
            year_columns,
        })
    }

    pub fn year_count(&self) -> usize {
        self.year_columns.len()
    }

    /// Builds a typed wide record from one raw row, coercing every year cell.
    pub fn coerce_row(&self, cells: &[String]) -> WideRecord {
        let cell = |idx: usize| cells.get(idx).map(|s| s.trim()).unwrap_or("");
        let mut record = WideRecord::new(cell(self.name_idx), cell(self.code_idx));
        for (idx, year) in &self.year_columns {
            record.set_value(*year, cells.get(*idx).and_then(|s| coerce_cell(s)));
        }
        record
    }
}

fn find_column(headers: &[String], wanted: &str) -> Result<usize, PipelineError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| PipelineError::shape(format!("missing identity column '{wanted}'")))
}
