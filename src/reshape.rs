//! Wide-to-long reshaping.
//!
//! Every year slot of every country becomes one long row; missing slots
//! produce rows with a missing `internet_usage` for the imputer to fill.
//! Row order is not significant here, downstream stages re-sort as needed.

use crate::model::{LongRecord, WideRecord, Year};

pub fn reshape_to_long(records: &[WideRecord]) -> Vec<LongRecord> {
    let mut rows = Vec::with_capacity(records.len() * crate::model::YEAR_SPAN);
    for record in records {
        for year in Year::all() {
            rows.push(LongRecord::new(
                record.country_name.clone(),
                record.country_code.clone(),
                year,
                record.value(year),
            ));
        }
    }
    rows
}
