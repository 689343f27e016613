//! Pipeline orchestration: validation plus the four stages in fixed order.
//!
//! [`process_usage_table`] is the single entry point for callers holding a
//! typed wide table; [`process_raw_table`] fronts it with header layout
//! resolution and numeric coercion for callers holding raw string rows.

use std::collections::HashSet;

use log::info;

use crate::{
    coerce::WideLayout,
    error::PipelineError,
    growth, impute,
    model::{DataSource, LongRecord, WideRecord},
    reshape,
};

/// Rejects structural problems before any transformation runs: blank
/// identity fields and duplicate country rows (which would yield more than
/// one row per country-year pair downstream).
pub fn validate_wide(records: &[WideRecord]) -> Result<(), PipelineError> {
    let mut seen = HashSet::new();
    for record in records {
        if record.country_name.trim().is_empty() {
            return Err(PipelineError::shape("row with empty country_name"));
        }
        if record.country_code.trim().is_empty() {
            return Err(PipelineError::shape(format!(
                "country '{}' has an empty country_code",
                record.country_name
            )));
        }
        if !seen.insert(record.country_name.as_str()) {
            return Err(PipelineError::shape(format!(
                "duplicate rows for country '{}'",
                record.country_name
            )));
        }
    }
    Ok(())
}

/// Runs the full pipeline over a typed wide table and returns the completed
/// long table sorted by `(country_name, year)`.
pub fn process_usage_table(wide: Vec<WideRecord>) -> Result<Vec<LongRecord>, PipelineError> {
    validate_wide(&wide)?;
    let country_count = wide.len();

    let long = reshape::reshape_to_long(&wide);
    let mut rows = impute::impute_all(long);
    growth::annotate_growth(&mut rows);

    let imputed = rows
        .iter()
        .filter(|r| r.data_source == Some(DataSource::Imputed))
        .count();
    info!(
        "Processed {} country(ies) into {} row(s), {} imputed",
        country_count,
        rows.len(),
        imputed
    );
    Ok(rows)
}

/// Coerces a raw string table (headers plus rows) and runs the pipeline.
pub fn process_raw_table(
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<Vec<LongRecord>, PipelineError> {
    let layout = WideLayout::from_headers(headers)?;
    let wide: Vec<WideRecord> = rows.iter().map(|row| layout.coerce_row(row)).collect();
    process_usage_table(wide)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{YEAR_SPAN, Year};

    #[test]
    fn duplicate_country_rows_are_rejected() {
        let wide = vec![
            WideRecord::new("Freedonia", "FRD"),
            WideRecord::new("Freedonia", "FRD"),
        ];
        let err = process_usage_table(wide).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInputShape(_)));
        assert!(err.to_string().contains("Freedonia"));
    }

    #[test]
    fn blank_identity_fields_are_rejected() {
        assert!(validate_wide(&[WideRecord::new("  ", "FRD")]).is_err());
        assert!(validate_wide(&[WideRecord::new("Freedonia", "")]).is_err());
    }

    #[test]
    fn output_is_complete_and_sorted() {
        let mut wide = WideRecord::new("Borduria", "BOR");
        wide.set_value(Year::new(2010).unwrap(), Some(25.0));
        let rows =
            process_usage_table(vec![wide, WideRecord::new("Aland", "ALA")]).unwrap();

        assert_eq!(rows.len(), 2 * YEAR_SPAN);
        assert_eq!(rows[0].country_name, "Aland");
        for pair in rows.windows(2) {
            let ordering = pair[0]
                .country_name
                .cmp(&pair[1].country_name)
                .then(pair[0].year.cmp(&pair[1].year));
            assert!(ordering.is_lt());
        }
        assert!(rows.iter().all(|r| r.internet_usage.is_some()));
        assert!(rows.iter().all(|r| r.data_source.is_some()));
    }

    #[test]
    fn raw_table_front_door_applies_coercion() {
        let headers: Vec<String> = ["country_name", "country_code", "2000", "2001"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![vec![
            "Freedonia".to_string(),
            "FRD".to_string(),
            "10".to_string(),
            "garbage".to_string(),
        ]];
        let out = process_raw_table(&headers, &rows).unwrap();
        assert_eq!(out.len(), YEAR_SPAN);
        let y2000 = out.iter().find(|r| r.year.get() == 2000).unwrap();
        assert_eq!(y2000.data_source, Some(DataSource::Original));
        let y2001 = out.iter().find(|r| r.year.get() == 2001).unwrap();
        assert_eq!(y2001.data_source, Some(DataSource::Imputed));
    }
}
