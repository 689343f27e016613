//! Per-country gap filling over the 2000-2023 range.
//!
//! Each country is imputed independently by [`impute_country`], a pure
//! function over that country's series, and results are merged afterward.
//! The fallback chain never fails regardless of sparsity:
//!
//! 1. two or more observations: ordinary least-squares trend, predictions
//!    clipped to `[0, 100]`;
//! 2. exactly one observation: flat fill with that value;
//! 3. no observations: the dataset-wide mean of all pre-imputation values;
//! 4. empty dataset: a fixed default of 50.
//!
//! The global mean is computed once, up front, from the unimputed table, so
//! no country's synthesized values can bias another's fallback.

use itertools::Itertools;
use log::debug;

use crate::model::{DEFAULT_USAGE, DataSource, LongRecord, Year};

/// Mean of all observed usage values across the whole long table, or `None`
/// when the table holds no observations at all.
pub fn global_mean(rows: &[LongRecord]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for row in rows {
        if let Some(value) = row.internet_usage {
            sum += value;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f64)
}

/// Imputes every country in the long table and returns the completed rows
/// sorted by `(country_name, year)`.
pub fn impute_all(rows: Vec<LongRecord>) -> Vec<LongRecord> {
    let fallback = global_mean(&rows).unwrap_or(DEFAULT_USAGE);
    let mut out = Vec::with_capacity(rows.len());
    for (country, group) in &rows
        .into_iter()
        .chunk_by(|row| row.country_name.clone())
    {
        let series: Vec<LongRecord> = group.collect();
        debug!(
            "Imputing '{}' from {} observed value(s)",
            country,
            series
                .iter()
                .filter(|r| r.internet_usage.is_some())
                .count()
        );
        out.extend(impute_country(&series, fallback));
    }
    out.sort_by(|a, b| {
        a.country_name
            .cmp(&b.country_name)
            .then(a.year.cmp(&b.year))
    });
    out
}

/// Produces the complete 24-year series for one country.
///
/// `series` holds that country's reshaped rows (any subset of the 24 years,
/// one row per year at most); `fallback` is the precomputed dataset-wide
/// mean used when the country has no observations.
pub fn impute_country(series: &[LongRecord], fallback: f64) -> Vec<LongRecord> {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    let country_name = first.country_name.clone();
    let country_code = first.country_code.clone();

    // 24-year skeleton, left-joined against whatever rows exist.
    let mut slots: [Option<f64>; crate::model::YEAR_SPAN] = [None; crate::model::YEAR_SPAN];
    for row in series {
        if let Some(value) = row.internet_usage {
            slots[row.year.index()] = Some(value);
        }
    }

    let observed: Vec<(f64, f64)> = slots
        .iter()
        .enumerate()
        .filter_map(|(idx, value)| {
            value.map(|v| ((crate::model::YEAR_MIN as usize + idx) as f64, v))
        })
        .collect();

    let trend = (observed.len() >= 2).then(|| fit_line(&observed));
    let fill = |year: Year, slot: Option<f64>| -> (f64, DataSource) {
        match slot {
            Some(value) => (value, DataSource::Original),
            None => match (&trend, observed.as_slice()) {
                (Some((slope, intercept)), _) => {
                    let predicted = slope * year.get() as f64 + intercept;
                    (predicted.clamp(0.0, 100.0), DataSource::Imputed)
                }
                (None, [(_, only)]) => (*only, DataSource::Imputed),
                (None, _) => (fallback, DataSource::Imputed),
            },
        }
    };

    Year::all()
        .map(|year| {
            let (value, source) = fill(year, slots[year.index()]);
            LongRecord {
                country_name: country_name.clone(),
                country_code: country_code.clone(),
                year,
                internet_usage: Some(value),
                data_source: Some(source),
                yoy_growth: None,
                growth_category: None,
                cagr_3yr: None,
            }
        })
        .collect()
}

/// Ordinary least squares over `(x, y)` points, returning `(slope, intercept)`.
fn fit_line(points: &[(f64, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in points {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }
    // Degenerate only when all x coincide; distinct years make sxx positive.
    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    (slope, mean_y - slope * mean_x)
}
