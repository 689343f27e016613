//! Growth metrics over each country's chronologically sorted series.
//!
//! Year-over-year growth follows the ITU-style conventions of the source
//! methodology: non-finite ratios are nulled, growth is capped to a wider
//! band for low-penetration baselines (prior usage below 10), a zero
//! baseline followed by positive usage reports exactly 100, and the first
//! year of every country stays null. Categories come from a fixed ordered
//! threshold table, and a 3-year CAGR is added where a value exists three
//! years back.

use crate::model::{GrowthCategory, LongRecord};

/// Upper bound of the low-penetration band. Prior-year usage below this
/// widens the YoY cap from [-100, 100] to [-100, 200].
const LOW_PENETRATION: f64 = 10.0;

/// Ordered `(upper bound, category)` thresholds, evaluated top-down; growth
/// above the last bound is [`GrowthCategory::HighGrowth`]. Each bucket is
/// closed on its upper edge.
const GROWTH_BUCKETS: [(f64, GrowthCategory); 4] = [
    (-20.0, GrowthCategory::SignificantDecline),
    (-5.0, GrowthCategory::ModerateDecline),
    (5.0, GrowthCategory::Stable),
    (20.0, GrowthCategory::ModerateGrowth),
];

pub fn categorize(yoy_growth: f64) -> GrowthCategory {
    for (upper, category) in GROWTH_BUCKETS {
        if yoy_growth <= upper {
            return category;
        }
    }
    GrowthCategory::HighGrowth
}

/// Annotates `rows` in place with `yoy_growth`, `growth_category`, and
/// `cagr_3yr`. Rows are re-sorted by `(country_name, year)` first; all
/// metrics stay strictly within one country's run of rows.
pub fn annotate_growth(rows: &mut [LongRecord]) {
    rows.sort_by(|a, b| {
        a.country_name
            .cmp(&b.country_name)
            .then(a.year.cmp(&b.year))
    });

    let mut start = 0;
    while start < rows.len() {
        let mut end = start + 1;
        while end < rows.len() && rows[end].country_name == rows[start].country_name {
            end += 1;
        }
        annotate_country(&mut rows[start..end]);
        start = end;
    }
}

fn annotate_country(series: &mut [LongRecord]) {
    let usage: Vec<Option<f64>> = series.iter().map(|row| row.internet_usage).collect();
    for (idx, row) in series.iter_mut().enumerate() {
        let current = usage[idx];
        let prior = if idx > 0 { usage[idx - 1] } else { None };

        row.yoy_growth = match (prior, current) {
            (Some(prev), Some(curr)) => yoy_growth(prev, curr),
            _ => None,
        };
        row.growth_category = row.yoy_growth.map(categorize);

        row.cagr_3yr = if idx >= 3 {
            match (usage[idx - 3], current) {
                (Some(base), Some(curr)) => cagr_3yr(base, curr),
                _ => None,
            }
        } else {
            None
        };
    }
}

fn yoy_growth(prev: f64, curr: f64) -> Option<f64> {
    // Zero baseline with positive usage reports exactly 100, sidestepping
    // the infinite ratio.
    if prev == 0.0 && curr > 0.0 {
        return Some(100.0);
    }
    let raw = (curr - prev) / prev * 100.0;
    if !raw.is_finite() {
        return None;
    }
    let capped = if prev < LOW_PENETRATION {
        raw.clamp(-100.0, 200.0)
    } else {
        raw.clamp(-100.0, 100.0)
    };
    Some(capped)
}

fn cagr_3yr(base: f64, curr: f64) -> Option<f64> {
    if base <= 0.0 {
        return None;
    }
    let rate = ((curr / base).powf(1.0 / 3.0) - 1.0) * 100.0;
    rate.is_finite().then(|| rate.clamp(-50.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LongRecord, Year};

    fn series(country: &str, values: &[(u16, f64)]) -> Vec<LongRecord> {
        values
            .iter()
            .map(|(year, value)| {
                LongRecord::new(country, "XXX", Year::new(*year).unwrap(), Some(*value))
            })
            .collect()
    }

    fn growth_at(rows: &[LongRecord], year: u16) -> Option<f64> {
        rows.iter()
            .find(|r| r.year.get() == year)
            .unwrap()
            .yoy_growth
    }

    #[test]
    fn first_year_has_no_growth() {
        let mut rows = series("A", &[(2000, 10.0), (2001, 11.0)]);
        annotate_growth(&mut rows);
        assert_eq!(growth_at(&rows, 2000), None);
        assert!(rows[0].growth_category.is_none());
        assert!((growth_at(&rows, 2001).unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn growth_never_crosses_country_boundaries() {
        let mut rows = series("A", &[(2000, 10.0), (2001, 20.0)]);
        rows.extend(series("B", &[(2000, 50.0), (2001, 55.0)]));
        annotate_growth(&mut rows);
        // B's 2000 row is B's first, not a continuation of A.
        let b_first = rows
            .iter()
            .find(|r| r.country_name == "B" && r.year.get() == 2000)
            .unwrap();
        assert_eq!(b_first.yoy_growth, None);
    }

    #[test]
    fn high_base_growth_caps_at_100() {
        let mut rows = series("A", &[(2000, 20.0), (2001, 90.0)]);
        annotate_growth(&mut rows);
        // Raw growth is 350 but the prior year sits above the low-penetration band.
        assert_eq!(growth_at(&rows, 2001), Some(100.0));
    }

    #[test]
    fn low_base_growth_caps_at_200() {
        let mut rows = series("A", &[(2000, 2.0), (2001, 20.0)]);
        annotate_growth(&mut rows);
        // Raw growth is 900; the low-penetration band allows up to 200.
        assert_eq!(growth_at(&rows, 2001), Some(200.0));
    }

    #[test]
    fn zero_base_rule_forces_exactly_100() {
        let mut rows = series("A", &[(2000, 0.0), (2001, 4.0)]);
        annotate_growth(&mut rows);
        assert_eq!(growth_at(&rows, 2001), Some(100.0));
    }

    #[test]
    fn zero_to_zero_stays_null() {
        let mut rows = series("A", &[(2000, 0.0), (2001, 0.0)]);
        annotate_growth(&mut rows);
        assert_eq!(growth_at(&rows, 2001), None);
        assert!(rows[1].growth_category.is_none());
    }

    #[test]
    fn categorize_respects_closed_upper_bounds() {
        assert_eq!(categorize(-25.0), GrowthCategory::SignificantDecline);
        assert_eq!(categorize(-20.0), GrowthCategory::SignificantDecline);
        assert_eq!(categorize(-19.9), GrowthCategory::ModerateDecline);
        assert_eq!(categorize(-5.0), GrowthCategory::ModerateDecline);
        assert_eq!(categorize(0.0), GrowthCategory::Stable);
        assert_eq!(categorize(5.0), GrowthCategory::Stable);
        assert_eq!(categorize(5.1), GrowthCategory::ModerateGrowth);
        assert_eq!(categorize(20.0), GrowthCategory::ModerateGrowth);
        assert_eq!(categorize(20.1), GrowthCategory::HighGrowth);
    }

    #[test]
    fn cagr_needs_three_prior_years() {
        let mut rows = series(
            "A",
            &[(2000, 10.0), (2001, 12.0), (2002, 14.0), (2003, 20.0)],
        );
        annotate_growth(&mut rows);
        assert!(rows[0].cagr_3yr.is_none());
        assert!(rows[1].cagr_3yr.is_none());
        assert!(rows[2].cagr_3yr.is_none());
        let expected = ((20.0f64 / 10.0).powf(1.0 / 3.0) - 1.0) * 100.0;
        assert!((rows[3].cagr_3yr.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn cagr_is_null_on_zero_base_and_clipped_on_collapse() {
        let mut rows = series(
            "A",
            &[(2000, 0.0), (2001, 10.0), (2002, 10.0), (2003, 10.0), (2004, 0.1)],
        );
        annotate_growth(&mut rows);
        // Base year 2000 usage is zero, so 2003 has no defined CAGR.
        assert!(rows[3].cagr_3yr.is_none());
        // 2004 against 2001 collapses by 99%, clipped to the -50 floor.
        assert_eq!(rows[4].cagr_3yr, Some(-50.0));
    }

    #[test]
    fn rows_with_missing_usage_produce_null_metrics() {
        let mut rows = series("A", &[(2000, 10.0)]);
        rows.push(LongRecord::new("A", "XXX", Year::new(2001).unwrap(), None));
        rows.push(LongRecord::new(
            "A",
            "XXX",
            Year::new(2002).unwrap(),
            Some(20.0),
        ));
        annotate_growth(&mut rows);
        assert_eq!(growth_at(&rows, 2001), None);
        assert_eq!(growth_at(&rows, 2002), None);
    }
}
