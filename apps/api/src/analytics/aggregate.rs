//! Aggregation — frequency counts, time bucketing, and the closed-form
//! trend fit behind the response-trend report.
//!
//! Everything here is stateless and operates on flattened rows; the only
//! fatal condition (an unreachable store) is handled by the caller before
//! rows reach this module.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::analytics::flatten::FlatResponse;

/// Counts atomic values across a field. Each value is split on the list
/// separator and trimmed first, so a row holding "R, I, A" contributes one
/// count each to R, I, and A. Empty atoms are dropped.
pub fn count_field_values<'a, I>(values: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for value in values {
        for atom in value.split(',') {
            let atom = atom.trim();
            if atom.is_empty() {
                continue;
            }
            *counts.entry(atom.to_string()).or_insert(0usize) += 1;
        }
    }
    counts
}

/// Groups rows by the UTC calendar date of their timestamp.
pub fn count_by_day(rows: &[FlatResponse]) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.timestamp.date_naive()).or_insert(0usize) += 1;
    }
    counts
}

/// Groups rows by UTC calendar month, keyed "YYYY-MM".
pub fn count_by_month(rows: &[FlatResponse]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        let date = row.timestamp.date_naive();
        let key = format!("{:04}-{:02}", date.year(), date.month());
        *counts.entry(key).or_insert(0usize) += 1;
    }
    counts
}

/// Least-squares line fitted over a daily series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

/// Closed-form linear fit over (day index, count). Returns `None` when the
/// series is too short to define a line.
pub fn linear_trend(series: &BTreeMap<NaiveDate, usize>) -> Option<TrendLine> {
    if series.len() < 2 {
        return None;
    }

    let n = series.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (i, &count) in series.values().enumerate() {
        let x = i as f64;
        let y = count as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(TrendLine { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::flatten::flatten;
    use crate::models::survey::SurveyResponseRow;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn make_flat(day: u32, holland: &str) -> FlatResponse {
        flatten(&SurveyResponseRow {
            id: Uuid::new_v4(),
            data: json!({ "personalityProfile": { "hollandCode": holland } }),
            created_at: Utc.with_ymd_and_hms(2026, 8, day, 9, 30, 0).unwrap(),
        })
    }

    #[test]
    fn test_multi_value_field_counts_each_atom() {
        let rows = vec![make_flat(1, "R,I,A"), make_flat(1, "R")];
        let counts = count_field_values(rows.iter().map(|r| r.holland_code.as_str()));

        assert_eq!(counts.get("R"), Some(&2));
        assert_eq!(counts.get("I"), Some(&1));
        assert_eq!(counts.get("A"), Some(&1));
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn test_atoms_are_trimmed_before_counting() {
        let counts = count_field_values(["R, I", "R ,I"]);
        assert_eq!(counts.get("R"), Some(&2));
        assert_eq!(counts.get("I"), Some(&2));
    }

    #[test]
    fn test_empty_values_contribute_nothing() {
        let counts = count_field_values(["", " , ", "R"]);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("R"), Some(&1));
    }

    #[test]
    fn test_rows_group_by_utc_day() {
        let rows = vec![make_flat(1, "R"), make_flat(1, "I"), make_flat(3, "A")];
        let by_day = count_by_day(&rows);

        assert_eq!(by_day.len(), 2);
        let first = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let third = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        assert_eq!(by_day.get(&first), Some(&2));
        assert_eq!(by_day.get(&third), Some(&1));
    }

    #[test]
    fn test_month_buckets_use_year_month_keys() {
        let rows = vec![make_flat(1, "R"), make_flat(28, "I")];
        let by_month = count_by_month(&rows);
        assert_eq!(by_month.get("2026-08"), Some(&2));
    }

    #[test]
    fn test_trend_recovers_an_exact_line() {
        let mut series = BTreeMap::new();
        for (day, count) in [(1, 1usize), (2, 2), (3, 3), (4, 4)] {
            series.insert(NaiveDate::from_ymd_opt(2026, 8, day).unwrap(), count);
        }

        let trend = linear_trend(&series).unwrap();
        assert!((trend.slope - 1.0).abs() < 1e-9);
        assert!((trend.intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_series_has_zero_slope() {
        let mut series = BTreeMap::new();
        for day in 1..=5 {
            series.insert(NaiveDate::from_ymd_opt(2026, 8, day).unwrap(), 7usize);
        }

        let trend = linear_trend(&series).unwrap();
        assert!(trend.slope.abs() < 1e-9);
        assert!((trend.intercept - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_series_yields_no_trend() {
        let mut series = BTreeMap::new();
        assert!(linear_trend(&series).is_none());

        series.insert(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(), 3usize);
        assert!(linear_trend(&series).is_none());
    }
}
