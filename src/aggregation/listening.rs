use crate::types::{ListeningStreak, ListeningTrendPoint, TrendBucket};
use chrono::{Datelike, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One spoke of the yearly listening chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthHours {
    pub month: &'static str,
    pub year_month: String,
    pub hours: f64,
}

fn split_year_month(key: &str) -> Option<(i32, u32)> {
    let (year, month) = key.split_once('-')?;
    Some((year.trim().parse().ok()?, month.trim().parse().ok()?))
}

/// Year of the earliest month in the map, or `fallback` when there is none.
pub fn reference_year(monthly_hours: &BTreeMap<String, f64>, fallback: i32) -> i32 {
    monthly_hours
        .keys()
        .next()
        .and_then(|key| split_year_month(key))
        .map_or(fallback, |(year, _)| year)
}

/// Twelve months of `year`, zero-filled. Keys from other years or with a bad month are ignored.
pub fn monthly_hours_series(
    monthly_hours: &BTreeMap<String, f64>,
    year: i32,
) -> Vec<MonthHours> {
    let mut series: Vec<MonthHours> = MONTH_LABELS
        .iter()
        .enumerate()
        .map(|(index, month)| MonthHours {
            month: *month,
            year_month: format!("{}-{:02}", year, index + 1),
            hours: 0.0,
        })
        .collect();

    for (key, hours) in monthly_hours {
        if let Some((key_year, month)) = split_year_month(key) {
            if key_year == year && (1..=12).contains(&month) {
                series[month as usize - 1].hours = *hours;
            }
        }
    }
    series
}

impl ListeningStreak {
    pub fn has_monthly_data(&self) -> bool {
        !self.monthly_hours.is_empty()
    }

    /// The yearly series for the streak's own reference year.
    pub fn monthly_series(&self, fallback_year: i32) -> Vec<MonthHours> {
        let year = reference_year(&self.monthly_hours, fallback_year);
        monthly_hours_series(&self.monthly_hours, year)
    }
}

/// Monday buckets only, once there are more than seven points.
pub fn weekly_points(points: Vec<ListeningTrendPoint>) -> Vec<ListeningTrendPoint> {
    if points.len() <= 7 {
        return points;
    }
    points
        .into_iter()
        .filter(|p| p.date.weekday() == Weekday::Mon)
        .collect()
}

/// Points as the trends chart plots them for `bucket`.
pub fn trend_points(
    points: Vec<ListeningTrendPoint>,
    bucket: TrendBucket,
) -> Vec<ListeningTrendPoint> {
    match bucket {
        TrendBucket::Weekly => weekly_points(points),
        TrendBucket::Daily | TrendBucket::Monthly => points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn hours(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn daily(start: NaiveDate, n: i64) -> Vec<ListeningTrendPoint> {
        (0..n)
            .map(|i| ListeningTrendPoint {
                date: start + Duration::days(i),
                track_count: i as u64,
                minutes: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_series_is_zero_filled_for_the_reference_year() {
        let map = hours(&[("2024-02", 12.5), ("2024-11", 3.0), ("2025-01", 40.0)]);
        let year = reference_year(&map, 1999);
        assert_eq!(year, 2024);

        let series = monthly_hours_series(&map, year);
        assert_eq!(series.len(), 12);
        assert_eq!(series[0].hours, 0.0);
        assert_eq!(series[1].hours, 12.5);
        assert_eq!(series[1].month, "Feb");
        assert_eq!(series[10].year_month, "2024-11");
        assert_eq!(series[10].hours, 3.0);
        // 2025 data does not leak into the 2024 chart
        assert_eq!(series.iter().map(|m| m.hours).sum::<f64>(), 15.5);
    }

    #[test]
    fn test_empty_map_uses_fallback_year() {
        let streak = ListeningStreak::default();
        assert!(!streak.has_monthly_data());
        let series = streak.monthly_series(2026);
        assert_eq!(series[0].year_month, "2026-01");
        assert!(series.iter().all(|m| m.hours == 0.0));
    }

    #[test]
    fn test_malformed_keys_are_skipped() {
        let map = hours(&[
            ("2024-13", 9.0),
            ("2024-00", 9.0),
            ("2024-05", 1.0),
            ("garbage", 9.0),
        ]);
        let series = monthly_hours_series(&map, 2024);
        assert_eq!(series.iter().map(|m| m.hours).sum::<f64>(), 1.0);
    }

    #[test]
    fn test_weekly_keeps_mondays_only_past_seven_points() {
        // 2024-05-01 is a Wednesday; Mondays are the 6th, 13th and 20th
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let kept = weekly_points(daily(start, 21));
        let dates: Vec<u32> = kept.iter().map(|p| p.date.day()).collect();
        assert_eq!(dates, vec![6, 13, 20]);

        assert_eq!(weekly_points(daily(start, 7)).len(), 7);
    }

    #[test]
    fn test_only_weekly_bucket_is_thinned() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(trend_points(daily(start, 14), TrendBucket::Daily).len(), 14);
        assert_eq!(trend_points(daily(start, 14), TrendBucket::Monthly).len(), 14);
        assert_eq!(trend_points(daily(start, 14), TrendBucket::Weekly).len(), 2);
    }
}
