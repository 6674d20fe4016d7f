use crate::constants::WEEKLY_TREND_THRESHOLD_PCT;
use crate::types::TimeSeriesPoint;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyTrend {
    pub direction: TrendDirection,
    /// Absolute change, rounded to a whole percent.
    pub percentage: u32,
}

impl WeeklyTrend {
    const NEUTRAL: WeeklyTrend = WeeklyTrend {
        direction: TrendDirection::Neutral,
        percentage: 0,
    };
}

const WEEK: usize = 7;

/// Compare views in the last seven daily points to the seven before them.
pub fn weekly_trend(daily: &[TimeSeriesPoint]) -> WeeklyTrend {
    if daily.len() < 3 {
        return WeeklyTrend::NEUTRAL;
    }

    let split = daily.len().saturating_sub(WEEK);
    let recent: u64 = daily[split..].iter().map(|p| p.views).sum();
    let previous: u64 = daily[split.saturating_sub(WEEK)..split].iter().map(|p| p.views).sum();

    if previous == 0 {
        return WeeklyTrend {
            direction: TrendDirection::Up,
            percentage: 100,
        };
    }

    let change = (recent as f64 - previous as f64) / previous as f64 * 100.0;
    let direction = if change > WEEKLY_TREND_THRESHOLD_PCT {
        TrendDirection::Up
    } else if change < -WEEKLY_TREND_THRESHOLD_PCT {
        TrendDirection::Down
    } else {
        TrendDirection::Neutral
    };
    WeeklyTrend {
        direction,
        percentage: change.abs().round() as u32,
    }
}

/// The `n` busiest days by views. Ties keep chronological order.
pub fn peak_days(daily: &[TimeSeriesPoint], n: usize) -> Vec<TimeSeriesPoint> {
    let mut sorted = daily.to_vec();
    sorted.sort_by(|a, b| b.views.cmp(&a.views));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PEAK_DAY_COUNT;

    fn series(views: &[u64]) -> Vec<TimeSeriesPoint> {
        views
            .iter()
            .enumerate()
            .map(|(i, v)| TimeSeriesPoint {
                date: format!("2024-06-{:02}", i + 1),
                views: *v,
                saves: 0,
            })
            .collect()
    }

    #[test]
    fn test_short_series_is_neutral() {
        assert_eq!(weekly_trend(&series(&[10, 50])), WeeklyTrend::NEUTRAL);
    }

    #[test]
    fn test_week_over_week_up_and_down() {
        let mut views = vec![10; 7];
        views.extend(vec![12; 7]);
        let up = weekly_trend(&series(&views));
        assert_eq!(up.direction, TrendDirection::Up);
        assert_eq!(up.percentage, 20);

        let mut views = vec![10; 7];
        views.extend(vec![8; 7]);
        let down = weekly_trend(&series(&views));
        assert_eq!(down.direction, TrendDirection::Down);
        assert_eq!(down.percentage, 20);
    }

    #[test]
    fn test_small_change_is_neutral() {
        let mut views = vec![100; 7];
        views.extend(vec![104; 7]);
        let trend = weekly_trend(&series(&views));
        assert_eq!(trend.direction, TrendDirection::Neutral);
        assert_eq!(trend.percentage, 4);
    }

    #[test]
    fn test_no_previous_week_counts_as_full_growth() {
        // five points: all of them land in the recent window
        let trend = weekly_trend(&series(&[1, 2, 3, 4, 5]));
        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.percentage, 100);
    }

    #[test]
    fn test_peak_days() {
        let peaks = peak_days(&series(&[5, 40, 12, 40, 3, 20]), PEAK_DAY_COUNT);
        let dates: Vec<&str> = peaks.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-06-02", "2024-06-04", "2024-06-06"]);
    }
}
