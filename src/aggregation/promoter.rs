use crate::constants::MIN_VIEWS_FOR_SAVE_RATE;
use crate::types::{DateRange, EventAnalyticsRecord};
use std::cmp::Ordering;

/// Keep records whose date falls in `range` (inclusive). Undated records always pass.
pub fn filter_by_date_range(
    records: &[EventAnalyticsRecord],
    range: &DateRange,
) -> Vec<EventAnalyticsRecord> {
    if range.is_unbounded() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.event_date.map_or(true, |d| range.contains(d.date())))
        .cloned()
        .collect()
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Highest engagement first.
pub fn top_events(records: &[EventAnalyticsRecord], limit: usize) -> Vec<EventAnalyticsRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| desc(a.engagement, b.engagement));
    sorted.truncate(limit);
    sorted
}

/// Highest save rate first, ignoring events with too few views to be meaningful.
pub fn best_save_rate(records: &[EventAnalyticsRecord], limit: usize) -> Vec<EventAnalyticsRecord> {
    let mut eligible: Vec<EventAnalyticsRecord> = records
        .iter()
        .filter(|r| r.views > MIN_VIEWS_FOR_SAVE_RATE)
        .cloned()
        .collect();
    eligible.sort_by(|a, b| desc(a.save_rate, b.save_rate));
    eligible.truncate(limit);
    eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_TOP_EVENTS;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_date_filter_is_inclusive_and_keeps_undated() {
        let records = vec![
            EventAnalyticsRecord::new(1, "Early", 10, 1).with_date(day(1)),
            EventAnalyticsRecord::new(2, "Start", 10, 1).with_date(day(5)),
            EventAnalyticsRecord::new(3, "End", 10, 1).with_date(day(10)),
            EventAnalyticsRecord::new(4, "Late", 10, 1).with_date(day(20)),
            EventAnalyticsRecord::new(5, "TBA", 10, 1),
        ];
        let kept = filter_by_date_range(&records, &DateRange::new(Some(day(5)), Some(day(10))));
        let ids: Vec<i64> = kept.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 5]);

        let open_end = filter_by_date_range(&records, &DateRange::new(Some(day(10)), None));
        assert_eq!(open_end.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 4, 5]);

        assert_eq!(filter_by_date_range(&records, &DateRange::default()).len(), 5);
    }

    #[test]
    fn test_top_events_by_engagement() {
        let records: Vec<EventAnalyticsRecord> = (1..=7)
            .map(|i| EventAnalyticsRecord::new(i, format!("E{}", i), (i as u64) * 10, 0))
            .collect();
        let top = top_events(&records, DEFAULT_TOP_EVENTS);
        assert_eq!(top.iter().map(|r| r.id).collect::<Vec<_>>(), vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_best_save_rate_requires_more_than_ten_views() {
        let records = vec![
            EventAnalyticsRecord::new(1, "Tiny", 10, 10),
            EventAnalyticsRecord::new(2, "Solid", 100, 30),
            EventAnalyticsRecord::new(3, "Okay", 11, 2),
        ];
        let best = best_save_rate(&records, 5);
        assert_eq!(best.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
    }
}
