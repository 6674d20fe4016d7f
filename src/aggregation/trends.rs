use crate::constants::TREND_THRESHOLD;
use crate::types::EventAnalyticsRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendClassification {
    Improving,
    Declining,
    Neutral,
}

/// A dated record together with its engagement rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedEvent {
    pub record: EventAnalyticsRecord,
    pub engagement_rate: f64,
    pub classification: TrendClassification,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trends {
    pub improving: Vec<RatedEvent>,
    pub declining: Vec<RatedEvent>,
}

impl Trends {
    pub fn is_empty(&self) -> bool {
        self.improving.is_empty() && self.declining.is_empty()
    }
}

/// Classify every dated record in date order.
///
/// Each record from the second on is compared to the mean engagement rate of all
/// earlier records: more than 10% above is improving, more than 10% below is declining.
/// Undated records are left out entirely. The first record is always neutral.
pub fn classify_events(records: &[EventAnalyticsRecord]) -> Vec<RatedEvent> {
    let mut dated: Vec<&EventAnalyticsRecord> =
        records.iter().filter(|r| r.event_date.is_some()).collect();
    // stable, so same-day events keep their input order
    dated.sort_by_key(|r| r.event_date);

    let mut rated = Vec::with_capacity(dated.len());
    let mut prefix_sum = 0.0;

    for (i, record) in dated.into_iter().enumerate() {
        let rate = record.engagement_rate();
        let classification = if i == 0 {
            TrendClassification::Neutral
        } else {
            let avg_prev = prefix_sum / i as f64;
            if rate > avg_prev * (1.0 + TREND_THRESHOLD) {
                TrendClassification::Improving
            } else if rate < avg_prev * (1.0 - TREND_THRESHOLD) {
                TrendClassification::Declining
            } else {
                TrendClassification::Neutral
            }
        };
        prefix_sum += rate;
        rated.push(RatedEvent {
            record: record.clone(),
            engagement_rate: rate,
            classification,
        });
    }
    rated
}

pub fn detect_trends(records: &[EventAnalyticsRecord]) -> Trends {
    let mut trends = Trends::default();
    let rated = classify_events(records);
    if rated.len() < 2 {
        return trends;
    }
    for event in rated {
        match event.classification {
            TrendClassification::Improving => trends.improving.push(event),
            TrendClassification::Declining => trends.declining.push(event),
            TrendClassification::Neutral => {}
        }
    }
    trends
}

/// Percent change shown next to a metric. `None` when there is nothing to compare to.
pub fn percent_change(value: f64, previous: Option<f64>) -> Option<f64> {
    let previous = previous?;
    Some(if previous != 0.0 {
        (value - previous) / previous.abs() * 100.0
    } else if value > 0.0 {
        100.0
    } else {
        0.0
    })
}
