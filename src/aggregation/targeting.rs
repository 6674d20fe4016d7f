//! How well each promoter targeting parameter performs.
//!
//! Countries group on the literal value. Genre and artist targets are comma-separated;
//! an event counts in full toward every tag it lists, so per-tag sums can exceed totals.

use crate::types::{save_rate, EventAnalyticsRecord};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TargetGroup {
    pub events: u64,
    pub views: u64,
    pub saves: u64,
    pub engagement_total: f64,
}

impl TargetGroup {
    fn add(&mut self, record: &EventAnalyticsRecord) {
        self.events += 1;
        self.views += record.views;
        self.saves += record.saves;
        self.engagement_total += record.engagement;
    }

    pub fn avg_engagement(&self) -> f64 {
        if self.events == 0 {
            0.0
        } else {
            self.engagement_total / self.events as f64
        }
    }

    pub fn save_rate(&self) -> f64 {
        save_rate(self.views, self.saves)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TargetingEffectiveness {
    pub countries: BTreeMap<String, TargetGroup>,
    pub genres: BTreeMap<String, TargetGroup>,
    pub artists: BTreeMap<String, TargetGroup>,
}

impl TargetingEffectiveness {
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() && self.genres.is_empty() && self.artists.is_empty()
    }
}

/// Split a comma-separated target field into trimmed, non-empty tags.
pub fn split_targets(field: Option<&str>) -> Vec<&str> {
    field
        .map(|f| f.split(',').map(str::trim).filter(|t| !t.is_empty()).collect())
        .unwrap_or_default()
}

pub fn targeting_effectiveness(records: &[EventAnalyticsRecord]) -> TargetingEffectiveness {
    let mut out = TargetingEffectiveness::default();

    for record in records {
        if let Some(country) = record.target_country.as_deref().filter(|c| !c.is_empty()) {
            out.countries.entry(country.to_string()).or_default().add(record);
        }
        for genre in split_targets(record.target_genre_interest.as_deref()) {
            out.genres.entry(genre.to_string()).or_default().add(record);
        }
        for artist in split_targets(record.target_artist_interest.as_deref()) {
            out.artists.entry(artist.to_string()).or_default().add(record);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_genre_event_counts_fully_in_each_genre() {
        let records = vec![
            EventAnalyticsRecord::new(1, "Double Bill", 100, 20)
                .with_targets(None, Some("rock, pop"), None),
            EventAnalyticsRecord::new(2, "Pop Night", 50, 5).with_targets(None, Some("pop"), None),
        ];
        let eff = targeting_effectiveness(&records);

        let rock = &eff.genres["rock"];
        assert_eq!((rock.events, rock.views, rock.saves), (1, 100, 20));
        let pop = &eff.genres["pop"];
        assert_eq!((pop.events, pop.views, pop.saves), (2, 150, 25));

        let per_genre_views: u64 = eff.genres.values().map(|g| g.views).sum();
        let total_views: u64 = records.iter().map(|r| r.views).sum();
        assert!(per_genre_views > total_views);
    }

    #[test]
    fn test_group_averages() {
        let records = vec![
            EventAnalyticsRecord::new(1, "A", 200, 50)
                .with_engagement(300.0)
                .with_targets(Some("NL"), None, Some("Boygenius")),
            EventAnalyticsRecord::new(2, "B", 100, 0)
                .with_engagement(100.0)
                .with_targets(Some("NL"), None, None),
        ];
        let eff = targeting_effectiveness(&records);
        let nl = &eff.countries["NL"];
        assert_eq!(nl.events, 2);
        assert_eq!(nl.avg_engagement(), 200.0);
        assert!((nl.save_rate() - 50.0 / 300.0 * 100.0).abs() < 1e-9);
        assert_eq!(eff.artists["Boygenius"].save_rate(), 25.0);
    }

    #[test]
    fn test_zero_view_group_has_zero_save_rate() {
        let records =
            vec![EventAnalyticsRecord::new(1, "Quiet", 0, 0).with_targets(Some("US"), None, None)];
        let eff = targeting_effectiveness(&records);
        assert_eq!(eff.countries["US"].save_rate(), 0.0);
    }

    #[test]
    fn test_blank_tags_and_missing_fields_are_ignored() {
        let records = vec![
            EventAnalyticsRecord::new(1, "Sparse", 10, 1).with_targets(
                Some(""),
                Some(" , jazz ,,"),
                Some(""),
            ),
            EventAnalyticsRecord::new(2, "Nothing", 10, 1),
        ];
        let eff = targeting_effectiveness(&records);
        assert!(eff.countries.is_empty());
        assert!(eff.artists.is_empty());
        assert_eq!(eff.genres.keys().collect::<Vec<_>>(), vec!["jazz"]);
    }

    #[test]
    fn test_no_events_is_empty() {
        assert!(targeting_effectiveness(&[]).is_empty());
    }
}
