use crate::types::PercentileRanking;
use serde::Serialize;
use std::fmt;

/// Display bucket for a listener percentile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum FanTier {
    NewListener,
    CasualListener,
    RegularListener,
    BigFan,
    DedicatedFan,
    SuperFan,
}

// Inclusive lower bounds, highest first. First match wins.
const TIER_LADDER: [(f64, FanTier); 5] = [
    (95.0, FanTier::SuperFan),
    (80.0, FanTier::DedicatedFan),
    (60.0, FanTier::BigFan),
    (40.0, FanTier::RegularListener),
    (20.0, FanTier::CasualListener),
];

impl FanTier {
    pub fn from_percentile(percentile: f64) -> Self {
        let p = clamp_percentile(percentile);
        TIER_LADDER
            .iter()
            .find(|(floor, _)| p >= *floor)
            .map(|(_, tier)| *tier)
            .unwrap_or(FanTier::NewListener)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FanTier::SuperFan => "Super Fan",
            FanTier::DedicatedFan => "Dedicated Fan",
            FanTier::BigFan => "Big Fan",
            FanTier::RegularListener => "Regular Listener",
            FanTier::CasualListener => "Casual Listener",
            FanTier::NewListener => "New Listener",
        }
    }
}

impl fmt::Display for FanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// NaN reads as 0.
fn clamp_percentile(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 100.0)
    }
}

/// What the gauge needs from a percentile ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanStanding {
    pub percentile: f64,
    pub tier: FanTier,
    /// Needle position, 0..=1.
    pub gauge_fraction: f64,
    pub display_percent: u32,
    pub favorite_artist: Option<String>,
}

impl From<&PercentileRanking> for FanStanding {
    fn from(ranking: &PercentileRanking) -> Self {
        let percentile = clamp_percentile(ranking.percentile_ranking);
        Self {
            percentile,
            tier: FanTier::from_percentile(percentile),
            gauge_fraction: percentile / 100.0,
            display_percent: percentile.round() as u32,
            favorite_artist: ranking.favorite_artist.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        assert_eq!(FanTier::from_percentile(95.0), FanTier::SuperFan);
        assert_eq!(FanTier::from_percentile(94.999), FanTier::DedicatedFan);
        assert_eq!(FanTier::from_percentile(80.0), FanTier::DedicatedFan);
        assert_eq!(FanTier::from_percentile(60.0), FanTier::BigFan);
        assert_eq!(FanTier::from_percentile(40.0), FanTier::RegularListener);
        assert_eq!(FanTier::from_percentile(20.0), FanTier::CasualListener);
        assert_eq!(FanTier::from_percentile(19.99), FanTier::NewListener);
        assert_eq!(FanTier::from_percentile(0.0), FanTier::NewListener);
        assert_eq!(FanTier::from_percentile(100.0), FanTier::SuperFan);
    }

    #[test]
    fn test_tiers_are_monotonic() {
        let mut previous = FanTier::NewListener;
        for step in 0..=10_000 {
            let tier = FanTier::from_percentile(step as f64 / 100.0);
            assert!(tier >= previous, "tier dropped at {}", step);
            previous = tier;
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(FanTier::from_percentile(140.0), FanTier::SuperFan);
        assert_eq!(FanTier::from_percentile(-3.0), FanTier::NewListener);
        assert_eq!(FanTier::from_percentile(f64::NAN), FanTier::NewListener);
    }

    #[test]
    fn test_standing_from_ranking() {
        let standing = FanStanding::from(&PercentileRanking {
            percentile_ranking: 87.4,
            favorite_artist: Some("Big Thief".into()),
        });
        assert_eq!(standing.tier.label(), "Dedicated Fan");
        assert_eq!(standing.display_percent, 87);
        assert!((standing.gauge_fraction - 0.874).abs() < 1e-9);
        assert_eq!(standing.favorite_artist.as_deref(), Some("Big Thief"));
    }
}
