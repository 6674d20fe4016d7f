use crate::types::{HeatmapGrid, ListeningRecord};
use chrono::{DateTime, Datelike, Duration, Timelike, Utc};

impl HeatmapGrid {
    /// Bin plays from the last `days` days by weekday (Monday = 0) and UTC hour.
    pub fn from_records(records: &[ListeningRecord], now: DateTime<Utc>, days: u32) -> Self {
        let since = now - Duration::days(i64::from(days));
        let mut grid = HeatmapGrid::default();
        for record in records
            .iter()
            .filter(|r| r.played_at >= since && r.played_at <= now)
        {
            let day = record.played_at.weekday().num_days_from_monday() as usize;
            let hour = record.played_at.hour() as usize;
            grid.data[day][hour] += 1;
        }
        grid.recompute_max();
        grid
    }
}
