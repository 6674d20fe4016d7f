use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Spotify's fixed listening-history windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFrame {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeFrame {
    pub const ALL: [TimeFrame; 3] = [
        TimeFrame::ShortTerm,
        TimeFrame::MediumTerm,
        TimeFrame::LongTerm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::ShortTerm => "short_term",
            TimeFrame::MediumTerm => "medium_term",
            TimeFrame::LongTerm => "long_term",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeFrame::ShortTerm => "Last 4 Weeks",
            TimeFrame::MediumTerm => "Last 6 Months",
            TimeFrame::LongTerm => "All Time",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "short_term" => Some(TimeFrame::ShortTerm),
            "medium_term" => Some(TimeFrame::MediumTerm),
            "long_term" => Some(TimeFrame::LongTerm),
            _ => None,
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter value owned by a chart: either a Spotify window or a trailing day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFrameSelection {
    Frame(TimeFrame),
    Days(u32),
}

impl Default for TimeFrameSelection {
    fn default() -> Self {
        TimeFrameSelection::Frame(TimeFrame::MediumTerm)
    }
}

impl TimeFrameSelection {
    pub fn frame(&self) -> Option<TimeFrame> {
        match self {
            TimeFrameSelection::Frame(frame) => Some(*frame),
            TimeFrameSelection::Days(_) => None,
        }
    }

    pub fn day_window(&self) -> Option<u32> {
        match self {
            TimeFrameSelection::Days(days) => Some(*days),
            TimeFrameSelection::Frame(_) => None,
        }
    }
}

/// A single play event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListeningRecord {
    #[serde(alias = "trackName")]
    pub track_name: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(alias = "playedAt")]
    pub played_at: DateTime<Utc>,
    #[serde(default, alias = "artworkUrl")]
    pub artwork_url: Option<String>,
}

/// Bucket size the listening-trends endpoint groups plays by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrendBucket {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl TrendBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendBucket::Daily => "daily",
            TrendBucket::Weekly => "weekly",
            TrendBucket::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for TrendBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(TrendBucket::Daily),
            "weekly" => Ok(TrendBucket::Weekly),
            "monthly" => Ok(TrendBucket::Monthly),
            other => Err(format!("unsupported trend bucket '{}'", other)),
        }
    }
}

/// One bucket of the listening-trends series. `date` is the bucket start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListeningTrendPoint {
    #[serde(deserialize_with = "bucket_date")]
    pub date: NaiveDate,
    #[serde(rename = "trackCount", alias = "track_count", default)]
    pub track_count: u64,
    #[serde(default)]
    pub minutes: f64,
}

/// Lifetime listening totals plus hours per `YYYY-MM` month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListeningStreak {
    pub total_minutes: u64,
    pub total_tracks: u64,
    #[serde(deserialize_with = "optional_bucket_date")]
    pub biggest_listening_day: Option<NaiveDate>,
    pub monthly_hours: BTreeMap<String, f64>,
}

/// An artist from a ranked top-artists response. Position in the list is the rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedArtist {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl RankedArtist {
    /// Identity used for unique-artist counting: id, falling back to name.
    pub fn identity(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopArtistsResponse {
    #[serde(default)]
    pub artists: Vec<RankedArtist>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileRanking {
    pub percentile_ranking: f64,
    #[serde(default)]
    pub favorite_artist: Option<String>,
}

/// Per-event promoter metrics. Derived fields are filled in when the backend omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEventAnalytics")]
pub struct EventAnalyticsRecord {
    pub id: i64,
    pub title: String,
    pub views: u64,
    pub saves: u64,
    pub engagement: f64,
    pub save_rate: f64,
    pub event_date: Option<NaiveDateTime>,
    pub target_country: Option<String>,
    pub target_genre_interest: Option<String>,
    pub target_artist_interest: Option<String>,
}

impl EventAnalyticsRecord {
    pub fn new(id: i64, title: impl Into<String>, views: u64, saves: u64) -> Self {
        Self {
            id,
            title: title.into(),
            views,
            saves,
            engagement: engagement_score(views, saves),
            save_rate: save_rate(views, saves),
            event_date: None,
            target_country: None,
            target_genre_interest: None,
            target_artist_interest: None,
        }
    }

    pub fn with_engagement(mut self, engagement: f64) -> Self {
        self.engagement = engagement;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.event_date = date.and_hms_opt(0, 0, 0);
        self
    }

    pub fn with_targets(
        mut self,
        country: Option<&str>,
        genres: Option<&str>,
        artists: Option<&str>,
    ) -> Self {
        self.target_country = country.map(str::to_string);
        self.target_genre_interest = genres.map(str::to_string);
        self.target_artist_interest = artists.map(str::to_string);
        self
    }

    /// Engagement per view; zero when the event has no views.
    pub fn engagement_rate(&self) -> f64 {
        if self.views > 0 {
            self.engagement / self.views as f64
        } else {
            0.0
        }
    }
}

/// `views + 2 * saves`.
pub fn engagement_score(views: u64, saves: u64) -> f64 {
    views as f64 + 2.0 * saves as f64
}

/// Saves as a percentage of views; zero when there are no views.
pub fn save_rate(views: u64, saves: u64) -> f64 {
    if views > 0 {
        saves as f64 / views as f64 * 100.0
    } else {
        0.0
    }
}

#[derive(Deserialize)]
struct RawEventAnalytics {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    views: u64,
    #[serde(default)]
    saves: u64,
    #[serde(default)]
    engagement: Option<f64>,
    #[serde(default)]
    save_rate: Option<f64>,
    #[serde(default, deserialize_with = "flexible_datetime")]
    event_date: Option<NaiveDateTime>,
    #[serde(default)]
    target_country: Option<String>,
    #[serde(default)]
    target_genre_interest: Option<String>,
    #[serde(default)]
    target_artist_interest: Option<String>,
}

impl From<RawEventAnalytics> for EventAnalyticsRecord {
    fn from(raw: RawEventAnalytics) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            views: raw.views,
            saves: raw.saves,
            engagement: raw
                .engagement
                .unwrap_or_else(|| engagement_score(raw.views, raw.saves)),
            save_rate: if raw.views > 0 {
                raw.save_rate.unwrap_or_else(|| save_rate(raw.views, raw.saves))
            } else {
                0.0
            },
            event_date: raw.event_date,
            target_country: raw.target_country.filter(|c| !c.trim().is_empty()),
            target_genre_interest: raw.target_genre_interest,
            target_artist_interest: raw.target_artist_interest,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoterAnalytics {
    pub total_events: u64,
    pub total_views: u64,
    pub total_saves: u64,
    pub average_engagement: f64,
    pub events_analytics: Vec<EventAnalyticsRecord>,
}

/// Inclusive date window used to filter promoter events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    #[serde(alias = "week")]
    pub date: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub saves: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSeries {
    pub daily: Vec<TimeSeriesPoint>,
    pub weekly: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSeriesSummary {
    pub total_views: u64,
    pub total_saves: u64,
    pub average_daily_views: f64,
    pub average_daily_saves: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSeriesResponse {
    pub time_series: TimeSeries,
    pub summary: TimeSeriesSummary,
}

/// Input for the artist/genre chord diagram.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistGenreMatrix {
    pub matrix: Vec<Vec<f64>>,
    pub names: Vec<String>,
    pub colors: Vec<String>,
}

pub const HEATMAP_DAYS: usize = 7;
pub const HEATMAP_HOURS: usize = 24;

/// Plays per weekday (Monday = 0) and hour of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapGrid {
    pub data: Vec<Vec<u64>>,
    #[serde(rename = "maxValue", alias = "max_value", default)]
    pub max_value: u64,
}

impl Default for HeatmapGrid {
    fn default() -> Self {
        Self {
            data: vec![vec![0; HEATMAP_HOURS]; HEATMAP_DAYS],
            max_value: 0,
        }
    }
}

impl HeatmapGrid {
    pub fn get(&self, day: usize, hour: usize) -> u64 {
        self.data
            .get(day)
            .and_then(|row| row.get(hour))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.data.iter().flatten().sum()
    }

    pub fn recompute_max(&mut self) {
        self.max_value = self.data.iter().flatten().copied().max().unwrap_or(0);
    }
}

/// Export payload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unsupported export format '{}'", other)),
        }
    }
}

// Spotify ids are strings, the backend's own ids are integers.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn flexible_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_event_date))
}

// Weekly and monthly buckets come back as ISO datetimes, daily ones as bare dates.
fn bucket_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_event_date(&value)
        .map(|dt| dt.date())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", value)))
}

fn optional_bucket_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_event_date).map(|dt| dt.date()))
}

/// Accepts RFC 3339, naive ISO datetimes, and bare dates. Unparseable input reads as undated.
pub fn parse_event_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_derived_metrics() {
        let record =
            EventAnalyticsRecord::new(1, "Warehouse Night", 200, 50).with_engagement(300.0);
        assert_eq!(record.save_rate, 25.0);
        assert_eq!(record.engagement_rate(), 1.5);
    }

    #[test]
    fn test_zero_views_never_divides() {
        let record = EventAnalyticsRecord::new(2, "Empty Room", 0, 3);
        assert_eq!(record.save_rate, 0.0);
        assert_eq!(record.engagement_rate(), 0.0);
    }

    #[test]
    fn test_deserialize_fills_missing_engagement() {
        let record: EventAnalyticsRecord = serde_json::from_value(json!({
            "id": 7,
            "title": "Basement Show",
            "views": 40,
            "saves": 10,
            "event_date": "2024-06-01T21:00:00",
            "target_country": "  "
        }))
        .unwrap();
        assert_eq!(record.engagement, 60.0);
        assert_eq!(record.save_rate, 25.0);
        assert_eq!(record.event_date.unwrap().to_string(), "2024-06-01 21:00:00");
        assert_eq!(record.target_country, None);
    }

    #[test]
    fn test_parse_event_date_formats() {
        assert!(parse_event_date("2024-06-01").is_some());
        assert!(parse_event_date("2024-06-01T21:00:00Z").is_some());
        assert!(parse_event_date("2024-06-01 21:00:00").is_some());
        assert!(parse_event_date("next friday").is_none());
        assert!(parse_event_date("").is_none());
    }

    #[test]
    fn test_artist_identity_falls_back_to_name() {
        let artists: TopArtistsResponse = serde_json::from_value(json!({
            "artists": [
                {"id": 42, "name": "Numeric", "genres": ["rock"]},
                {"name": "Nameless", "genres": []}
            ]
        }))
        .unwrap();
        assert_eq!(artists.artists[0].identity(), "42");
        assert_eq!(artists.artists[1].identity(), "Nameless");
    }

    #[test]
    fn test_time_frame_round_trip_labels() {
        assert_eq!(TimeFrame::parse("long_term"), Some(TimeFrame::LongTerm));
        assert_eq!(TimeFrame::ShortTerm.label(), "Last 4 Weeks");
        assert_eq!(TimeFrame::parse("forever"), None);
    }

    #[test]
    fn test_date_range_inclusive() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let range = DateRange::new(Some(d("2024-01-01")), Some(d("2024-01-31")));
        assert!(range.contains(d("2024-01-01")));
        assert!(range.contains(d("2024-01-31")));
        assert!(!range.contains(d("2024-02-01")));
        assert!(DateRange::default().is_unbounded());
    }

    #[test]
    fn test_listening_record_serde_round_trip() {
        let record: ListeningRecord = serde_json::from_value(json!({
            "trackName": "Motion Sickness",
            "artists": ["Phoebe Bridgers"],
            "playedAt": "2024-06-10T09:15:00Z"
        }))
        .unwrap();
        assert!(record.genres.is_empty());
        assert_eq!(record.artwork_url, None);
        assert_eq!(record.played_at.to_rfc3339(), "2024-06-10T09:15:00+00:00");

        let encoded = serde_json::to_value(&record).unwrap();
        assert_eq!(encoded["track_name"], "Motion Sickness");
        let decoded: ListeningRecord = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_trend_points_accept_dates_and_datetimes() {
        let points: Vec<ListeningTrendPoint> = serde_json::from_value(json!([
            {"date": "2024-05-06", "trackCount": 12, "minutes": 40.5},
            {"date": "2024-05-13T00:00:00", "trackCount": 3, "minutes": 9.0}
        ]))
        .unwrap();
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2024, 5, 13).unwrap());
        assert_eq!(points[0].track_count, 12);

        let bad = serde_json::from_value::<ListeningTrendPoint>(json!({"date": "soon"}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_streak_decodes_backend_shape() {
        let streak: ListeningStreak = serde_json::from_value(json!({
            "total_minutes": 5400,
            "total_tracks": 1500,
            "biggest_listening_day": "2024-03-02",
            "monthly_hours": {"2024-02": 12.5, "2024-03": 30.25}
        }))
        .unwrap();
        assert_eq!(streak.biggest_listening_day, NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(streak.monthly_hours["2024-03"], 30.25);

        let empty: ListeningStreak =
            serde_json::from_value(json!({"biggest_listening_day": null})).unwrap();
        assert_eq!(empty, ListeningStreak::default());
    }

    #[test]
    fn test_selection_exposes_frame_or_day_window() {
        assert_eq!(TimeFrameSelection::default().frame(), Some(TimeFrame::MediumTerm));
        assert_eq!(TimeFrameSelection::default().day_window(), None);
        assert_eq!(TimeFrameSelection::Days(30).day_window(), Some(30));
        assert_eq!("Weekly".parse::<TrendBucket>(), Ok(TrendBucket::Weekly));
        assert!("hourly".parse::<TrendBucket>().is_err());
    }
}
