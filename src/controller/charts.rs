//! Fetch-and-aggregate steps for each analytics chart.
//!
//! These are what a [`ChartController`](super::ChartController) runs for its filter.

use crate::aggregation::{
    best_save_rate, detect_trends, filter_by_date_range, genre_evolution, peak_days,
    targeting_effectiveness, top_events, trend_points, weekly_trend, FanStanding, GenreEvolution,
    MonthHours, TargetingEffectiveness, Trends, WeeklyTrend,
};
use crate::api::ApiClient;
use crate::constants::{
    DEFAULT_TOP_EVENTS, DEFAULT_TRENDS_DAYS, GENRE_EVOLUTION_ARTIST_LIMIT, PEAK_DAY_COUNT,
};
use crate::error::Result;
use crate::types::{
    DateRange, EventAnalyticsRecord, ListeningStreak, ListeningTrendPoint, PromoterAnalytics,
    TimeFrame, TimeFrameSelection, TimeSeriesPoint, TimeSeriesResponse, TimeSeriesSummary,
    TrendBucket,
};
use chrono::{Datelike, Utc};
use serde::Serialize;
use tracing::{info, instrument};

/// Pull top artists for all three frames at once and fold them into genre evolution.
#[instrument(skip(client))]
pub async fn load_genre_evolution(client: &ApiClient, user_id: i64) -> Result<GenreEvolution> {
    let (short, medium, long) = tokio::try_join!(
        client.top_artists(user_id, TimeFrame::ShortTerm, GENRE_EVOLUTION_ARTIST_LIMIT),
        client.top_artists(user_id, TimeFrame::MediumTerm, GENRE_EVOLUTION_ARTIST_LIMIT),
        client.top_artists(user_id, TimeFrame::LongTerm, GENRE_EVOLUTION_ARTIST_LIMIT),
    )?;
    let evolution = genre_evolution(&[
        (TimeFrame::ShortTerm, short.artists),
        (TimeFrame::MediumTerm, medium.artists),
        (TimeFrame::LongTerm, long.artists),
    ]);
    info!(genres = evolution.top_genres.len(), "Built genre evolution");
    Ok(evolution)
}

pub async fn load_fan_standing(client: &ApiClient, user_id: i64) -> Result<FanStanding> {
    let ranking = client.top_listeners_percentile(user_id).await?;
    Ok(FanStanding::from(&ranking))
}

/// Everything the promoter dashboard shows for one date window.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PromoterReport {
    pub total_events: u64,
    pub total_views: u64,
    pub total_saves: u64,
    pub average_engagement: f64,
    pub events: Vec<EventAnalyticsRecord>,
    pub trends: Trends,
    pub targeting: TargetingEffectiveness,
    pub top_events: Vec<EventAnalyticsRecord>,
    pub best_save_rate: Vec<EventAnalyticsRecord>,
}

impl PromoterReport {
    pub fn build(analytics: &PromoterAnalytics, range: &DateRange) -> Self {
        let events = filter_by_date_range(&analytics.events_analytics, range);
        Self {
            total_events: analytics.total_events,
            total_views: analytics.total_views,
            total_saves: analytics.total_saves,
            average_engagement: analytics.average_engagement,
            trends: detect_trends(&events),
            targeting: targeting_effectiveness(&events),
            top_events: top_events(&events, DEFAULT_TOP_EVENTS),
            best_save_rate: best_save_rate(&events, DEFAULT_TOP_EVENTS),
            events,
        }
    }
}

#[instrument(skip(client))]
pub async fn load_promoter_report(
    client: &ApiClient,
    user_id: i64,
    range: DateRange,
) -> Result<PromoterReport> {
    let analytics = client.promoter_analytics(user_id).await?;
    Ok(PromoterReport::build(&analytics, &range))
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesReport {
    pub trend: WeeklyTrend,
    pub peak_days: Vec<TimeSeriesPoint>,
    pub weekly: Vec<TimeSeriesPoint>,
    pub summary: TimeSeriesSummary,
}

impl From<TimeSeriesResponse> for TimeSeriesReport {
    fn from(response: TimeSeriesResponse) -> Self {
        let daily = &response.time_series.daily;
        Self {
            trend: weekly_trend(daily),
            peak_days: peak_days(daily, PEAK_DAY_COUNT),
            weekly: response.time_series.weekly.clone(),
            summary: response.summary,
        }
    }
}

/// One event's series when `event_id` is given, otherwise the promoter's aggregate.
#[instrument(skip(client))]
pub async fn load_time_series(
    client: &ApiClient,
    user_id: i64,
    event_id: Option<i64>,
    days: u32,
) -> Result<TimeSeriesReport> {
    let response = match event_id {
        Some(id) => client.event_time_series(id, user_id, days).await?,
        None => client.promoter_time_series(user_id, days).await?,
    };
    Ok(TimeSeriesReport::from(response))
}

/// Listening trend points for a trailing window. A time-frame selection uses the default window.
#[instrument(skip(client))]
pub async fn load_listening_trends(
    client: &ApiClient,
    user_id: i64,
    bucket: TrendBucket,
    selection: TimeFrameSelection,
) -> Result<Vec<ListeningTrendPoint>> {
    let days = selection.day_window().unwrap_or(DEFAULT_TRENDS_DAYS);
    let points = client.listening_trends(user_id, bucket, days).await?;
    Ok(trend_points(points, bucket))
}

#[derive(Debug, Clone, Serialize)]
pub struct StreakReport {
    pub total_minutes: u64,
    pub total_tracks: u64,
    pub biggest_listening_day: Option<chrono::NaiveDate>,
    pub months: Vec<MonthHours>,
}

impl StreakReport {
    pub fn build(streak: &ListeningStreak, fallback_year: i32) -> Self {
        Self {
            total_minutes: streak.total_minutes,
            total_tracks: streak.total_tracks,
            biggest_listening_day: streak.biggest_listening_day,
            months: streak.monthly_series(fallback_year),
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.months.iter().map(|m| m.hours).sum()
    }
}

pub async fn load_listening_streak(client: &ApiClient, user_id: i64) -> Result<StreakReport> {
    let streak = client.listening_streak(user_id).await?;
    Ok(StreakReport::build(&streak, Utc::now().year()))
}
