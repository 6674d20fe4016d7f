use super::client::ApiClient;
use crate::constants::{
    ANALYTICS_ARTIST_GENRE_MATRIX, ANALYTICS_GENRE_DISTRIBUTION, ANALYTICS_LISTENING_HEATMAP,
    ANALYTICS_LISTENING_STREAK, ANALYTICS_LISTENING_TRENDS, ANALYTICS_TOP_LISTENERS,
    EVENTS_EXPORT, EVENTS_PROMOTER_ANALYTICS, EVENTS_TIME_SERIES,
};
use crate::error::{ApiError, Result};
use crate::types::{
    ArtistGenreMatrix, ExportFormat, HeatmapGrid, ListeningStreak, ListeningTrendPoint,
    PercentileRanking, PromoterAnalytics, TimeFrame, TimeSeriesResponse, TrendBucket,
};
use serde_json::Value;
use tracing::instrument;

/// Export body: CSV text or decoded JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportPayload {
    Csv(String),
    Json(Value),
}

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn listening_trends(
        &self,
        user_id: i64,
        bucket: TrendBucket,
        days: u32,
    ) -> Result<Vec<ListeningTrendPoint>> {
        self.get_json(
            ANALYTICS_LISTENING_TRENDS,
            &[
                ("user_id", user_id.to_string()),
                ("time_frame", bucket.as_str().to_string()),
                ("days", days.to_string()),
            ],
            "Failed to fetch listening trends",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn listening_heatmap(&self, user_id: i64, days: u32) -> Result<HeatmapGrid> {
        self.get_json(
            ANALYTICS_LISTENING_HEATMAP,
            &[("user_id", user_id.to_string()), ("days", days.to_string())],
            "Failed to fetch listening heatmap",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn genre_distribution(&self, user_id: i64, time_range: TimeFrame) -> Result<Value> {
        self.get_json(
            ANALYTICS_GENRE_DISTRIBUTION,
            &[
                ("user_id", user_id.to_string()),
                ("time_range", time_range.as_str().to_string()),
            ],
            "Failed to fetch genre distribution",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn artist_genre_matrix(
        &self,
        user_id: i64,
        time_range: TimeFrame,
        limit: u32,
    ) -> Result<ArtistGenreMatrix> {
        self.get_json(
            ANALYTICS_ARTIST_GENRE_MATRIX,
            &[
                ("user_id", user_id.to_string()),
                ("time_range", time_range.as_str().to_string()),
                ("limit", limit.to_string()),
            ],
            "Failed to fetch artist-genre matrix",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn listening_streak(&self, user_id: i64) -> Result<ListeningStreak> {
        self.get_json(
            ANALYTICS_LISTENING_STREAK,
            &[("user_id", user_id.to_string())],
            "Failed to fetch listening streak data",
        )
        .await
    }

    /// The backend answers either with a bare number or with
    /// `{percentile_ranking, favorite_artist}`.
    #[instrument(skip(self))]
    pub async fn top_listeners_percentile(&self, user_id: i64) -> Result<PercentileRanking> {
        let context = "Failed to fetch top listeners percentile data";
        let value: Value = self
            .get_json(
                ANALYTICS_TOP_LISTENERS,
                &[("user_id", user_id.to_string())],
                context,
            )
            .await?;

        if let Some(percentile) = value.as_f64() {
            return Ok(PercentileRanking {
                percentile_ranking: percentile,
                favorite_artist: None,
            });
        }

        serde_json::from_value(value.clone())
            .map_err(|e| ApiError::invalid_body(context, 200, e.to_string(), value).into())
    }

    #[instrument(skip(self))]
    pub async fn promoter_analytics(&self, user_id: i64) -> Result<PromoterAnalytics> {
        self.get_json(
            EVENTS_PROMOTER_ANALYTICS,
            &[("user_id", user_id.to_string())],
            "Failed to fetch promoter analytics",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn event_time_series(
        &self,
        event_id: i64,
        user_id: i64,
        days: u32,
    ) -> Result<TimeSeriesResponse> {
        self.get_json(
            &format!("{}/{}", EVENTS_TIME_SERIES, event_id),
            &[("user_id", user_id.to_string()), ("days", days.to_string())],
            "Failed to fetch event time series data",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn promoter_time_series(
        &self,
        user_id: i64,
        days: u32,
    ) -> Result<TimeSeriesResponse> {
        self.get_json(
            &format!("{}/promoter", EVENTS_TIME_SERIES),
            &[("user_id", user_id.to_string()), ("days", days.to_string())],
            "Failed to fetch promoter time series data",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn export_event_analytics(
        &self,
        event_id: i64,
        user_id: i64,
        format: ExportFormat,
        days: u32,
    ) -> Result<ExportPayload> {
        let path = format!("{}/{}", EVENTS_EXPORT, event_id);
        let query = [
            ("user_id", user_id.to_string()),
            ("format", format.as_str().to_string()),
            ("days", days.to_string()),
        ];
        self.export(&path, &query, format, "Failed to export event analytics")
            .await
    }

    #[instrument(skip(self))]
    pub async fn export_promoter_analytics(
        &self,
        user_id: i64,
        format: ExportFormat,
    ) -> Result<ExportPayload> {
        let path = format!("{}/promoter", EVENTS_EXPORT);
        let query = [
            ("user_id", user_id.to_string()),
            ("format", format.as_str().to_string()),
        ];
        self.export(&path, &query, format, "Failed to export promoter analytics")
            .await
    }

    async fn export(
        &self,
        path: &str,
        query: &[(&str, String)],
        format: ExportFormat,
        context: &str,
    ) -> Result<ExportPayload> {
        match format {
            ExportFormat::Csv => Ok(ExportPayload::Csv(
                self.get_text(path, query, context).await?,
            )),
            ExportFormat::Json => Ok(ExportPayload::Json(
                self.get_json(path, query, context).await?,
            )),
        }
    }
}
