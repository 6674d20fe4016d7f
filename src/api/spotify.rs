use super::client::ApiClient;
use crate::constants::{
    HOME_DATA, SPOTIFY_RECENTLY_PLAYED, SPOTIFY_TOP_ALBUMS, SPOTIFY_TOP_ARTISTS, SPOTIFY_TOP_TRACKS,
};
use crate::error::Result;
use crate::types::{TimeFrame, TopArtistsResponse};
use serde_json::Value;
use tracing::instrument;

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn home_data(&self, user_id: i64) -> Result<Value> {
        self.get_json(
            HOME_DATA,
            &[("user_id", user_id.to_string())],
            "Failed to fetch home data",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn top_tracks(&self, user_id: i64, time_frame: TimeFrame) -> Result<Value> {
        self.get_json(
            SPOTIFY_TOP_TRACKS,
            &[
                ("user_id", user_id.to_string()),
                ("time_frame", time_frame.as_str().to_string()),
            ],
            "Failed to fetch top tracks from Spotify",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn top_albums(&self, user_id: i64, time_frame: TimeFrame) -> Result<Value> {
        self.get_json(
            SPOTIFY_TOP_ALBUMS,
            &[
                ("user_id", user_id.to_string()),
                ("time_frame", time_frame.as_str().to_string()),
            ],
            "Failed to fetch top albums from Spotify",
        )
        .await
    }

    /// Ranked top artists; list order is the rank.
    #[instrument(skip(self))]
    pub async fn top_artists(
        &self,
        user_id: i64,
        time_frame: TimeFrame,
        limit: u32,
    ) -> Result<TopArtistsResponse> {
        self.get_json(
            SPOTIFY_TOP_ARTISTS,
            &[
                ("user_id", user_id.to_string()),
                ("time_frame", time_frame.as_str().to_string()),
                ("limit", limit.to_string()),
            ],
            "Failed to fetch top artists from Spotify",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn recently_played(&self) -> Result<Value> {
        self.get_json(
            SPOTIFY_RECENTLY_PLAYED,
            &[],
            "Failed to fetch recently played tracks",
        )
        .await
    }
}
