use super::client::ApiClient;
use crate::constants::{
    EVENTS_ALL, EVENTS_DELETE, EVENTS_LIST, EVENTS_PROMOTER, EVENTS_SAVE, EVENTS_SAVED,
    EVENTS_TRACK_VIEW,
};
use crate::error::Result;
use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn list_events(&self) -> Result<Value> {
        self.get_json(EVENTS_LIST, &[], "Failed to fetch events").await
    }

    #[instrument(skip(self))]
    pub async fn all_events(&self) -> Result<Value> {
        self.get_json(EVENTS_ALL, &[], "Failed to fetch all events").await
    }

    #[instrument(skip(self))]
    pub async fn saved_events(&self, user_id: i64) -> Result<Value> {
        self.get_json(
            EVENTS_SAVED,
            &[("user_id", user_id.to_string())],
            "Failed to fetch saved events",
        )
        .await
    }

    #[instrument(skip(self, payload))]
    pub async fn save_event(&self, payload: &Value) -> Result<Value> {
        self.send_json(Method::POST, EVENTS_SAVE, Some(payload), "Failed to save event")
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_saved_event(&self, event_id: i64) -> Result<Value> {
        self.send_json::<Value, Value>(
            Method::DELETE,
            &format!("{}/{}", EVENTS_DELETE, event_id),
            None,
            "Failed to delete saved event",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn promoter_events(&self, user_id: i64) -> Result<Value> {
        self.get_json(
            EVENTS_PROMOTER,
            &[("user_id", user_id.to_string())],
            "Failed to fetch promoter events",
        )
        .await
    }

    #[instrument(skip(self, event))]
    pub async fn create_promoter_event(&self, event: &Value) -> Result<Value> {
        self.send_json(
            Method::POST,
            EVENTS_PROMOTER,
            Some(event),
            "Failed to create promoter event",
        )
        .await
    }

    #[instrument(skip(self, event))]
    pub async fn update_promoter_event(&self, event_id: i64, event: &Value) -> Result<Value> {
        self.send_json(
            Method::PUT,
            &format!("{}/{}", EVENTS_PROMOTER, event_id),
            Some(event),
            "Failed to update promoter event",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_promoter_event(&self, event_id: i64) -> Result<Value> {
        self.send_json::<Value, Value>(
            Method::DELETE,
            &format!("{}/{}", EVENTS_PROMOTER, event_id),
            None,
            "Failed to delete promoter event",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn track_event_view(&self, event_id: &str) -> Result<Value> {
        self.send_json::<Value, Value>(
            Method::POST,
            &format!("{}/{}", EVENTS_TRACK_VIEW, event_id),
            None,
            "Failed to track event view",
        )
        .await
    }
}
