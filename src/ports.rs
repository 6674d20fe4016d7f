use crate::api::ApiClient;
use crate::error::Result;
use async_trait::async_trait;

/// Where debounced view events end up.
#[async_trait]
pub trait EventViewPort: Send + Sync {
    async fn track_view(&self, event_id: &str) -> Result<()>;
}

#[async_trait]
impl EventViewPort for ApiClient {
    async fn track_view(&self, event_id: &str) -> Result<()> {
        self.track_event_view(event_id).await.map(|_| ())
    }
}
