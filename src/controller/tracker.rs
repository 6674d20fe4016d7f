use crate::config::TrackingConfig;
use crate::metrics::TrackingMetrics;
use crate::ports::EventViewPort;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Default)]
struct TrackerState {
    viewed: HashSet<String>,
    // event id -> token of the latest call still waiting out the window
    pending: HashMap<String, u64>,
    next_token: u64,
    session: u64,
}

/// Debounced event-view tracking.
///
/// Rapid calls for the same id collapse into a single tracked view once the id has been
/// quiet for the debounce window. An id is tracked at most once per session; [`reset`]
/// starts a new session and drops anything still pending.
///
/// [`reset`]: ViewTracker::reset
#[derive(Clone)]
pub struct ViewTracker {
    port: Arc<dyn EventViewPort>,
    window: Duration,
    state: Arc<Mutex<TrackerState>>,
}

impl ViewTracker {
    pub fn new(port: Arc<dyn EventViewPort>, window: Duration) -> Self {
        Self {
            port,
            window,
            state: Arc::new(Mutex::new(TrackerState::default())),
        }
    }

    pub fn from_config(port: Arc<dyn EventViewPort>, config: &TrackingConfig) -> Self {
        Self::new(port, config.debounce())
    }

    pub async fn track_view(&self, event_id: &str) {
        let (token, session) = {
            let mut state = self.state.lock().await;
            if state.viewed.contains(event_id) {
                return;
            }
            state.next_token += 1;
            let token = state.next_token;
            state.pending.insert(event_id.to_string(), token);
            (token, state.session)
        };

        let tracker = self.clone();
        let event_id = event_id.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(tracker.window).await;
            tracker.fire(&event_id, token, session).await;
        });
    }

    async fn fire(&self, event_id: &str, token: u64, session: u64) {
        {
            let mut state = self.state.lock().await;
            if state.session != session || state.pending.get(event_id) != Some(&token) {
                return;
            }
            state.pending.remove(event_id);
            if !state.viewed.insert(event_id.to_string()) {
                return;
            }
        }

        match self.port.track_view(event_id).await {
            Ok(()) => {
                debug!(event_id, "Tracked event view");
                TrackingMetrics::record_tracked();
            }
            Err(e) => {
                warn!(event_id, error = %e, "Failed to track event view");
                TrackingMetrics::record_error();
            }
        }
    }

    pub async fn has_viewed(&self, event_id: &str) -> bool {
        self.state.lock().await.viewed.contains(event_id)
    }

    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.viewed.clear();
        state.pending.clear();
        state.session += 1;
    }
}
