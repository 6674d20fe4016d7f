//! Per-chart fetch state with a latest-wins guard.
//!
//! Every selection or refresh hands out a [`FetchTicket`] carrying a sequence number.
//! Only the response for the most recently issued ticket is applied; anything older is
//! dropped on arrival. Nothing is cancelled.

use crate::error::{Result, RewrappedError};
use std::future::Future;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const NOT_FOUND_MESSAGE: &str = "No analytics data found";
pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication required to view analytics";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ChartState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> ChartState<T> {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Failure
        } else if self.data.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }
}

/// Proof that a fetch was issued, and for which filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket<F> {
    pub seq: u64,
    pub filter: F,
}

/// User-facing message for a failed chart fetch.
pub fn failure_message(err: &RewrappedError, fallback: &str) -> String {
    if err.status() == Some(404) {
        NOT_FOUND_MESSAGE.to_string()
    } else if err.is_auth_error() {
        AUTH_REQUIRED_MESSAGE.to_string()
    } else {
        fallback.to_string()
    }
}

struct Slot<F, T> {
    filter: F,
    state: ChartState<T>,
    seq: u64,
}

pub struct ChartController<F, T> {
    name: &'static str,
    failure_message: String,
    slot: Mutex<Slot<F, T>>,
}

impl<F, T> ChartController<F, T>
where
    F: Clone + Send,
    T: Clone + Send,
{
    pub fn new(name: &'static str, filter: F, failure_message: impl Into<String>) -> Self {
        Self {
            name,
            failure_message: failure_message.into(),
            slot: Mutex::new(Slot {
                filter,
                state: ChartState::default(),
                seq: 0,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn state(&self) -> ChartState<T> {
        self.slot.lock().await.state.clone()
    }

    pub async fn filter(&self) -> F {
        self.slot.lock().await.filter.clone()
    }

    /// Re-enter loading for the current filter.
    pub async fn begin(&self) -> FetchTicket<F> {
        let mut slot = self.slot.lock().await;
        slot.seq += 1;
        slot.state.loading = true;
        slot.state.error = None;
        FetchTicket {
            seq: slot.seq,
            filter: slot.filter.clone(),
        }
    }

    /// Switch the filter and re-enter loading. Earlier tickets become stale.
    pub async fn select(&self, filter: F) -> FetchTicket<F> {
        {
            let mut slot = self.slot.lock().await;
            slot.filter = filter;
        }
        self.begin().await
    }

    /// Apply a fetch result. Returns `false` when the ticket was superseded.
    pub async fn complete(&self, ticket: &FetchTicket<F>, result: Result<T>) -> bool {
        let mut slot = self.slot.lock().await;
        if ticket.seq != slot.seq {
            debug!(
                chart = self.name,
                ticket = ticket.seq,
                current = slot.seq,
                "Discarding stale chart response"
            );
            return false;
        }

        slot.state.loading = false;
        match result {
            Ok(data) => {
                slot.state.data = Some(data);
                slot.state.error = None;
            }
            Err(e) => {
                warn!(chart = self.name, error = %e, "Chart fetch failed");
                slot.state.data = None;
                slot.state.error = Some(failure_message(&e, &self.failure_message));
            }
        }
        true
    }

    /// Run `fetch` for the ticket's filter without holding the lock, then apply it.
    pub async fn fetch_with<Fetch, Fut>(&self, ticket: FetchTicket<F>, fetch: Fetch) -> bool
    where
        Fetch: FnOnce(F) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let result = fetch(ticket.filter.clone()).await;
        self.complete(&ticket, result).await
    }

    pub async fn refresh<Fetch, Fut>(&self, fetch: Fetch) -> bool
    where
        Fetch: FnOnce(F) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let ticket = self.begin().await;
        self.fetch_with(ticket, fetch).await
    }

    pub async fn select_and_fetch<Fetch, Fut>(&self, filter: F, fetch: Fetch) -> bool
    where
        Fetch: FnOnce(F) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let ticket = self.select(filter).await;
        self.fetch_with(ticket, fetch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::types::TimeFrame;
    use tokio::sync::oneshot;

    fn controller() -> ChartController<TimeFrame, String> {
        ChartController::new("genres", TimeFrame::ShortTerm, "Failed to load genre data")
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let ctl = controller();
        assert_eq!(ctl.state().await.phase(), Phase::Idle);

        let ticket = ctl.begin().await;
        assert_eq!(ctl.state().await.phase(), Phase::Loading);
        assert_eq!(ticket.filter, TimeFrame::ShortTerm);

        assert!(ctl.complete(&ticket, Ok("short".to_string())).await);
        let state = ctl.state().await;
        assert_eq!(state.phase(), Phase::Success);
        assert_eq!(state.data.as_deref(), Some("short"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_older_ticket_is_discarded() {
        let ctl = controller();
        let first = ctl.select(TimeFrame::MediumTerm).await;
        let second = ctl.select(TimeFrame::LongTerm).await;

        assert!(ctl.complete(&second, Ok("long".to_string())).await);
        assert!(!ctl.complete(&first, Ok("medium".to_string())).await);

        let state = ctl.state().await;
        assert_eq!(state.data.as_deref(), Some("long"));
        assert_eq!(ctl.filter().await, TimeFrame::LongTerm);
    }

    #[tokio::test]
    async fn test_slow_stale_fetch_never_overwrites() {
        let ctl = controller();
        let ctl = &ctl;
        let (tx, rx) = oneshot::channel::<()>();

        let first = ctl.select(TimeFrame::MediumTerm).await;
        let second = ctl.select(TimeFrame::LongTerm).await;

        let slow = ctl.fetch_with(first, move |f| async move {
            let _ = rx.await;
            Ok(f.as_str().to_string())
        });
        let fast = async move {
            let applied = ctl
                .fetch_with(second, |f| async move { Ok(f.as_str().to_string()) })
                .await;
            let _ = tx.send(());
            applied
        };

        let (slow_applied, fast_applied) = tokio::join!(slow, fast);
        assert!(!slow_applied);
        assert!(fast_applied);
        assert_eq!(ctl.state().await.data.as_deref(), Some("long_term"));
    }

    #[tokio::test]
    async fn test_failure_messages() {
        let ctl = controller();

        ctl.refresh(|_| async {
            Err(ApiError::from_response("Failed to fetch genre distribution", 404, None).into())
        })
        .await;
        let state = ctl.state().await;
        assert_eq!(state.phase(), Phase::Failure);
        assert_eq!(state.error.as_deref(), Some(NOT_FOUND_MESSAGE));

        ctl.refresh(|_| async {
            Err(ApiError::from_response("Failed to fetch genre distribution", 401, None).into())
        })
        .await;
        assert_eq!(ctl.state().await.error.as_deref(), Some(AUTH_REQUIRED_MESSAGE));

        ctl.refresh(|_| async {
            Err(ApiError::from_response("Failed to fetch genre distribution", 500, None).into())
        })
        .await;
        assert_eq!(ctl.state().await.error.as_deref(), Some("Failed to load genre data"));
    }

    #[tokio::test]
    async fn test_refetch_clears_previous_error() {
        let ctl = controller();
        ctl.refresh(|_| async { Err(RewrappedError::Config("boom".into())) }).await;
        assert!(ctl.state().await.error.is_some());

        let ticket = ctl.select(TimeFrame::LongTerm).await;
        let state = ctl.state().await;
        assert!(state.loading);
        assert!(state.error.is_none());
        ctl.complete(&ticket, Ok("ok".into())).await;
        assert_eq!(ctl.state().await.phase(), Phase::Success);
    }
}
