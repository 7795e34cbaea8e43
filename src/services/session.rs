//! Shared dashboard session with last-request-wins semantics.
//!
//! Every selection gets a token from a monotonically increasing counter. A
//! fetch that settles after a newer selection was made is discarded, so the
//! view always reflects the most recent request rather than the slowest one.
//! State is in-memory only and shared via `Arc`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::services::dashboard::{render, Selection, ViewState};
use crate::services::sheets::SheetsClient;

/// Current selection and what the dashboard shows for it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Token of the selection this snapshot belongs to (0 before any selection)
    pub token: u64,
    pub selection: Selection,
    pub state: ViewState,
}

#[derive(Debug)]
pub struct DashboardSession {
    client: SheetsClient,
    latest: AtomicU64,
    current: RwLock<SessionSnapshot>,
}

/// Shared session handle.
pub type SharedSession = Arc<DashboardSession>;

impl DashboardSession {
    pub fn new(client: SheetsClient) -> Self {
        Self {
            client,
            latest: AtomicU64::new(0),
            current: RwLock::new(SessionSnapshot {
                token: 0,
                selection: Selection::default(),
                state: ViewState::NoSourceSelected,
            }),
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.current.read().await.clone()
    }

    /// Record a new selection and return its token.
    ///
    /// The view moves to `Loading`, or straight to `NoSourceSelected` when the
    /// selection has no source.
    pub async fn begin(&self, selection: Selection) -> u64 {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let state = if selection.source().is_some() {
            ViewState::Loading
        } else {
            ViewState::NoSourceSelected
        };

        let mut current = self.current.write().await;
        // A later begin() may have taken the lock first.
        if token > current.token {
            *current = SessionSnapshot {
                token,
                selection,
                state,
            };
        }
        token
    }

    /// Commit the settled state for `token`. Returns `false` (and changes
    /// nothing) when a newer selection has been made since.
    pub async fn complete(&self, token: u64, state: ViewState) -> bool {
        let mut current = self.current.write().await;
        if token != self.latest.load(Ordering::SeqCst) || token != current.token {
            tracing::debug!(
                "Discarding stale dashboard result (token {}, latest {})",
                token,
                current.token
            );
            return false;
        }
        current.state = state;
        true
    }

    /// Fetch and commit the state for an already begun selection.
    pub async fn settle(&self, token: u64, selection: &Selection) -> bool {
        let state = render(&self.client, selection).await;
        self.complete(token, state).await
    }
}
