//! Debounced message search.
//!
//! Keystrokes feed a dedicated task; the search endpoint is only contacted
//! after a quiet period, and an in-flight response for a superseded query is
//! discarded rather than overwriting a fresher panel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, warn};

use hamkalam_shared::constants::{MIN_QUERY_LEN, NO_RESULTS_MESSAGE};

use crate::api::{SearchBackend, SearchResult};

/// What the results panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    Hidden,
    NoResults,
    Results(Vec<SearchResult>),
}

impl PanelState {
    /// Status line rendered inside the panel, in the user's language.
    /// `None` when the panel is hidden or showing result rows.
    pub fn status_message(&self) -> Option<&'static str> {
        match self {
            PanelState::NoResults => Some(NO_RESULTS_MESSAGE),
            PanelState::Hidden | PanelState::Results(_) => None,
        }
    }
}

/// Handle to the search task.
#[derive(Debug, Clone)]
pub struct SearchHandle {
    input_tx: mpsc::Sender<String>,
    state_rx: watch::Receiver<PanelState>,
}

impl SearchHandle {
    /// Feed one keystroke's worth of input (the full field value).
    pub async fn input(&self, text: impl Into<String>) {
        if self.input_tx.send(text.into()).await.is_err() {
            warn!("Search task gone, input dropped");
        }
    }

    /// Snapshot of the results panel.
    pub fn state(&self) -> PanelState {
        self.state_rx.borrow().clone()
    }

    /// Watch the panel for changes.
    pub fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.state_rx.clone()
    }
}

/// Spawn the search task. `debounce` is the quiet period before a query is
/// sent ([`hamkalam_shared::constants::SEARCH_DEBOUNCE`] in production).
pub fn spawn(backend: Arc<dyn SearchBackend>, debounce: Duration) -> SearchHandle {
    let (input_tx, input_rx) = mpsc::channel(64);
    let (state_tx, state_rx) = watch::channel(PanelState::Hidden);

    tokio::spawn(async move {
        search_loop(backend, debounce, input_rx, state_tx).await;
    });

    SearchHandle { input_tx, state_rx }
}

async fn search_loop(
    backend: Arc<dyn SearchBackend>,
    debounce: Duration,
    mut input_rx: mpsc::Receiver<String>,
    state_tx: watch::Sender<PanelState>,
) {
    // Deadline armed by the latest keystroke; None while idle
    let mut pending: Option<(String, Instant)> = None;
    // Bumped for every issued request and every panel clear; responses
    // tagged with an older generation are discarded
    let mut generation: u64 = 0;
    let (result_tx, mut result_rx) = mpsc::channel::<(u64, Result<Vec<SearchResult>, ()>)>(8);

    loop {
        let deadline = pending.as_ref().map(|(_, d)| *d);

        tokio::select! {
            input = input_rx.recv() => {
                let Some(text) = input else { break };
                let query = text.trim().to_string();

                if query.len() < MIN_QUERY_LEN {
                    // Clear and hide immediately, drop any pending timer and
                    // invalidate whatever is still in flight
                    pending = None;
                    generation += 1;
                    let _ = state_tx.send(PanelState::Hidden);
                    continue;
                }

                // Restart the quiet period on every keystroke
                pending = Some((query, Instant::now() + debounce));
            }

            _ = async { tokio::time::sleep_until(deadline.unwrap()).await },
                if deadline.is_some() =>
            {
                let (query, _) = pending.take().unwrap();
                generation += 1;
                let gen = generation;

                debug!(query = %query, "Debounce expired, searching");

                let backend = backend.clone();
                let result_tx = result_tx.clone();
                tokio::spawn(async move {
                    let result = backend
                        .search_messages(&query)
                        .await
                        .map_err(|e| warn!(error = %e, "Error searching messages"));
                    let _ = result_tx.send((gen, result)).await;
                });
            }

            completed = result_rx.recv() => {
                let Some((gen, result)) = completed else { break };
                if gen != generation {
                    debug!("Discarding stale search response");
                    continue;
                }

                match result {
                    Ok(results) if results.is_empty() => {
                        let _ = state_tx.send(PanelState::NoResults);
                    }
                    Ok(results) => {
                        let _ = state_tx.send(PanelState::Results(results));
                    }
                    // Already logged; panel untouched
                    Err(()) => {}
                }
            }
        }
    }

    debug!("Search task ended");
}
