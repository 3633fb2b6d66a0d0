//! Search execution lifecycle.
//!
//! One controller owns one search at a time: `idle → running → {succeeded,
//! failed} → idle`. While running, a once-per-second cosmetic tick reports
//! elapsed time; it is scoped to the driver function and therefore stops on
//! every exit path. A generation counter guards against a stale response
//! overwriting a newer one (last-issued-wins).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::api::DiscoveryClient;
use crate::model::{Creator, ScoutEvent, SearchParams, SearchResult};

/// Cadence of the cosmetic elapsed-time tick.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Shown when a failure carries no message of its own.
pub const GENERIC_SEARCH_FAILURE: &str = "search failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Search state with pure transition methods. The async driver in
/// [`SearchController::run`] feeds it events; tests can drive it directly.
#[derive(Debug, Default)]
pub struct SearchState {
    pub phase: SearchPhase,
    pub elapsed_secs: u64,
    pub error: Option<String>,
    pub creators: Vec<Creator>,
    pub total: u64,
    pub db_total: u64,
    generation: u64,
}

impl SearchState {
    /// Enters `running`: clears any previous error, zeroes the elapsed
    /// counter, and issues a new generation. Returns the generation token
    /// that the in-flight operation must present back.
    pub fn begin(&mut self) -> u64 {
        self.phase = SearchPhase::Running;
        self.error = None;
        self.elapsed_secs = 0;
        self.generation += 1;
        self.generation
    }

    /// One elapsed second. Best-effort and cosmetic: ignored unless the
    /// search of generation `gen` is still the current running one.
    pub fn tick(&mut self, gen: u64) {
        if gen == self.generation && self.phase == SearchPhase::Running {
            self.elapsed_secs += 1;
        }
    }

    /// Applies a terminal outcome. Returns false (and leaves all state
    /// untouched) when `gen` has been superseded by a newer `begin`, so a
    /// stale response can never overwrite a fresher search.
    pub fn finish(&mut self, gen: u64, outcome: Result<SearchResult, String>) -> bool {
        if gen != self.generation {
            return false;
        }
        match outcome {
            Ok(result) => {
                self.creators = result.creators;
                self.total = result.total;
                self.db_total = result.db_total;
                self.phase = SearchPhase::Succeeded;
            }
            Err(message) => {
                let message = message.trim().to_owned();
                self.error = Some(if message.is_empty() {
                    GENERIC_SEARCH_FAILURE.to_owned()
                } else {
                    message
                });
                self.phase = SearchPhase::Failed;
            }
        }
        true
    }
}

/// Owns the lifecycle of search operations against one API client.
pub struct SearchController {
    client: Arc<DiscoveryClient>,
    pub state: SearchState,
}

impl SearchController {
    pub fn new(client: Arc<DiscoveryClient>) -> Self {
        Self {
            client,
            state: SearchState::default(),
        }
    }

    /// Runs one search to completion, emitting progress and terminal events.
    ///
    /// Failures are recoverable: they land in [`SearchState::error`] and a
    /// [`ScoutEvent::SearchFailed`], never an `Err` — the caller can retry
    /// immediately. The ticker interval lives on this stack frame, so it is
    /// released on success, failure, and panic alike.
    pub async fn run(&mut self, params: SearchParams, event_tx: &UnboundedSender<ScoutEvent>) {
        let gen = self.state.begin();
        let deep = params.deep_search.unwrap_or(false);
        let _ = event_tx.send(ScoutEvent::SearchStarted { deep });

        let client = self.client.clone();
        let mut request = tokio::spawn(async move { client.search(&params).await });

        let start = tokio::time::Instant::now() + TICK_INTERVAL;
        let mut ticker = tokio::time::interval_at(start, TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                joined = &mut request => {
                    let outcome = match joined {
                        Ok(Ok(result)) => Ok(result),
                        Ok(Err(e)) => Err(e.message()),
                        // The task panicked before producing a result; treat
                        // it like any other failure.
                        Err(e) => Err(format!("search task failed: {e}")),
                    };
                    match outcome {
                        Ok(result) => {
                            if self.state.finish(gen, Ok(result.clone())) {
                                info!(total = result.total, "search succeeded");
                                let _ = event_tx.send(ScoutEvent::SearchCompleted {
                                    result: Box::new(result),
                                });
                            }
                        }
                        Err(message) => {
                            if self.state.finish(gen, Err(message)) {
                                let message = self
                                    .state
                                    .error
                                    .clone()
                                    .unwrap_or_else(|| GENERIC_SEARCH_FAILURE.to_owned());
                                warn!(%message, "search failed");
                                let _ = event_tx.send(ScoutEvent::SearchFailed { message });
                            }
                        }
                    }
                    break;
                }
                _ = ticker.tick() => {
                    self.state.tick(gen);
                    let _ = event_tx.send(ScoutEvent::SearchTick {
                        elapsed_secs: self.state.elapsed_secs,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_result() -> SearchResult {
        SearchResult {
            creators: Vec::new(),
            total: 3,
            db_total: 120,
            page: 0,
        }
    }

    #[test]
    fn begin_resets_elapsed_and_clears_error() {
        let mut state = SearchState::default();
        state.error = Some("old".into());
        state.elapsed_secs = 9;

        let gen = state.begin();
        assert_eq!(state.phase, SearchPhase::Running);
        assert_eq!(state.elapsed_secs, 0);
        assert_eq!(state.error, None);

        state.tick(gen);
        state.tick(gen);
        assert_eq!(state.elapsed_secs, 2);
    }

    #[test]
    fn ticks_stop_after_terminal_outcome() {
        let mut state = SearchState::default();
        let gen = state.begin();
        state.tick(gen);
        assert!(state.finish(gen, Ok(ok_result())));
        assert_eq!(state.phase, SearchPhase::Succeeded);

        // Late ticks from a stopped ticker must be inert.
        state.tick(gen);
        assert_eq!(state.elapsed_secs, 1);
    }

    #[test]
    fn success_stores_result_fields() {
        let mut state = SearchState::default();
        let gen = state.begin();
        assert!(state.finish(gen, Ok(ok_result())));
        assert_eq!(state.total, 3);
        assert_eq!(state.db_total, 120);
        assert_eq!(state.error, None);
    }

    #[test]
    fn failure_without_message_falls_back_to_generic() {
        let mut state = SearchState::default();
        let gen = state.begin();
        assert!(state.finish(gen, Err("  ".into())));
        assert_eq!(state.phase, SearchPhase::Failed);
        assert_eq!(state.error.as_deref(), Some(GENERIC_SEARCH_FAILURE));
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut state = SearchState::default();
        let stale = state.begin();
        let current = state.begin();

        // A response from the superseded search arrives late.
        assert!(!state.finish(stale, Err("stale failure".into())));
        assert_eq!(state.phase, SearchPhase::Running);
        assert_eq!(state.error, None);

        // Stale ticks are ignored too.
        state.tick(stale);
        assert_eq!(state.elapsed_secs, 0);

        assert!(state.finish(current, Ok(ok_result())));
        assert_eq!(state.phase, SearchPhase::Succeeded);
    }
}
