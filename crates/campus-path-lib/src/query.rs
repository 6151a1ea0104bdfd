//! Path query coordination
//!
//! The `QueryCoordinator` turns a (source, target) pair into a request against the
//! path service and owns the resulting `QueryState`.
//!
//! # Lifecycle
//!
//! 1. [`QueryCoordinator::observe`] (auto-fire on a changed, complete pair) or
//!    [`QueryCoordinator::submit`] (explicit request) calls `begin`: `loading` is set,
//!    `error` cleared and a [`QueryTicket`] with a fresh sequence number is issued.
//! 2. The request runs on the tokio runtime; its [`QueryOutcome`] is sent back over a
//!    channel and the optional [`Notifier`] is invoked.
//! 3. The owner drains outcomes with [`QueryCoordinator::poll`] (or awaits one with
//!    [`QueryCoordinator::settle_next`]); each outcome is applied in arrival order.
//!
//! Requests are never cancelled. With [`StaleResponsePolicy::ApplyAll`] a response that
//! settles after a newer request was issued still overwrites `result`/`error`, so the
//! last response to arrive wins even if it belongs to an older pair.

use crate::error::RequestError;
use crate::location::LatLon;
use crate::runtime;
use crate::selection::SelectionPair;
use crate::service::PathService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Shortest path returned by the service, ordered from source to target
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// Total length in meters
    #[serde(rename = "distance")]
    pub distance_meters: f64,
    pub coords: Vec<LatLon>,
}

impl PathResult {
    /// Distance line shown in the success banner
    pub fn distance_label(&self) -> String {
        format!("Total distance: {:.2} meters", self.distance_meters)
    }
}

/// What to do with responses that settle after a newer query was issued
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaleResponsePolicy {
    /// Every response is applied in arrival order (last to settle wins)
    #[default]
    ApplyAll,
    /// Only the response to the most recently issued query is applied
    DiscardStale,
}

/// Observable state of path queries
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryState {
    loading: bool,
    error: Option<String>,
    result: Option<Arc<PathResult>>,
}

impl QueryState {
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Most recent error banner text, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last successful result; kept when a later query fails
    pub fn result(&self) -> Option<&Arc<PathResult>> {
        self.result.as_ref()
    }
}

/// An issued query
#[derive(Clone, Debug, PartialEq)]
pub struct QueryTicket {
    pub seq: u64,
    /// Identifiers as sent, already trimmed
    pub pair: SelectionPair,
}

/// A settled query
#[derive(Clone, Debug, PartialEq)]
pub struct QueryOutcome {
    pub seq: u64,
    pub pair: SelectionPair,
    pub result: Result<PathResult, RequestError>,
}

/// Callback invoked whenever an outcome is ready to be polled (e.g. to request a repaint)
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

/// Owner of the `QueryState`
pub struct QueryCoordinator<S: PathService> {
    service: Arc<S>,
    state: QueryState,
    policy: StaleResponsePolicy,
    /// Last pair seen by `observe`, used to only fire on changes
    last_observed: SelectionPair,
    next_seq: u64,
    in_flight: usize,
    outcome_tx: mpsc::UnboundedSender<QueryOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<QueryOutcome>,
    notifier: Option<Notifier>,
}

impl<S: PathService> QueryCoordinator<S> {
    pub fn new(service: Arc<S>, policy: StaleResponsePolicy) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            service,
            state: QueryState::default(),
            policy,
            last_observed: SelectionPair::default(),
            next_seq: 1,
            in_flight: 0,
            outcome_tx,
            outcome_rx,
            notifier: None,
        }
    }

    /// Register a callback run (from the request task) every time an outcome is queued
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Number of requests issued but not yet settled
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Sequence number of the most recently issued query (0 if none)
    pub fn latest_seq(&self) -> u64 {
        self.next_seq - 1
    }

    /// Auto-fire entry point, fed with the selection pair after every transition.
    ///
    /// Fires when the pair differs from the previously observed one and both
    /// identifiers are non-empty. Observing an unchanged pair never refires.
    /// Returns the sequence number of the issued query.
    pub fn observe(&mut self, pair: &SelectionPair) -> Option<u64> {
        if *pair == self.last_observed {
            return None;
        }
        self.last_observed = pair.clone();
        self.fire(pair)
    }

    /// Explicit request, e.g. from a "Find Path" button.
    ///
    /// Same procedure as auto-fire, skipped while a query is still loading.
    pub fn submit(&mut self, pair: &SelectionPair) -> Option<u64> {
        if self.state.loading {
            tracing::debug!("Submit ignored, a query is still loading");
            return None;
        }
        self.fire(pair)
    }

    fn fire(&mut self, pair: &SelectionPair) -> Option<u64> {
        let ticket = self.begin(pair)?;
        let seq = ticket.seq;
        self.dispatch(ticket);
        Some(seq)
    }

    /// Enter the loading state and issue a ticket; `None` if the pair is incomplete.
    ///
    /// An incomplete pair is not an error: nothing is shown and `loading` is untouched.
    fn begin(&mut self, pair: &SelectionPair) -> Option<QueryTicket> {
        if !pair.is_complete() {
            return None;
        }

        let ticket = QueryTicket {
            seq: self.next_seq,
            pair: pair.trimmed(),
        };
        self.next_seq += 1;
        self.in_flight += 1;
        self.state.loading = true;
        self.state.error = None;

        tracing::info!(
            "Query #{}: shortest path {} -> {}",
            ticket.seq,
            ticket.pair.source,
            ticket.pair.target
        );
        Some(ticket)
    }

    fn dispatch(&self, ticket: QueryTicket) {
        let service = Arc::clone(&self.service);
        let outcome_tx = self.outcome_tx.clone();
        let notifier = self.notifier.clone();

        runtime::spawn(async move {
            let result = service
                .shortest_path(&ticket.pair.source, &ticket.pair.target)
                .await;
            let outcome = QueryOutcome {
                seq: ticket.seq,
                pair: ticket.pair,
                result,
            };
            // The receiver lives in the coordinator; if it is gone nobody cares anymore
            if outcome_tx.send(outcome).is_ok()
                && let Some(notify) = notifier
            {
                notify();
            }
        });
    }

    /// Apply every outcome that has arrived so far, in arrival order.
    ///
    /// Returns the number of outcomes taken off the queue.
    pub fn poll(&mut self) -> usize {
        let mut count = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.settle(outcome);
            count += 1;
        }
        count
    }

    /// Wait for the next outcome and apply it; returns its sequence number
    pub async fn settle_next(&mut self) -> Option<u64> {
        let outcome = self.outcome_rx.recv().await?;
        let seq = outcome.seq;
        self.settle(outcome);
        Some(seq)
    }

    /// Apply one outcome; returns `false` if it was discarded as stale
    fn settle(&mut self, outcome: QueryOutcome) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.policy == StaleResponsePolicy::DiscardStale && outcome.seq != self.latest_seq() {
            tracing::debug!(
                "Discarding stale response #{} (latest is #{})",
                outcome.seq,
                self.latest_seq()
            );
            return false;
        }

        match outcome.result {
            Ok(result) => {
                tracing::debug!(
                    "Query #{} settled: {} points, {:.2} m",
                    outcome.seq,
                    result.coords.len(),
                    result.distance_meters
                );
                self.state.result = Some(Arc::new(result));
                self.state.error = None;
            }
            Err(err) => {
                tracing::warn!(
                    "Query #{} ({} -> {}) failed: {err:?}",
                    outcome.seq,
                    outcome.pair.source,
                    outcome.pair.target
                );
                self.state.error = Some(err.to_string());
            }
        }
        self.state.loading = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Canned path service; targets listed in `gates` block until their gate is opened
    #[derive(Default)]
    struct MockService {
        responses: HashMap<String, Result<PathResult, RequestError>>,
        gates: HashMap<String, Arc<Notify>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MockService {
        fn respond(mut self, target: &str, result: Result<PathResult, RequestError>) -> Self {
            self.responses.insert(target.to_string(), result);
            self
        }

        fn gate(mut self, target: &str) -> (Self, Arc<Notify>) {
            let notify = Arc::new(Notify::new());
            self.gates.insert(target.to_string(), Arc::clone(&notify));
            (self, notify)
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PathService for MockService {
        async fn nodes(&self) -> Result<Vec<Location>, RequestError> {
            Ok(Vec::new())
        }

        async fn shortest_path(
            &self,
            source: &str,
            target: &str,
        ) -> Result<PathResult, RequestError> {
            self.calls
                .lock()
                .unwrap()
                .push((source.to_string(), target.to_string()));
            if let Some(gate) = self.gates.get(target) {
                gate.notified().await;
            }
            self.responses
                .get(target)
                .cloned()
                .unwrap_or_else(|| Err(RequestError::Http { status: 404 }))
        }
    }

    fn path(distance_meters: f64, points: usize) -> PathResult {
        PathResult {
            distance_meters,
            coords: (0..points)
                .map(|i| LatLon::new(i as f64, i as f64))
                .collect(),
        }
    }

    fn coordinator(service: MockService, policy: StaleResponsePolicy) -> QueryCoordinator<MockService> {
        QueryCoordinator::new(Arc::new(service), policy)
    }

    #[tokio::test]
    async fn test_success_sets_result_and_clears_loading() {
        let service = MockService::default().respond("2", Ok(path(123.45, 2)));
        let mut coordinator = coordinator(service, StaleResponsePolicy::ApplyAll);

        let seq = coordinator.observe(&SelectionPair::new("1", "2"));
        assert_eq!(seq, Some(1));
        assert!(coordinator.state().loading());
        assert_eq!(coordinator.in_flight(), 1);

        assert_eq!(coordinator.settle_next().await, Some(1));
        let state = coordinator.state();
        assert!(!state.loading());
        assert_eq!(state.error(), None);
        let result = state.result().unwrap();
        assert_eq!(result.distance_label(), "Total distance: 123.45 meters");
        assert_eq!(result.coords.len(), 2);
        assert_eq!(coordinator.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_incomplete_pair_is_silently_ignored() {
        let mut coordinator = coordinator(MockService::default(), StaleResponsePolicy::ApplyAll);

        assert_eq!(coordinator.observe(&SelectionPair::new("1", "")), None);
        assert_eq!(coordinator.submit(&SelectionPair::new("", "2")), None);
        assert!(!coordinator.state().loading());
        assert_eq!(coordinator.state().error(), None);
        assert_eq!(coordinator.latest_seq(), 0);
    }

    #[tokio::test]
    async fn test_unchanged_pair_does_not_refire() {
        let service = MockService::default().respond("B", Ok(path(10.0, 3)));
        let mut coordinator = coordinator(service, StaleResponsePolicy::ApplyAll);
        let pair = SelectionPair::new("A", "B");

        assert!(coordinator.observe(&pair).is_some());
        assert!(coordinator.observe(&pair).is_none());
        coordinator.settle_next().await;
        assert!(coordinator.observe(&pair).is_none());
        assert_eq!(coordinator.latest_seq(), 1);

        // Leaving and re-entering the complete pair fires again
        assert!(coordinator.observe(&SelectionPair::new("A", "")).is_none());
        assert_eq!(coordinator.observe(&pair), Some(2));
        coordinator.settle_next().await;
        assert_eq!(coordinator.service.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_identifiers_are_trimmed() {
        let service = MockService::default().respond("2", Ok(path(1.0, 2)));
        let mut coordinator = coordinator(service, StaleResponsePolicy::ApplyAll);

        coordinator.submit(&SelectionPair::new(" 1 ", "2 "));
        coordinator.settle_next().await;
        assert_eq!(
            coordinator.service.calls(),
            vec![("1".to_string(), "2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_error_keeps_previous_result() {
        let service = MockService::default()
            .respond("2", Ok(path(50.0, 4)))
            .respond(
                "3",
                Err(RequestError::Service("No path found".to_string())),
            );
        let mut coordinator = coordinator(service, StaleResponsePolicy::ApplyAll);

        coordinator.submit(&SelectionPair::new("1", "2"));
        coordinator.settle_next().await;
        coordinator.submit(&SelectionPair::new("1", "3"));
        assert_eq!(coordinator.state().error(), None);
        coordinator.settle_next().await;

        let state = coordinator.state();
        assert!(!state.loading());
        assert_eq!(state.error(), Some("No path found"));
        assert_eq!(state.result().unwrap().distance_meters, 50.0);

        // A new attempt clears the banner again
        coordinator.submit(&SelectionPair::new("1", "2"));
        assert_eq!(coordinator.state().error(), None);
        coordinator.settle_next().await;
        assert_eq!(coordinator.state().error(), None);
    }

    #[tokio::test]
    async fn test_transport_failure_ends_loading() {
        let service = MockService::default().respond(
            "2",
            Err(RequestError::Transport("connection refused".to_string())),
        );
        let mut coordinator = coordinator(service, StaleResponsePolicy::ApplyAll);

        coordinator.submit(&SelectionPair::new("1", "2"));
        coordinator.settle_next().await;
        assert!(!coordinator.state().loading());
        assert_eq!(coordinator.state().error(), Some(crate::NO_RESPONSE_MESSAGE));
    }

    #[tokio::test]
    async fn test_submit_skipped_while_loading() {
        let (service, gate) = MockService::default()
            .respond("slow", Ok(path(1.0, 2)))
            .gate("slow");
        let mut coordinator = coordinator(service, StaleResponsePolicy::ApplyAll);

        assert!(coordinator.submit(&SelectionPair::new("1", "slow")).is_some());
        assert!(coordinator.submit(&SelectionPair::new("1", "slow")).is_none());

        gate.notify_one();
        coordinator.settle_next().await;
        assert!(coordinator.submit(&SelectionPair::new("1", "slow")).is_some());
    }

    #[tokio::test]
    async fn test_stale_response_overwrites_with_apply_all() {
        let (service, gate) = MockService::default()
            .respond("slow", Ok(path(999.0, 7)))
            .respond("fast", Ok(path(1.0, 2)))
            .gate("slow");
        let mut coordinator = coordinator(service, StaleResponsePolicy::ApplyAll);

        assert_eq!(coordinator.observe(&SelectionPair::new("A", "slow")), Some(1));
        assert_eq!(coordinator.observe(&SelectionPair::new("A", "fast")), Some(2));

        assert_eq!(coordinator.settle_next().await, Some(2));
        assert_eq!(coordinator.state().result().unwrap().distance_meters, 1.0);
        // The first settle already cleared loading although #1 is still running
        assert!(!coordinator.state().loading());

        gate.notify_one();
        assert_eq!(coordinator.settle_next().await, Some(1));
        // Last to settle wins, even though it belongs to the older pair
        assert_eq!(coordinator.state().result().unwrap().distance_meters, 999.0);
    }

    #[tokio::test]
    async fn test_stale_response_dropped_with_discard_stale() {
        let (service, gate) = MockService::default()
            .respond(
                "slow",
                Err(RequestError::Service("too late".to_string())),
            )
            .respond("fast", Ok(path(1.0, 2)))
            .gate("slow");
        let mut coordinator = coordinator(service, StaleResponsePolicy::DiscardStale);

        coordinator.observe(&SelectionPair::new("A", "slow"));
        coordinator.observe(&SelectionPair::new("A", "fast"));

        assert_eq!(coordinator.settle_next().await, Some(2));
        assert!(!coordinator.state().loading());

        gate.notify_one();
        assert_eq!(coordinator.settle_next().await, Some(1));
        let state = coordinator.state();
        assert_eq!(state.error(), None);
        assert_eq!(state.result().unwrap().distance_meters, 1.0);
        assert_eq!(coordinator.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_discard_stale_keeps_loading_until_latest_settles() {
        let (service, gate) = MockService::default()
            .respond("first", Ok(path(5.0, 2)))
            .respond("second", Ok(path(6.0, 2)))
            .gate("second");
        let mut coordinator = coordinator(service, StaleResponsePolicy::DiscardStale);

        coordinator.observe(&SelectionPair::new("A", "first"));
        coordinator.observe(&SelectionPair::new("A", "second"));

        assert_eq!(coordinator.settle_next().await, Some(1));
        assert!(coordinator.state().loading());
        assert!(coordinator.state().result().is_none());

        gate.notify_one();
        coordinator.settle_next().await;
        assert!(!coordinator.state().loading());
        assert_eq!(coordinator.state().result().unwrap().distance_meters, 6.0);
    }

    #[tokio::test]
    async fn test_notifier_runs_and_poll_drains() {
        let service = MockService::default().respond("2", Ok(path(3.0, 2)));
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();
        let done_tx = Mutex::new(Some(done_tx));

        let mut coordinator = coordinator(service, StaleResponsePolicy::ApplyAll).with_notifier(
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                if let Some(tx) = done_tx.lock().unwrap().take() {
                    let _ = tx.send(());
                }
            }),
        );

        assert_eq!(coordinator.poll(), 0);
        coordinator.observe(&SelectionPair::new("1", "2"));
        done_rx.await.unwrap();

        assert_eq!(notified.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.poll(), 1);
        assert!(!coordinator.state().loading());
        assert_eq!(coordinator.state().result().unwrap().distance_meters, 3.0);
    }

    #[test]
    fn test_path_result_wire_format() {
        let json = r#"{"coords": [{"lat": 43.47, "lon": -80.54}], "distance": 0.0}"#;
        let result: PathResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.coords, vec![LatLon::new(43.47, -80.54)]);
        assert_eq!(result.distance_label(), "Total distance: 0.00 meters");
    }
}
