use super::results::{OneResult, SimResults};
use super::runner::TargetSearch;
use super::{CancelToken, ProgressCallback, SearchOptions, SearchOutcome};
use crate::accuracy::AccuracyModel;
use crate::error::{DartError, DsResult};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use strum_macros::Display;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum SearchState {
    Idle,
    Running,
    Complete,
    Cancelled,
}

/// Point-in-time view of a search, for whoever is presenting it.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSnapshot {
    pub state: SearchState,
    pub received: usize,
    pub total: usize,
    pub last_error: Option<String>,
    /// Best deduplicated results of the last completed run.
    pub best: Vec<OneResult>,
}

impl SearchSnapshot {
    /// Fraction of targets evaluated, 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        match self.state {
            SearchState::Complete => 1.0,
            _ if self.total == 0 => 0.0,
            _ => self.received as f64 / self.total as f64,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == SearchState::Running
    }

    pub fn is_complete(&self) -> bool {
        self.state == SearchState::Complete
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == SearchState::Cancelled
    }
}

#[derive(Debug)]
struct RunState {
    state: SearchState,
    received: usize,
    total: usize,
    last_error: Option<String>,
    failure: Option<DartError>,
    results: Option<SimResults>,
    best: Vec<OneResult>,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            state: SearchState::Idle,
            received: 0,
            total: 0,
            last_error: None,
            failure: None,
            results: None,
            best: Vec::new(),
        }
    }
}

type SharedState = Arc<Mutex<RunState>>;

fn lock(shared: &SharedState) -> MutexGuard<'_, RunState> {
    // The state is plain data, so a panicked holder cannot leave it torn
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

struct SharedProgress(SharedState);

impl ProgressCallback for SharedProgress {
    fn on_progress(&self, received: usize, total: usize) -> bool {
        let mut run = lock(&self.0);
        run.received = received;
        run.total = total;
        true
    }
}

/// Runs searches in the background and exposes their state.
///
/// `Idle -> Running -> Complete | Cancelled`, and back to `Running` on the
/// next start. A failed run returns to `Idle` with the cause kept in
/// `last_error`.
pub struct SearchCoordinator {
    options: SearchOptions,
    shared: SharedState,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
}

impl SearchCoordinator {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            shared: Arc::new(Mutex::new(RunState::default())),
            cancel: CancelToken::new(),
            handle: None,
        }
    }

    /// Starts a search on a background thread and returns immediately.
    pub fn start(&mut self, model: AccuracyModel, throw_count: u32) -> DsResult<()> {
        {
            let mut run = lock(&self.shared);
            if run.state == SearchState::Running {
                return Err(DartError::SearchAlreadyRunning);
            }
            *run = RunState {
                state: SearchState::Running,
                ..RunState::default()
            };
        }
        // The previous run has already published its outcome
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }

        self.cancel = CancelToken::new();
        let cancel = self.cancel.clone();
        let shared = Arc::clone(&self.shared);
        let search = TargetSearch::new(self.options.clone());
        let top = self.options.top;

        let handle = thread::Builder::new()
            .name("dartstrat-search".to_string())
            .spawn(move || {
                let progress = SharedProgress(Arc::clone(&shared));
                let outcome = search.run(model, throw_count, &cancel, &progress);
                publish(&shared, outcome, top);
            });

        match handle {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                let mut run = lock(&self.shared);
                run.state = SearchState::Idle;
                run.last_error = Some(e.to_string());
                Err(DartError::Io(e))
            }
        }
    }

    /// Asks the running search to stop. Safe to call at any time.
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            info!("🛑 Cancel requested");
        }
        self.cancel.cancel();
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        let run = lock(&self.shared);
        SearchSnapshot {
            state: run.state,
            received: run.received,
            total: run.total,
            last_error: run.last_error.clone(),
            best: run.best.clone(),
        }
    }

    /// The error that ended the last run, handed out once.
    pub fn take_error(&self) -> Option<DartError> {
        lock(&self.shared).failure.take()
    }

    /// Full results of the last completed run.
    pub fn results(&self) -> Option<SimResults> {
        lock(&self.shared).results.clone()
    }

    /// Blocks until the current run (if any) has finished.
    pub fn wait(&mut self) -> SearchSnapshot {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                let mut run = lock(&self.shared);
                run.state = SearchState::Idle;
                run.last_error = Some("Search thread panicked".to_string());
            }
        }
        self.snapshot()
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn publish(shared: &SharedState, outcome: DsResult<SearchOutcome>, top: usize) {
    let mut run = lock(shared);
    match outcome {
        Ok(SearchOutcome::Complete(results)) => {
            run.state = SearchState::Complete;
            run.received = results.len();
            run.total = results.len();
            run.best = results.best(top);
            run.results = Some(results);
        }
        Ok(SearchOutcome::Cancelled) => {
            run.state = SearchState::Cancelled;
        }
        Err(e) => {
            error!("❌ Search failed: {}", e);
            run.state = SearchState::Idle;
            run.last_error = Some(e.to_string());
            run.failure = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> SearchOptions {
        SearchOptions {
            workers: 2,
            radius_step: 0.25,
            angle_step: 45.0,
            seed: Some(1),
            top: 3,
        }
    }

    #[test]
    fn completes_and_publishes_best() {
        let mut coordinator = SearchCoordinator::new(options());
        assert_eq!(coordinator.snapshot().state, SearchState::Idle);

        coordinator.start(AccuracyModel::perfect(), 1).unwrap();
        let snap = coordinator.wait();
        assert!(snap.is_complete());
        assert_eq!(snap.progress(), 1.0);
        assert_eq!(snap.best.len(), 3);
        assert_eq!(snap.best[0].score, 50.0);
        assert_eq!(coordinator.results().unwrap().len(), 1 + 4 * 8);
    }

    #[test]
    fn failed_run_returns_to_idle() {
        let mut coordinator = SearchCoordinator::new(options());
        coordinator.start(AccuracyModel::perfect(), 0).unwrap();
        let snap = coordinator.wait();
        assert_eq!(snap.state, SearchState::Idle);
        assert!(snap.last_error.unwrap().contains("Throw count"));

        assert!(matches!(coordinator.take_error(), Some(DartError::Validation(_))));
        assert!(coordinator.take_error().is_none());
        // The message stays for whoever presents the state
        assert!(coordinator.snapshot().last_error.is_some());
    }

    #[test]
    fn can_restart_after_completion() {
        let mut coordinator = SearchCoordinator::new(options());
        coordinator.start(AccuracyModel::perfect(), 1).unwrap();
        coordinator.wait();
        coordinator.start(AccuracyModel::perfect(), 2).unwrap();
        assert!(coordinator.wait().is_complete());
    }

    #[test]
    fn cancel_when_idle_is_harmless() {
        let coordinator = SearchCoordinator::new(options());
        coordinator.cancel();
        coordinator.cancel();
        assert_eq!(coordinator.snapshot().state, SearchState::Idle);
    }
}
