pub mod coordinator;
pub mod evaluator;
pub mod results;
pub mod runner;
pub mod supplier;

pub use self::coordinator::{SearchCoordinator, SearchSnapshot, SearchState};
pub use self::evaluator::{average_score, single_throw, ThrowReport, ThrowTally};
pub use self::results::{dedupe_by_label, OneResult, SimResults};
pub use self::runner::TargetSearch;
pub use self::supplier::{CircularTargetSupplier, TargetSupplier};

use crate::config::Config;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_THROW_COUNT: u32 = 5000;
pub const DEFAULT_TOP_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub workers: usize,
    pub radius_step: f64,
    pub angle_step: f64,
    /// Base seed for the worker RNGs; worker `i` uses `seed + i`.
    /// A random base is drawn (and logged) when unset.
    pub seed: Option<u64>,
    /// How many deduplicated results a coordinator snapshot carries.
    pub top: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            radius_step: supplier::DEFAULT_RADIUS_STEP,
            angle_step: supplier::DEFAULT_ANGLE_STEP,
            seed: None,
            top: DEFAULT_TOP_RESULTS,
        }
    }
}

impl From<&Config> for SearchOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            workers: cfg.search.workers,
            radius_step: cfg.search.radius_step,
            angle_step: cfg.search.angle_step,
            seed: cfg.search.seed,
            top: cfg.search.top,
        }
    }
}

/// Receives updates while a search runs.
/// Returning false asks the search to stop.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, received: usize, total: usize) -> bool;
}

impl<F> ProgressCallback for F
where
    F: Fn(usize, usize) -> bool + Send + Sync,
{
    fn on_progress(&self, received: usize, total: usize) -> bool {
        self(received, total)
    }
}

/// RNG for stream `offset` of a run: `seed + offset` when seeded, fresh
/// randomness otherwise.
pub fn seeded_rng(seed: Option<u64>, offset: u64) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s.wrapping_add(offset)),
        None => StdRng::seed_from_u64(rand::rng().random()),
    }
}

/// Shared stop flag for one search run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Complete(SimResults),
    /// Stopped before every target was evaluated. Partial results are
    /// dropped.
    Cancelled,
}

impl SearchOutcome {
    pub fn results(&self) -> Option<&SimResults> {
        match self {
            Self::Complete(results) => Some(results),
            Self::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
