use super::evaluator::average_score;
use super::results::SimResults;
use super::supplier::{CircularTargetSupplier, TargetSupplier};
use super::{CancelToken, ProgressCallback, SearchOptions, SearchOutcome};
use crate::accuracy::AccuracyModel;
use crate::error::{DartError, DsResult};
use crate::geometry::BoardPosition;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError, SyncSender};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How often the collecting loop wakes up to look at the cancel flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

type WorkerResult = DsResult<(BoardPosition, f64)>;

/// Exhaustive grid search over the board.
///
/// One producer thread feeds every grid target into a bounded channel, a
/// fixed pool of workers evaluates them, and the calling thread collects the
/// averages. Both channels hold a full grid, so no send ever blocks.
pub struct TargetSearch {
    options: SearchOptions,
}

impl TargetSearch {
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    /// Number of targets a run will evaluate.
    pub fn target_count(&self) -> DsResult<usize> {
        Ok(self.supplier()?.forecast_count())
    }

    fn supplier(&self) -> DsResult<CircularTargetSupplier> {
        CircularTargetSupplier::new(self.options.radius_step, self.options.angle_step)
    }

    /// Blocks until every target is evaluated, the run is cancelled, or a
    /// worker fails.
    pub fn run<CB: ProgressCallback + ?Sized>(
        &self,
        model: AccuracyModel,
        throw_count: u32,
        cancel: &CancelToken,
        callback: &CB,
    ) -> DsResult<SearchOutcome> {
        let opts = &self.options;
        if throw_count == 0 {
            return Err(DartError::Validation(
                "Throw count must be at least 1".to_string(),
            ));
        }
        if opts.workers == 0 {
            return Err(DartError::Validation(
                "At least one worker is required".to_string(),
            ));
        }

        let supplier = self.supplier()?;
        let total = supplier.forecast_count();
        let base_seed = opts.seed.unwrap_or_else(|| rand::rng().random());

        info!(
            "🎯 Searching {} targets with {} workers ({} throws each, model {}, seed {})",
            total, opts.workers, throw_count, model, base_seed
        );
        let start = Instant::now();

        let (target_tx, target_rx) = sync_channel::<BoardPosition>(total);
        let (result_tx, result_rx) = sync_channel::<WorkerResult>(total);
        let target_rx = Mutex::new(target_rx);

        let outcome = thread::scope(|s| {
            s.spawn(move || produce(supplier, target_tx, cancel));

            for index in 0..opts.workers {
                let worker = Worker {
                    index,
                    model,
                    throw_count,
                    seed: base_seed.wrapping_add(index as u64),
                };
                let targets = &target_rx;
                let results = result_tx.clone();
                s.spawn(move || worker.run(targets, results, cancel));
            }
            // The result channel closes once the last worker drops its clone
            drop(result_tx);

            collect(result_rx, total, cancel, callback)
        })?;

        match &outcome {
            SearchOutcome::Complete(results) => info!(
                "✅ Search complete: {} targets in {:.2}s",
                results.len(),
                start.elapsed().as_secs_f32()
            ),
            SearchOutcome::Cancelled => warn!(
                "🛑 Search cancelled after {:.2}s",
                start.elapsed().as_secs_f32()
            ),
        }
        Ok(outcome)
    }
}

fn produce(
    mut supplier: CircularTargetSupplier,
    targets: SyncSender<BoardPosition>,
    cancel: &CancelToken,
) {
    while let Some(target) = supplier.next_target() {
        if cancel.is_cancelled() || targets.send(target).is_err() {
            break;
        }
    }
}

struct Worker {
    index: usize,
    model: AccuracyModel,
    throw_count: u32,
    seed: u64,
}

impl Worker {
    fn run(
        self,
        targets: &Mutex<Receiver<BoardPosition>>,
        results: SyncSender<WorkerResult>,
        cancel: &CancelToken,
    ) {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut evaluated = 0usize;

        while !cancel.is_cancelled() {
            let next = targets
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .recv();
            let Ok(target) = next else {
                break;
            };

            let result = average_score(target, &self.model, self.throw_count, &mut rng)
                .map(|avg| (target, avg));
            let failed = result.is_err();
            if results.send(result).is_err() || failed {
                break;
            }
            evaluated += 1;
        }

        debug!(worker = self.index, seed = self.seed, evaluated, "Worker finished");
    }
}

fn collect<CB: ProgressCallback + ?Sized>(
    results: Receiver<WorkerResult>,
    total: usize,
    cancel: &CancelToken,
    callback: &CB,
) -> DsResult<SearchOutcome> {
    let mut sim = SimResults::with_capacity(total);
    let mut received = 0;

    while !cancel.is_cancelled() {
        match results.recv_timeout(POLL_INTERVAL) {
            Ok(Ok((target, avg))) => {
                sim.record(target, avg);
                received += 1;
                if !callback.on_progress(received, total) {
                    cancel.cancel();
                }
            }
            Ok(Err(e)) => {
                cancel.cancel();
                warn!("❌ Worker failed, aborting search: {}", e);
                return Err(DartError::SearchAborted(Box::new(e)));
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    if cancel.is_cancelled() {
        return Ok(SearchOutcome::Cancelled);
    }
    Ok(SearchOutcome::Complete(sim))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coarse(workers: usize) -> TargetSearch {
        TargetSearch::new(SearchOptions {
            workers,
            radius_step: 0.1,
            angle_step: 10.0,
            seed: Some(7),
            ..Default::default()
        })
    }

    fn never_stop(_: usize, _: usize) -> bool {
        true
    }

    #[test]
    fn evaluates_every_target() {
        let search = coarse(3);
        let outcome = search
            .run(AccuracyModel::perfect(), 1, &CancelToken::new(), &never_stop)
            .unwrap();
        let results = outcome.results().unwrap();
        assert_eq!(results.len(), search.target_count().unwrap());
        assert_eq!(results.get(&BoardPosition::CENTRE), Some(50.0));
    }

    #[test]
    fn progress_reaches_total() {
        let search = coarse(2);
        let last = Mutex::new((0, 0));
        let track = |received: usize, total: usize| {
            *last.lock().unwrap() = (received, total);
            true
        };
        search
            .run(AccuracyModel::perfect(), 1, &CancelToken::new(), &track)
            .unwrap();
        let (received, total) = *last.lock().unwrap();
        assert_eq!(received, total);
        assert_eq!(total, 1 + 10 * 36);
    }

    #[test]
    fn callback_can_stop_the_run() {
        let search = coarse(2);
        let stop_early = |received: usize, _: usize| received < 5;
        let outcome = search
            .run(AccuracyModel::perfect(), 1, &CancelToken::new(), &stop_early)
            .unwrap();
        assert!(outcome.is_cancelled());
    }

    #[test]
    fn pre_cancelled_run_yields_nothing() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = coarse(2)
            .run(AccuracyModel::perfect(), 1, &cancel, &never_stop)
            .unwrap();
        assert!(outcome.is_cancelled());
    }

    #[test]
    fn worker_error_aborts_and_cancels() {
        let (tx, rx) = sync_channel::<WorkerResult>(4);
        tx.send(Ok((BoardPosition::CENTRE, 50.0))).unwrap();
        tx.send(Err(DartError::InvalidLanding {
            radius: f64::NAN,
            angle: 0.0,
        }))
        .unwrap();

        let cancel = CancelToken::new();
        let err = collect(rx, 10, &cancel, &never_stop).unwrap_err();
        match err {
            DartError::SearchAborted(cause) => {
                assert!(matches!(*cause, DartError::InvalidLanding { .. }))
            }
            other => panic!("expected an aborted search, got {:?}", other),
        }
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn rejects_zero_workers_and_throws() {
        let cancel = CancelToken::new();
        assert!(coarse(0).run(AccuracyModel::perfect(), 1, &cancel, &never_stop).is_err());
        assert!(coarse(1).run(AccuracyModel::perfect(), 0, &cancel, &never_stop).is_err());
    }
}
