use crate::error::DsResult;
use crate::geometry::{resolve, BoardPosition};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;

/// A target tried by the search and its average score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OneResult {
    pub position: BoardPosition,
    pub score: f64,
}

/// Average score per target for one search run.
#[derive(Debug, Clone, Default)]
pub struct SimResults {
    results: HashMap<BoardPosition, f64>,
}

impl SimResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts or overwrites the score for `target`.
    pub fn record(&mut self, target: BoardPosition, average_score: f64) {
        self.results.insert(target, average_score);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, target: &BoardPosition) -> Option<f64> {
        self.results.get(target).copied()
    }

    /// Results in no particular order.
    pub fn results(&self) -> Vec<OneResult> {
        self.results
            .iter()
            .map(|(&position, &score)| OneResult { position, score })
            .collect()
    }

    /// Highest average first. Equal scores are ordered by radius, then
    /// angle, so the order never depends on map iteration.
    pub fn sorted_descending(&self) -> Vec<OneResult> {
        let mut sorted = self.results();
        sorted.sort_unstable_by(compare_best_first);
        sorted
    }

    /// The best `n` targets, one per named board area.
    pub fn best(&self, n: usize) -> Vec<OneResult> {
        let mut best = dedupe_by_label(&self.sorted_descending());
        best.truncate(n);
        best
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> DsResult<()> {
        write_results_csv(&self.sorted_descending(), writer)
    }

    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> DsResult<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}

fn compare_best_first(a: &OneResult, b: &OneResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(a.position.radius.total_cmp(&b.position.radius))
        .then(a.position.angle.total_cmp(&b.position.angle))
}

/// Keeps the first result for each board area label ("Treble 20",
/// "Double 3", ...). Feed it sorted results to keep the best of each.
pub fn dedupe_by_label(results: &[OneResult]) -> Vec<OneResult> {
    let mut seen = HashSet::new();
    results
        .iter()
        .filter(|r| seen.insert(resolve(r.position).label))
        .copied()
        .collect()
}

#[derive(Serialize)]
struct CsvRow<'a> {
    radius: f64,
    angle: f64,
    label: &'a str,
    score: f64,
}

pub fn write_results_csv<W: Write>(results: &[OneResult], writer: W) -> DsResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in results {
        let outcome = resolve(r.position);
        wtr.serialize(CsvRow {
            radius: r.position.radius,
            angle: r.position.angle,
            label: &outcome.label,
            score: r.score,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
