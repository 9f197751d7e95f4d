use crate::accuracy::AccuracyModel;
use crate::error::{DartError, DsResult};
use crate::geometry::{resolve, BoardFrame, BoardPosition, PixelPoint, ScoringOutcome};
use rand::Rng;
use serde::Serialize;

/// Throws `throw_count` darts at `target` and returns the mean score.
pub fn average_score<R: Rng + ?Sized>(
    target: BoardPosition,
    model: &AccuracyModel,
    throw_count: u32,
    rng: &mut R,
) -> DsResult<f64> {
    if throw_count == 0 {
        return Err(DartError::Validation(
            "Throw count must be at least 1".to_string(),
        ));
    }

    let mut total: u64 = 0;
    for _ in 0..throw_count {
        let hit = model.throw(target, rng)?;
        total += u64::from(resolve(hit).score);
    }
    Ok(total as f64 / f64::from(throw_count))
}

/// Where one interactive throw landed and what it scored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThrowReport {
    pub target: BoardPosition,
    pub landing: BoardPosition,
    pub landing_pixel: PixelPoint,
    pub outcome: ScoringOutcome,
}

pub fn single_throw<R: Rng + ?Sized>(
    target: BoardPosition,
    model: &AccuracyModel,
    frame: &BoardFrame,
    rng: &mut R,
) -> DsResult<ThrowReport> {
    let landing = model.throw(target, rng)?;
    Ok(ThrowReport {
        target,
        landing,
        landing_pixel: frame.to_pixel(landing),
        outcome: resolve(landing),
    })
}

/// Running total over a series of interactive throws.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThrowTally {
    pub count: u32,
    pub total: u64,
}

impl ThrowTally {
    pub fn add(&mut self, report: &ThrowReport) {
        self.count += 1;
        self.total += u64::from(report.outcome.score);
    }

    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total as f64 / f64::from(self.count))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
