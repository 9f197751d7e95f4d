use crate::error::{DartError, DsResult};
use crate::geometry::BoardPosition;

pub const DEFAULT_RADIUS_STEP: f64 = 0.02;
pub const DEFAULT_ANGLE_STEP: f64 = 0.5;

const NOISE_DECIMAL_PLACES_FACTOR: f64 = 10_000_000.0;

/// Smallest step that survives the rounding in [`add_without_noise`].
pub const MIN_STEP: f64 = 1.0 / NOISE_DECIMAL_PLACES_FACTOR;

/// Largest grid a supplier may describe. The search allocates channels of
/// this many slots up front.
pub const MAX_TARGETS: usize = 2_000_000;

/// Adds two numbers and rounds to 7 decimal places, so repeated stepping
/// gives 0.2 rather than 0.19999999999999998 and the step count stays exact.
pub fn add_without_noise(a: f64, b: f64) -> f64 {
    ((a + b) * NOISE_DECIMAL_PLACES_FACTOR).round() / NOISE_DECIMAL_PLACES_FACTOR
}

/// Supplies candidate aim points covering the scoring area.
///
/// Each target is yielded once per pass. The order is not part of the
/// contract.
pub trait TargetSupplier {
    fn has_next(&self) -> bool;
    fn next_target(&mut self) -> Option<BoardPosition>;
    /// Exact number of targets a full pass yields.
    fn forecast_count(&self) -> usize;
    /// Rewinds to the first target.
    fn restart(&mut self);
}

/// Walks outward from the centre in rings: one point at the centre, then for
/// each radius every angle step around the circle.
#[derive(Debug, Clone)]
pub struct CircularTargetSupplier {
    next_radius: f64,
    next_angle: f64,
    radius_step: f64,
    angle_step: f64,
}

impl CircularTargetSupplier {
    pub fn new(radius_step: f64, angle_step: f64) -> DsResult<Self> {
        for (name, step) in [("radius", radius_step), ("angle", angle_step)] {
            if !step.is_finite() || step <= 0.0 {
                return Err(DartError::Validation(format!(
                    "{} step must be positive, got {}",
                    name, step
                )));
            }
            if step < MIN_STEP {
                return Err(DartError::Validation(format!(
                    "{} step must be at least {}, got {}",
                    name, MIN_STEP, step
                )));
            }
        }

        // Checked before any walk, the exact count below loops once per ring
        let estimate = (1.0 / radius_step).ceil() * (360.0 / angle_step).ceil();
        if estimate > MAX_TARGETS as f64 {
            return Err(DartError::Validation(format!(
                "A {} x {} grid has about {} targets, the limit is {}",
                radius_step, angle_step, estimate, MAX_TARGETS
            )));
        }

        Ok(Self {
            next_radius: 0.0,
            next_angle: 0.0,
            radius_step,
            angle_step,
        })
    }

    pub fn radius_step(&self) -> f64 {
        self.radius_step
    }

    pub fn angle_step(&self) -> f64 {
        self.angle_step
    }

    /// Non-zero radii visited, counted with the same rounded stepping as
    /// the walk itself.
    fn ring_count(&self) -> usize {
        let mut radius = add_without_noise(0.0, self.radius_step);
        let mut rings = 0;
        while radius <= 1.0 {
            rings += 1;
            radius = add_without_noise(radius, self.radius_step);
        }
        rings
    }

    fn angles_per_ring(&self) -> usize {
        let mut angle = 0.0;
        let mut count = 0;
        while angle < 360.0 {
            count += 1;
            angle = add_without_noise(angle, self.angle_step);
        }
        count
    }
}

impl Default for CircularTargetSupplier {
    fn default() -> Self {
        Self {
            next_radius: 0.0,
            next_angle: 0.0,
            radius_step: DEFAULT_RADIUS_STEP,
            angle_step: DEFAULT_ANGLE_STEP,
        }
    }
}

impl TargetSupplier for CircularTargetSupplier {
    fn has_next(&self) -> bool {
        self.next_radius <= 1.0
    }

    fn next_target(&mut self) -> Option<BoardPosition> {
        if !self.has_next() {
            return None;
        }
        let result = BoardPosition::from_polar(self.next_radius, self.next_angle);

        // Rotating at the exact centre is meaningless, go straight to the next ring
        if self.next_radius == 0.0 {
            self.next_radius = add_without_noise(self.next_radius, self.radius_step);
        } else {
            self.next_angle = add_without_noise(self.next_angle, self.angle_step);
            if self.next_angle >= 360.0 {
                self.next_angle = 0.0;
                self.next_radius = add_without_noise(self.next_radius, self.radius_step);
            }
        }
        Some(result)
    }

    fn forecast_count(&self) -> usize {
        1 + self.ring_count() * self.angles_per_ring()
    }

    fn restart(&mut self) {
        self.next_radius = 0.0;
        self.next_angle = 0.0;
    }
}

impl Iterator for CircularTargetSupplier {
    type Item = BoardPosition;

    fn next(&mut self) -> Option<BoardPosition> {
        self.next_target()
    }
}
