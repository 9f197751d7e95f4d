pub mod calibration;

use crate::error::{DartError, DsResult};
use crate::geometry::BoardPosition;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Perfect,
    Uniform,
    Normal,
}

/// Gaussian spread around the aim point, normalized to the scoring radius.
#[derive(Debug, Clone, Copy)]
pub struct NormalSpread {
    standard_deviation: f64,
    distribution: Normal<f64>,
}

impl NormalSpread {
    fn new(standard_deviation: f64) -> DsResult<Self> {
        if !(0.0..=1.0).contains(&standard_deviation) {
            return Err(DartError::Validation(format!(
                "Standard deviation must be within 0..=1, got {}",
                standard_deviation
            )));
        }
        let distribution = Normal::new(0.0, standard_deviation)
            .map_err(|e| DartError::Validation(format!("Normal distribution: {}", e)))?;
        Ok(Self {
            standard_deviation,
            distribution,
        })
    }

    pub fn standard_deviation(&self) -> f64 {
        self.standard_deviation
    }
}

impl PartialEq for NormalSpread {
    fn eq(&self, other: &Self) -> bool {
        self.standard_deviation == other.standard_deviation
    }
}

/// How a simulated thrower misses.
///
/// Models are immutable values. Randomness is supplied by the caller, so one
/// model can be shared by every worker of a search while each worker keeps
/// its own RNG.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccuracyModel {
    /// Always hits the aim point.
    Perfect,
    /// Lands uniformly inside a disc of `cep_radius` around the aim point.
    Uniform { cep_radius: f64 },
    /// Independent Gaussian x/y errors.
    Normal(NormalSpread),
}

impl AccuracyModel {
    pub fn perfect() -> Self {
        Self::Perfect
    }

    pub fn uniform(cep_radius: f64) -> DsResult<Self> {
        if !cep_radius.is_finite() || cep_radius <= 0.0 {
            return Err(DartError::Validation(format!(
                "CEP radius must be positive, got {}",
                cep_radius
            )));
        }
        Ok(Self::Uniform { cep_radius })
    }

    pub fn normal(standard_deviation: f64) -> DsResult<Self> {
        NormalSpread::new(standard_deviation).map(Self::Normal)
    }

    /// Builds the model described by `kind`, taking whichever parameter it
    /// needs.
    pub fn from_kind(kind: ModelKind, cep_radius: f64, standard_deviation: f64) -> DsResult<Self> {
        match kind {
            ModelKind::Perfect => Ok(Self::perfect()),
            ModelKind::Uniform => Self::uniform(cep_radius),
            ModelKind::Normal => Self::normal(standard_deviation),
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Perfect => ModelKind::Perfect,
            Self::Uniform { .. } => ModelKind::Uniform,
            Self::Normal(_) => ModelKind::Normal,
        }
    }

    fn unsupported(&self, operation: &'static str) -> DartError {
        DartError::UnsupportedOperation {
            model: match self.kind() {
                ModelKind::Perfect => "perfect",
                ModelKind::Uniform => "uniform",
                ModelKind::Normal => "normal",
            },
            operation,
        }
    }

    /// Simulates one throw aimed at `target`.
    pub fn throw<R: Rng + ?Sized>(
        &self,
        target: BoardPosition,
        rng: &mut R,
    ) -> DsResult<BoardPosition> {
        let (dx, dy) = match self {
            Self::Perfect => return Ok(target),
            Self::Uniform { cep_radius } => {
                let theta = rng.random::<f64>() * TAU;
                // sqrt keeps the density uniform over area rather than radius
                let r = cep_radius * rng.random::<f64>().sqrt();
                (r * theta.cos(), r * theta.sin())
            }
            Self::Normal(spread) => (
                spread.distribution.sample(rng),
                spread.distribution.sample(rng),
            ),
        };

        let (x, y) = target.to_cartesian();
        let landing = BoardPosition::from_cartesian(x + dx, y + dy);
        if !landing.is_finite() {
            return Err(DartError::InvalidLanding {
                radius: landing.radius,
                angle: landing.angle,
            });
        }
        Ok(landing)
    }

    /// Normalized radius spanned by `sigmas` standard deviations.
    /// Only meaningful for the normal model.
    pub fn sigma_radius(&self, sigmas: f64) -> DsResult<f64> {
        match self {
            Self::Normal(spread) => Ok(sigmas * spread.standard_deviation),
            _ => Err(self.unsupported("sigma_radius")),
        }
    }

    /// Radius of the landing disc of the uniform model.
    pub fn accuracy_radius(&self) -> DsResult<f64> {
        match self {
            Self::Uniform { cep_radius } => Ok(*cep_radius),
            _ => Err(self.unsupported("accuracy_radius")),
        }
    }

    pub fn standard_deviation(&self) -> DsResult<f64> {
        match self {
            Self::Normal(spread) => Ok(spread.standard_deviation),
            _ => Err(self.unsupported("standard_deviation")),
        }
    }

    /// A normal model with a new spread, for use between batches.
    pub fn with_standard_deviation(&self, standard_deviation: f64) -> DsResult<Self> {
        match self {
            Self::Normal(_) => Self::normal(standard_deviation),
            _ => Err(self.unsupported("with_standard_deviation")),
        }
    }
}

impl std::fmt::Display for AccuracyModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Perfect => write!(f, "perfect"),
            Self::Uniform { cep_radius } => write!(f, "uniform (cep {:.3})", cep_radius),
            Self::Normal(spread) => write!(f, "normal (sigma {:.3})", spread.standard_deviation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn perfect_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        let target = BoardPosition::from_polar(0.63, 271.5);
        assert_eq!(AccuracyModel::perfect().throw(target, &mut rng).unwrap(), target);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(AccuracyModel::uniform(0.0).is_err());
        assert!(AccuracyModel::uniform(f64::NAN).is_err());
        assert!(AccuracyModel::normal(-0.1).is_err());
        assert!(AccuracyModel::normal(1.5).is_err());
        assert!(AccuracyModel::normal(0.0).is_ok());
    }

    #[test]
    fn sigma_radius_only_for_normal() {
        let normal = AccuracyModel::normal(0.1).unwrap();
        assert!((normal.sigma_radius(2.0).unwrap() - 0.2).abs() < 1e-12);

        let err = AccuracyModel::uniform(0.3).unwrap().sigma_radius(1.0);
        assert!(matches!(err, Err(DartError::UnsupportedOperation { .. })));
        assert!(AccuracyModel::perfect().sigma_radius(1.0).is_err());
    }

    #[test]
    fn reconfigure_standard_deviation() {
        let normal = AccuracyModel::normal(0.1).unwrap();
        let wider = normal.with_standard_deviation(0.2).unwrap();
        assert_eq!(wider.standard_deviation().unwrap(), 0.2);
        assert!(AccuracyModel::perfect().with_standard_deviation(0.2).is_err());
    }

    #[test]
    fn kind_round_trips_through_strings() {
        assert_eq!("normal".parse::<ModelKind>().unwrap(), ModelKind::Normal);
        assert_eq!(ModelKind::Uniform.to_string(), "uniform");
    }

    #[test]
    fn zero_spread_normal_hits_target() {
        let mut rng = StdRng::seed_from_u64(3);
        let model = AccuracyModel::normal(0.0).unwrap();
        let hit = model.throw(BoardPosition::from_polar(0.5, 90.0), &mut rng).unwrap();
        assert!((hit.radius - 0.5).abs() < 1e-12);
        assert!((hit.angle - 90.0).abs() < 1e-9);
    }
}
