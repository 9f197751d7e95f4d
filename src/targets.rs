use crate::accuracy::AccuracyModel;
use crate::error::DsResult;
use crate::geometry::scoring::SEGMENT_VALUES;
use crate::geometry::{
    resolve, BoardPosition, INNER_BULL_RADIUS, INSIDE_DOUBLE_RADIUS, INSIDE_TREBLE_RADIUS,
    OUTER_BULL_RADIUS, OUTSIDE_DOUBLE_RADIUS, OUTSIDE_TREBLE_RADIUS,
};
use crate::search::{average_score, seeded_rng};
use rayon::prelude::*;
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Aim points players commonly argue about.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash, Serialize)]
pub enum NamedTarget {
    #[strum(serialize = "bull")]
    Bull,
    #[strum(serialize = "outer_bull")]
    OuterBull,
    #[strum(serialize = "t20")]
    Treble20,
    #[strum(serialize = "t19")]
    Treble19,
    #[strum(serialize = "t18")]
    Treble18,
    #[strum(serialize = "t17")]
    Treble17,
    #[strum(serialize = "t16")]
    Treble16,
    #[strum(serialize = "t14")]
    Treble14,
    #[strum(serialize = "t11")]
    Treble11,
    #[strum(serialize = "d20")]
    Double20,
    #[strum(serialize = "d16")]
    Double16,
    #[strum(serialize = "s20")]
    Single20,
    #[strum(serialize = "s19")]
    Single19,
}

// Radial middles of the rings
const OUTER_BULL_MIDDLE: f64 = (INNER_BULL_RADIUS + OUTER_BULL_RADIUS) / 2.0;
const TREBLE_MIDDLE: f64 = (INSIDE_TREBLE_RADIUS + OUTSIDE_TREBLE_RADIUS) / 2.0;
const DOUBLE_MIDDLE: f64 = (INSIDE_DOUBLE_RADIUS + OUTSIDE_DOUBLE_RADIUS) / 2.0;
const OUTER_SINGLE_MIDDLE: f64 = (OUTSIDE_TREBLE_RADIUS + INSIDE_DOUBLE_RADIUS) / 2.0;

/// Angle of the centre line of the wedge showing `value`.
fn wedge_angle(value: u32) -> f64 {
    SEGMENT_VALUES
        .iter()
        .position(|&v| v == value)
        .map_or(0.0, |i| i as f64 * 18.0)
}

impl NamedTarget {
    /// Middle of the named area.
    pub fn position(&self) -> BoardPosition {
        let (radius, value) = match self {
            Self::Bull => return BoardPosition::CENTRE,
            Self::OuterBull => (OUTER_BULL_MIDDLE, 20),
            Self::Treble20 => (TREBLE_MIDDLE, 20),
            Self::Treble19 => (TREBLE_MIDDLE, 19),
            Self::Treble18 => (TREBLE_MIDDLE, 18),
            Self::Treble17 => (TREBLE_MIDDLE, 17),
            Self::Treble16 => (TREBLE_MIDDLE, 16),
            Self::Treble14 => (TREBLE_MIDDLE, 14),
            Self::Treble11 => (TREBLE_MIDDLE, 11),
            Self::Double20 => (DOUBLE_MIDDLE, 20),
            Self::Double16 => (DOUBLE_MIDDLE, 16),
            Self::Single20 => (OUTER_SINGLE_MIDDLE, 20),
            Self::Single19 => (OUTER_SINGLE_MIDDLE, 19),
        };
        BoardPosition::from_polar(radius, wedge_angle(value))
    }

    pub fn label(&self) -> String {
        resolve(self.position()).label
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetComparison {
    pub target: NamedTarget,
    pub label: String,
    pub position: BoardPosition,
    pub average: f64,
}

/// Evaluates every named target in parallel, best first.
///
/// Target `i` of the catalogue draws from `seed + i`, so a seeded
/// comparison is reproducible regardless of rayon's scheduling.
pub fn compare_named_targets(
    model: &AccuracyModel,
    throw_count: u32,
    seed: Option<u64>,
) -> DsResult<Vec<TargetComparison>> {
    let catalogue: Vec<NamedTarget> = NamedTarget::iter().collect();

    let mut compared = catalogue
        .par_iter()
        .enumerate()
        .map(|(i, target)| -> DsResult<TargetComparison> {
            let mut rng = seeded_rng(seed, i as u64);
            let position = target.position();
            let average = average_score(position, model, throw_count, &mut rng)?;
            Ok(TargetComparison {
                target: *target,
                label: target.label(),
                position,
                average,
            })
        })
        .collect::<DsResult<Vec<_>>>()?;

    compared.sort_by(|a, b| b.average.total_cmp(&a.average));
    Ok(compared)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_land_in_their_areas() {
        assert_eq!(NamedTarget::Bull.label(), "Red Bull");
        assert_eq!(NamedTarget::OuterBull.label(), "Green Bull");
        assert_eq!(NamedTarget::Treble20.label(), "Treble 20");
        assert_eq!(NamedTarget::Treble19.label(), "Treble 19");
        assert_eq!(NamedTarget::Double16.label(), "Double 16");
        assert_eq!(NamedTarget::Single19.label(), "Outer 19");
    }

    #[test]
    fn parses_short_names() {
        assert_eq!("t20".parse::<NamedTarget>().unwrap(), NamedTarget::Treble20);
        assert_eq!(NamedTarget::OuterBull.to_string(), "outer_bull");
    }

    #[test]
    fn perfect_comparison_ranks_treble_20_first() {
        let compared = compare_named_targets(&AccuracyModel::perfect(), 1, Some(3)).unwrap();
        assert_eq!(compared.len(), NamedTarget::iter().count());
        assert_eq!(compared[0].target, NamedTarget::Treble20);
        assert_eq!(compared[0].average, 60.0);
    }

    #[test]
    fn seeded_comparison_is_reproducible() {
        let model = AccuracyModel::normal(0.1).unwrap();
        let a = compare_named_targets(&model, 200, Some(42)).unwrap();
        let b = compare_named_targets(&model, 200, Some(42)).unwrap();
        let scores = |v: &[TargetComparison]| {
            v.iter()
                .map(|c| (c.target, c.average))
                .collect::<Vec<_>>()
        };
        assert_eq!(scores(&a), scores(&b));
    }
}
