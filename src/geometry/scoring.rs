use super::{
    BoardPosition, INNER_BULL_RADIUS, INSIDE_DOUBLE_RADIUS, INSIDE_TREBLE_RADIUS,
    OUTER_BULL_RADIUS, OUTSIDE_DOUBLE_RADIUS, OUTSIDE_TREBLE_RADIUS, SCORING_AREA_RADIUS,
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// The logical scoring areas of the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum Segment {
    #[strum(serialize = "Out")]
    Out,
    #[strum(serialize = "Red Bull")]
    InnerBull,
    #[strum(serialize = "Green Bull")]
    OuterBull,
    #[strum(serialize = "Inner")]
    InnerSingle,
    #[strum(serialize = "Outer")]
    OuterSingle,
    #[strum(serialize = "Double")]
    Double,
    #[strum(serialize = "Treble")]
    Treble,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringOutcome {
    pub segment: Segment,
    pub score: u32,
    pub label: String,
}

/// Ring boundaries from the centre outward. A radius belongs to band `i`
/// when `BOUNDARIES[i] <= radius < BOUNDARIES[i + 1]`.
pub const MULTIPLIER_BOUNDARIES: [f64; 8] = [
    0.0,
    INNER_BULL_RADIUS,
    OUTER_BULL_RADIUS,
    INSIDE_TREBLE_RADIUS,
    OUTSIDE_TREBLE_RADIUS,
    INSIDE_DOUBLE_RADIUS,
    OUTSIDE_DOUBLE_RADIUS,
    SCORING_AREA_RADIUS,
];

/// Multiplier of each band:
/// red bull, green bull, inner single, treble, outer single, double.
pub const BAND_MULTIPLIERS: [u32; 6] = [2, 1, 1, 3, 1, 2];

/// Wedge values clockwise from the top.
pub const SEGMENT_VALUES: [u32; 20] = [
    20, 1, 18, 4, 13, 6, 10, 15, 2, 17, 3, 19, 7, 16, 8, 11, 14, 9, 12, 5,
];

const WEDGE_DEGREES: f64 = 360.0 / 20.0;
const BULL_VALUE: u32 = 25;

/// Single value of the wedge containing the point, ignoring rings.
/// Inside the outer bull the angle is meaningless and the value is 25.
pub fn single_value(radius: f64, angle: f64) -> u32 {
    if radius < OUTER_BULL_RADIUS {
        return BULL_VALUE;
    }

    // Wedges are centred on their value, so shift by half a wedge before binning
    let degrees = angle.rem_euclid(360.0) + WEDGE_DEGREES / 2.0;
    let index = (degrees / WEDGE_DEGREES).floor() as usize;
    SEGMENT_VALUES[index % SEGMENT_VALUES.len()]
}

/// Ring multiplier at the given radius; 0 outside the scoring area.
pub fn multiplier(radius: f64) -> u32 {
    MULTIPLIER_BOUNDARIES
        .windows(2)
        .position(|band| radius >= band[0] && radius < band[1])
        .map(|i| BAND_MULTIPLIERS[i])
        .unwrap_or(0)
}

/// Classifies a point on the board.
pub fn resolve(position: BoardPosition) -> ScoringOutcome {
    let radius = position.radius.abs();
    if radius.is_nan() || radius > SCORING_AREA_RADIUS || !position.angle.is_finite() {
        return out();
    }

    let value = single_value(radius, position.angle);
    let mult = multiplier(radius);
    if mult == 0 {
        return out();
    }
    let score = value * mult;

    let segment = match (score, mult) {
        (50, _) => Segment::InnerBull,
        (25, _) => Segment::OuterBull,
        (_, 3) => Segment::Treble,
        (_, 2) => Segment::Double,
        _ if radius < INSIDE_TREBLE_RADIUS => Segment::InnerSingle,
        _ => Segment::OuterSingle,
    };

    let label = match segment {
        Segment::InnerBull | Segment::OuterBull => segment.to_string(),
        _ => format!("{} {}", segment, value),
    };

    ScoringOutcome {
        segment,
        score,
        label,
    }
}

fn out() -> ScoringOutcome {
    ScoringOutcome {
        segment: Segment::Out,
        score: 0,
        label: Segment::Out.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wedge_edges() {
        // 9 degrees is the first edge of the "1" wedge
        assert_eq!(single_value(0.5, 8.999), 20);
        assert_eq!(single_value(0.5, 9.0), 1);
        // left half of the 20 wedge wraps back to index 0
        assert_eq!(single_value(0.5, 351.0), 20);
        assert_eq!(single_value(0.5, -5.0), 20);
        assert_eq!(single_value(0.5, 350.999), 5);
    }

    #[test]
    fn outside_board_has_no_multiplier() {
        assert_eq!(multiplier(1.0), 0);
        assert_eq!(multiplier(1.5), 0);
        assert_eq!(multiplier(0.999), 2);
    }

    #[test]
    fn bull_ignores_angle() {
        for angle in [0.0, 45.0, 123.4, 359.9] {
            assert_eq!(resolve(BoardPosition::from_polar(0.0, angle)).score, 50);
        }
    }

    #[test]
    fn nan_is_out() {
        let outcome = resolve(BoardPosition::from_polar(f64::NAN, 0.0));
        assert_eq!(outcome.segment, Segment::Out);
    }
}
