pub mod colours;
pub mod scoring;

pub use self::colours::{colour_of, contrasting_colour, BoardColour};
pub use self::scoring::{resolve, ScoringOutcome, Segment};

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::hash::{Hash, Hasher};

// Diameters of the circles that matter for scoring, in millimetres
pub const DISPLAYED_BOARD_DIAMETER: f64 = 451.0;
pub const INNER_BULL_DIAMETER: f64 = 12.7;
pub const OUTER_BULL_DIAMETER: f64 = 31.8;
pub const INSIDE_TREBLE_DIAMETER: f64 = 194.0;
pub const OUTSIDE_TREBLE_DIAMETER: f64 = 213.0;
pub const INSIDE_DOUBLE_DIAMETER: f64 = 321.0;
pub const OUTSIDE_DOUBLE_DIAMETER: f64 = 340.0;
pub const SCORING_AREA_DIAMETER: f64 = OUTSIDE_DOUBLE_DIAMETER;

// The same circles as radii normalized to the scoring area (0.0 - 1.0)
pub const INNER_BULL_RADIUS: f64 = INNER_BULL_DIAMETER / SCORING_AREA_DIAMETER;
pub const OUTER_BULL_RADIUS: f64 = OUTER_BULL_DIAMETER / SCORING_AREA_DIAMETER;
pub const INSIDE_TREBLE_RADIUS: f64 = INSIDE_TREBLE_DIAMETER / SCORING_AREA_DIAMETER;
pub const OUTSIDE_TREBLE_RADIUS: f64 = OUTSIDE_TREBLE_DIAMETER / SCORING_AREA_DIAMETER;
pub const INSIDE_DOUBLE_RADIUS: f64 = INSIDE_DOUBLE_DIAMETER / SCORING_AREA_DIAMETER;
pub const OUTSIDE_DOUBLE_RADIUS: f64 = OUTSIDE_DOUBLE_DIAMETER / SCORING_AREA_DIAMETER;
pub const SCORING_AREA_RADIUS: f64 = 1.0;

/// Fraction of the displayed board image (which fills the square frame)
/// occupied by the scoring area.
pub const SCORING_AREA_FRACTION: f64 = SCORING_AREA_DIAMETER / DISPLAYED_BOARD_DIAMETER;

/// A point on or around the board in normalized polar form.
///
/// `radius` is 0 at the centre and 1.0 at the outside of the double ring;
/// `angle` is in degrees, clockwise, with 0 straight up.
///
/// Equality and hashing are bit-exact on both fields. Positions are used as
/// map keys for search results and recorded throws, so no tolerance applies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoardPosition {
    pub radius: f64,
    pub angle: f64,
}

impl PartialEq for BoardPosition {
    fn eq(&self, other: &Self) -> bool {
        self.radius.to_bits() == other.radius.to_bits()
            && self.angle.to_bits() == other.angle.to_bits()
    }
}

impl Eq for BoardPosition {}

impl Hash for BoardPosition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.radius.to_bits().hash(state);
        self.angle.to_bits().hash(state);
    }
}

impl BoardPosition {
    pub const CENTRE: BoardPosition = BoardPosition {
        radius: 0.0,
        angle: 0.0,
    };

    pub fn from_polar(radius: f64, angle: f64) -> Self {
        Self { radius, angle }
    }

    /// Normalized Cartesian coordinates: x to the right, y upward.
    pub fn to_cartesian(&self) -> (f64, f64) {
        let theta = self.angle.to_radians();
        (self.radius * theta.sin(), self.radius * theta.cos())
    }

    /// Inverse of [`BoardPosition::to_cartesian`]. The angle comes back in
    /// the (-180, 180] range.
    pub fn from_cartesian(x: f64, y: f64) -> Self {
        Self {
            radius: x.hypot(y),
            angle: x.atan2(y) * (180.0 / PI),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.radius.is_finite() && self.angle.is_finite()
    }

    pub fn outcome(&self) -> ScoringOutcome {
        resolve(*self)
    }

    /// Distance in whole pixels between two positions drawn in a frame of
    /// the given size.
    pub fn pixel_distance(&self, other: &BoardPosition, square_dimension: f64) -> i64 {
        let frame = BoardFrame::new(square_dimension, PixelPoint::ORIGIN);
        let a = frame.to_pixel(*self).rounded();
        let b = frame.to_pixel(*other).rounded();
        let dx = (a.0 - b.0) as f64;
        let dy = (a.1 - b.1) as f64;
        dx.hypot(dy).round() as i64
    }
}

/// A window-space pixel coordinate: x to the right, y downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const ORIGIN: PixelPoint = PixelPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Nearest whole pixel, for drawing.
    pub fn rounded(&self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

/// The square frame the board image is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardFrame {
    pub square_dimension: f64,
    pub origin: PixelPoint,
}

impl BoardFrame {
    pub fn new(square_dimension: f64, origin: PixelPoint) -> Self {
        Self {
            square_dimension,
            origin,
        }
    }

    fn half(&self) -> f64 {
        self.square_dimension / 2.0
    }

    /// Radius of the scoring area in pixels.
    pub fn scoring_radius_pixels(&self) -> f64 {
        self.half() * SCORING_AREA_FRACTION
    }

    /// Converts a window pixel to a board position.
    pub fn to_polar(&self, pixel: PixelPoint) -> BoardPosition {
        let half = self.half();
        let x_centred = pixel.x - self.origin.x - half;
        let y_centred = -(pixel.y - self.origin.y - half);

        let x_scoring = x_centred / half / SCORING_AREA_FRACTION;
        let y_scoring = y_centred / half / SCORING_AREA_FRACTION;

        BoardPosition::from_cartesian(x_scoring, y_scoring)
    }

    /// Converts a board position to a window pixel. Inverse of
    /// [`BoardFrame::to_polar`].
    pub fn to_pixel(&self, position: BoardPosition) -> PixelPoint {
        let half = self.half();
        let (x, y) = position.to_cartesian();

        let x_window = x * SCORING_AREA_FRACTION * half;
        let y_window = y * SCORING_AREA_FRACTION * half;

        PixelPoint {
            x: self.origin.x + half + x_window,
            y: self.origin.y + half - y_window,
        }
    }
}

impl Default for BoardFrame {
    fn default() -> Self {
        Self::new(1000.0, PixelPoint::ORIGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ring_radii_are_ordered() {
        let rings = [
            INNER_BULL_RADIUS,
            OUTER_BULL_RADIUS,
            INSIDE_TREBLE_RADIUS,
            OUTSIDE_TREBLE_RADIUS,
            INSIDE_DOUBLE_RADIUS,
            OUTSIDE_DOUBLE_RADIUS,
        ];
        assert!(rings.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(OUTSIDE_DOUBLE_RADIUS, SCORING_AREA_RADIUS);
    }

    #[test]
    fn centre_of_frame_is_board_centre() {
        let frame = BoardFrame::new(800.0, PixelPoint::new(100.0, 50.0));
        let pos = frame.to_polar(PixelPoint::new(500.0, 450.0));
        assert_eq!(pos.radius, 0.0);
    }

    #[test]
    fn straight_up_is_angle_zero() {
        let frame = BoardFrame::new(1000.0, PixelPoint::ORIGIN);
        let pos = frame.to_polar(PixelPoint::new(500.0, 100.0));
        assert!(pos.angle.abs() < 1e-12);
        let right = frame.to_polar(PixelPoint::new(900.0, 500.0));
        assert!((right.angle - 90.0).abs() < 1e-12);
    }

    #[test]
    fn equality_is_bit_exact() {
        let c = BoardPosition::from_polar(0.30000000000000004, 20.0);
        let d = BoardPosition::from_polar(0.1 + 0.2, 20.0);
        assert_eq!(c, d);
        assert_ne!(BoardPosition::from_polar(0.3, 20.0), d);

        let mut set = HashSet::new();
        set.insert(c);
        assert!(set.contains(&d));
    }
}
