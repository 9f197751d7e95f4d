// Abstract colours of the board areas. Not used for drawing the board itself,
// only to pick marker colours that stand out against whatever they sit on.

use super::Segment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardColour {
    Black,
    White,
    Red,
    Green,
}

use BoardColour::{Black, Green, Red, White};

/// Double and treble ring colour for single values 1..=20.
const MULTIPLIER_RING_COLOURS: [BoardColour; 20] = [
    Green, Red, Red, Green, Green, Green, Red, Red, Green, Red, //  1 - 10
    Green, Red, Red, Red, Green, Green, Green, Red, Green, Red, // 11 - 20
];

/// Single area colour for single values 1..=20.
const SINGLE_AREA_COLOURS: [BoardColour; 20] = [
    White, Black, Black, White, White, White, Black, Black, White, Black, //  1 - 10
    White, Black, Black, Black, White, White, White, Black, White, Black, // 11 - 20
];

/// Colour of the board under a scored point.
///
/// # Panics
///
/// If `score` is inconsistent with `segment` (a double score that is odd,
/// a treble score not divisible by three, a single outside 1..=20).
pub fn colour_of(segment: Segment, score: u32) -> BoardColour {
    match segment {
        Segment::Out => Black,
        Segment::InnerBull => Red,
        Segment::OuterBull => Green,
        Segment::InnerSingle | Segment::OuterSingle => single_colour(score),
        Segment::Double => ring_colour(score, 2),
        Segment::Treble => ring_colour(score, 3),
    }
}

fn ring_colour(score: u32, multiplier: u32) -> BoardColour {
    assert!(
        score % multiplier == 0,
        "Invalid score {} for a x{} ring",
        score,
        multiplier
    );
    let value = score / multiplier;
    assert!(
        (1..=20).contains(&value),
        "Invalid ring score {} (single value {})",
        score,
        value
    );
    MULTIPLIER_RING_COLOURS[(value - 1) as usize]
}

fn single_colour(score: u32) -> BoardColour {
    assert!((1..=20).contains(&score), "Invalid single score: {}", score);
    SINGLE_AREA_COLOURS[(score - 1) as usize]
}

/// RGB colour that stands out against `colour`.
pub fn contrasting_colour(colour: BoardColour) -> (u8, u8, u8) {
    match colour {
        Black => (220, 220, 220),
        White => (50, 50, 50),
        Red => (10, 128, 36),
        Green => (247, 33, 89),
    }
}
