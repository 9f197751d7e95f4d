mod tables;

pub use self::tables::{
    best_targets as print_best_targets, calibration as print_calibration,
    comparison as print_comparison, position as print_position, throws as print_throws,
};
