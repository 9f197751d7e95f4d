pub mod accuracy;
pub mod api;
pub mod config;
pub mod error;
pub mod geometry;
pub mod search;
pub mod targets;
// cmd and reports belong to the binary (main.rs).

pub use accuracy::AccuracyModel;
pub use error::{DartError, DsResult};
pub use geometry::{BoardFrame, BoardPosition, PixelPoint};
