pub mod calibrate;
pub mod compare;
pub mod describe;
pub mod search;
pub mod throw;
