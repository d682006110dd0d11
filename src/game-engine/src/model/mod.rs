pub mod format;
pub mod round;
