#[cfg(feature = "chrono")]
pub mod chrono;
pub mod core;
#[cfg(feature = "repo")]
pub mod repo;
