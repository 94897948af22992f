pub mod commit;
pub mod error;
pub mod filter;
pub mod platform;
pub mod tag;
