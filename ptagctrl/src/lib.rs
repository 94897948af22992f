pub mod error;
pub mod input;
pub mod output;
pub mod resolve;

pub use resolve::{
    PrecedingTag,
    ResolveOptions,
};
