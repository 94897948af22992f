pub mod client;
pub mod error;
pub mod throttle;
pub mod transport;
mod model;

#[macro_use]
extern crate log;

pub use client::{
    GitHubClient,
    Repository,
};
