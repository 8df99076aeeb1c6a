//! Platform adapters

mod rest;
mod wire;

pub use rest::{RestPlatform, RestPlatformConfig};
