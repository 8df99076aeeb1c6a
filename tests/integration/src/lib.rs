//! Integration test utilities for the reaction-role engine
//!
//! An in-memory store and a scripted platform stand in for PostgreSQL and
//! the remote chat platform, so engine flows run end to end in-process.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
