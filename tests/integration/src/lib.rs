//! Integration test utilities for the scream server
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API on a loopback port.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
