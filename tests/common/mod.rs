//! Common test utilities for Swarmform CLI tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated working directory with fake `ssh` and `scp`
//! - Fixtures: Reusable topology and descriptor content

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
