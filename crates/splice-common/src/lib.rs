//! Common utilities for the splice preprocessor.
//!
//! This crate provides shared infrastructure used by the transformer and the CLI:
//! - **Warning System** - deduplicated, colored terminal output for non-fatal problems
//! - **Tracing Targets** - target names for filtering `tracing` output by subsystem

pub mod targets;
pub mod warning;
