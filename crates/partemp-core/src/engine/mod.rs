//! # Engine Module
//!
//! The run model shared by every stage of a replicate setup.
//!
//! - **Configuration** ([`config`]) - The immutable [`config::RunConfig`] and its builder
//! - **Progress Monitoring** ([`progress`]) - Progress events emitted while replicates are prepared
//! - **Error Handling** ([`error`]) - Engine-level error type wrapping the `core` failures

pub mod config;
pub mod error;
pub mod progress;
