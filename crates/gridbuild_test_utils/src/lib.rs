//! # Gridbuild Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Grid store fixtures
//! - A scripted [`gridbuild_core::placement::Building`] with an observable
//!   place-call counter
//! - Property-based testing re-exports

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
