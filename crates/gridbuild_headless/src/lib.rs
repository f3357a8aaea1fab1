//! # Gridbuild Headless
//!
//! Drives placement sessions without an engine: JSON-line commands in,
//! JSON responses and ASCII grid renderings out. Used by scripts, CI, and
//! terminal review.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ascii;
pub mod protocol;
pub mod runner;
