//! # Gridbuild Core
//!
//! Grid-based building placement for a tile game.
//!
//! Tracks a ghost building as it is dragged over a tile grid, paints the
//! cells under it to show whether placement is allowed, and commits the
//! building into the grid on confirmation.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering (tile visuals are an injected name mapping)
//! - No IO
//! - No floating-point math (world coordinates are fixed-point)
//!
//! Rendering, input polling, and entity lifecycles belong to the caller; the
//! crate consumes already-decoded [`controller::PlacementEvent`]s and reports
//! every failure as a recoverable [`error::PlacementError`].
//!
//! ## Crate Structure
//!
//! - [`grid`] - Tile states, cell areas, and the two-layer grid store
//! - [`placement`] - Ghost session tracking and commit/cancel
//! - [`controller`] - Event dispatch over the grid and the tracker
//! - [`visuals`] - Tile-state to asset-name configuration
//! - [`math`] - Fixed-point world coordinates

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod controller;
pub mod error;
pub mod grid;
pub mod math;
pub mod placement;
pub mod visuals;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::controller::{PlacementController, PlacementEvent};
    pub use crate::error::{PlacementError, Result};
    pub use crate::grid::{CellArea, CellPos, GridLayer, GridStore, TileState};
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::placement::{BeginError, Building, Footprint, PlacementTracker};
    pub use crate::visuals::TileVisuals;
}
