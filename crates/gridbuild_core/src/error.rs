//! Error types for the placement system.

use thiserror::Error;

use crate::grid::CellArea;

/// Result type alias using [`PlacementError`].
pub type Result<T> = std::result::Result<T, PlacementError>;

/// Top-level error type for all placement operations.
///
/// Every variant is a local, recoverable signal; none is fatal to the
/// process and none leaves a grid partially written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// A cell area extends outside the grid extents.
    ///
    /// The caller must clamp or validate the area before retrying.
    #[error("Area {area:?} exceeds grid extents {width}x{height}")]
    OutOfBounds {
        /// The offending area.
        area: CellArea,
        /// Grid width in cells.
        width: u32,
        /// Grid height in cells.
        height: u32,
    },

    /// `begin` was called while a ghost session is already active.
    ///
    /// Only one ghost may be in flight; confirm or cancel it first.
    #[error("A placement session is already active")]
    AlreadyActive,

    /// `move_to`, `confirm`, or `cancel` was called with no active session.
    #[error("No placement session is active")]
    NoActiveSession,

    /// `confirm` was attempted while the footprint covers at least one
    /// non-buildable cell.
    ///
    /// The session stays active; the caller may keep moving the ghost or
    /// cancel it.
    #[error("Footprint at {area:?} is not fully buildable")]
    InvalidPlacement {
        /// The footprint that failed validation.
        area: CellArea,
    },
}
