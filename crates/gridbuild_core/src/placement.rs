//! Ghost building session tracking.
//!
//! The tracker owns at most one placement session at a time: the ghost
//! building currently being dragged. Every time the ghost lands on a new
//! cell the tracker repaints the preview overlay, all-or-nothing: the whole
//! footprint is painted [`TileState::Valid`] only when every main-grid cell
//! under it is [`TileState::Buildable`], otherwise the whole footprint is
//! painted [`TileState::Invalid`]. Partial overlap never yields a partial
//! paint.
//!
//! State machine: `Idle -> Active -> {committed, cancelled} -> Idle`. The
//! terminal transitions hand the building back to the caller.

use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};
use crate::grid::{CellArea, CellPos, GridLayer, GridStore, TileState};

/// Size of a building in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
}

impl Footprint {
    /// Create a new footprint.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Create a square footprint.
    #[must_use]
    pub const fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    /// Total number of cells this footprint covers.
    #[must_use]
    pub const fn cell_count(&self) -> u32 {
        self.width * self.height
    }

    /// The cell area covered when anchored at `origin`.
    #[must_use]
    pub const fn at(&self, origin: CellPos) -> CellArea {
        CellArea::new(origin.0, origin.1, self.width, self.height)
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// The building entity being placed, as the tracker sees it.
///
/// The actual entity (visuals, physics, game data) lives with the caller;
/// the tracker only needs its footprint and the ability to finalize it.
/// `place` is called exactly once per committed session.
pub trait Building {
    /// Size of this building in grid cells.
    fn footprint(&self) -> Footprint;

    /// Whether the building has been finalized.
    fn is_placed(&self) -> bool;

    /// Finalize placement (visuals, physics, registration).
    fn place(&mut self);
}

/// Transient state held while a ghost is active.
struct PlacementSession {
    /// The building being dragged.
    building: Box<dyn Building>,
    /// The footprint currently painted on the preview layer.
    area: CellArea,
}

/// Tracker state: either no ghost, or exactly one active session.
///
/// A tagged state instead of a nullable field, so operations on a missing
/// session are rejected explicitly rather than silently skipped.
enum PlacementState {
    Idle,
    Active(PlacementSession),
}

/// Error returned by [`PlacementTracker::begin`].
///
/// Carries the rejected building back to the caller, in the manner of
/// `std::sync::mpsc::SendError`: the caller owns the entity's lifetime and
/// must be able to destroy its visual object.
pub struct BeginError {
    /// Why the session could not start.
    pub error: PlacementError,
    /// The building that was not accepted.
    pub building: Box<dyn Building>,
}

impl std::fmt::Debug for BeginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeginError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for BeginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for BeginError {}

impl From<BeginError> for PlacementError {
    fn from(err: BeginError) -> Self {
        err.error
    }
}

/// Tracks the ghost building and keeps the preview overlay in sync.
///
/// All grid access goes through the [`GridStore`] passed to each call; the
/// tracker itself holds only session state.
pub struct PlacementTracker {
    state: PlacementState,
}

impl Default for PlacementTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementTracker {
    /// Create an idle tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: PlacementState::Idle,
        }
    }

    /// Whether a ghost session is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, PlacementState::Active(_))
    }

    /// The footprint currently painted on the preview layer, if any.
    #[must_use]
    pub const fn active_area(&self) -> Option<CellArea> {
        match &self.state {
            PlacementState::Idle => None,
            PlacementState::Active(session) => Some(session.area),
        }
    }

    /// Start a session for `building` with its footprint anchored at
    /// `origin`, and paint the initial overlay.
    ///
    /// Fails with [`PlacementError::AlreadyActive`] if a session exists, and
    /// with [`PlacementError::OutOfBounds`] if the footprint does not fit
    /// the grid at `origin`. In both cases nothing is painted and the
    /// building rides back to the caller inside the [`BeginError`].
    pub fn begin(
        &mut self,
        store: &mut GridStore,
        building: Box<dyn Building>,
        origin: CellPos,
    ) -> std::result::Result<(), BeginError> {
        if self.is_active() {
            return Err(BeginError {
                error: PlacementError::AlreadyActive,
                building,
            });
        }

        let area = building.footprint().at(origin);
        if let Err(error) = Self::repaint(store, None, area) {
            return Err(BeginError { error, building });
        }

        tracing::debug!(?area, "placement session started");
        self.state = PlacementState::Active(PlacementSession { building, area });
        Ok(())
    }

    /// Move the ghost so its footprint is anchored at `origin`.
    ///
    /// A call with the current origin is a no-op and performs no grid
    /// writes. An out-of-bounds destination fails with
    /// [`PlacementError::OutOfBounds`] and leaves the current overlay
    /// untouched.
    pub fn move_to(&mut self, store: &mut GridStore, origin: CellPos) -> Result<()> {
        let PlacementState::Active(session) = &mut self.state else {
            return Err(PlacementError::NoActiveSession);
        };

        let old = session.area;
        if (old.x, old.y) == origin {
            return Ok(());
        }

        let new_area = CellArea::new(origin.0, origin.1, old.width, old.height);
        Self::repaint(store, Some(old), new_area)?;

        tracing::debug!(from = ?old, to = ?new_area, "ghost moved");
        session.area = new_area;
        Ok(())
    }

    /// Repaint the preview overlay for `area`, clearing `prev` first.
    ///
    /// Validity is all-or-nothing: one non-buildable cell under the
    /// footprint marks the entire region invalid. The main-grid read doubles
    /// as the bounds check, so a failed repaint mutates nothing.
    fn repaint(store: &mut GridStore, prev: Option<CellArea>, area: CellArea) -> Result<()> {
        let states = store.read_block(area)?;

        if let Some(prev) = prev {
            store.clear_block(prev, GridLayer::Preview)?;
        }

        let paint = if states.iter().all(|&s| s == TileState::Buildable) {
            TileState::Valid
        } else {
            TileState::Invalid
        };
        store.fill_block(area, paint, GridLayer::Preview)
    }

    /// Commit the ghost at its current footprint.
    ///
    /// Re-validates against the main grid rather than trusting the last
    /// repaint; [`PlacementError::InvalidPlacement`] leaves the session
    /// active and every grid untouched. On success the footprint becomes
    /// [`TileState::Valid`] on the main grid, the overlay is cleared,
    /// `place` is invoked exactly once, and the building is handed back to
    /// the caller.
    pub fn confirm(&mut self, store: &mut GridStore) -> Result<Box<dyn Building>> {
        let PlacementState::Active(session) =
            std::mem::replace(&mut self.state, PlacementState::Idle)
        else {
            return Err(PlacementError::NoActiveSession);
        };

        let area = session.area;
        if !store.is_area_buildable(area) {
            tracing::debug!(?area, "confirm rejected, footprint not buildable");
            self.state = PlacementState::Active(session);
            return Err(PlacementError::InvalidPlacement { area });
        }

        store.clear_block(area, GridLayer::Preview)?;
        store.fill_block(area, TileState::Valid, GridLayer::Main)?;

        let mut building = session.building;
        building.place();
        tracing::info!(?area, "building committed");
        Ok(building)
    }

    /// Abandon the ghost, clearing its overlay.
    ///
    /// Hands the building back so the caller can destroy its visual object.
    pub fn cancel(&mut self, store: &mut GridStore) -> Result<Box<dyn Building>> {
        let PlacementState::Active(session) =
            std::mem::replace(&mut self.state, PlacementState::Idle)
        else {
            return Err(PlacementError::NoActiveSession);
        };

        store.clear_block(session.area, GridLayer::Preview)?;
        tracing::info!(area = ?session.area, "placement session cancelled");
        Ok(session.building)
    }
}

#[cfg(test)]
mod tests {
    use gridbuild_core::prelude::*;
    use gridbuild_test_utils::fixtures::{buildable_store, TestBuilding};

    #[test]
    fn test_begin_paints_valid_overlay() {
        let mut store = buildable_store(5, 5);
        let mut tracker = PlacementTracker::new();

        tracker
            .begin(&mut store, Box::new(TestBuilding::new(2, 2)), (1, 1))
            .unwrap();

        assert!(tracker.is_active());
        assert_eq!(tracker.active_area(), Some(CellArea::new(1, 1, 2, 2)));
        for (x, y) in CellArea::new(1, 1, 2, 2).cells() {
            assert_eq!(store.get_cell(x, y, GridLayer::Preview), Some(TileState::Valid));
        }
        // Main grid untouched
        assert!(store.is_area_buildable(CellArea::new(1, 1, 2, 2)));
    }

    #[test]
    fn test_begin_over_occupied_paints_whole_area_invalid() {
        let mut store = buildable_store(5, 5);
        store.set_cell(2, 2, GridLayer::Main, TileState::Valid);
        let mut tracker = PlacementTracker::new();

        tracker
            .begin(&mut store, Box::new(TestBuilding::new(2, 2)), (1, 1))
            .unwrap();

        // One offending cell marks every cell invalid, never a mix
        for (x, y) in CellArea::new(1, 1, 2, 2).cells() {
            assert_eq!(store.get_cell(x, y, GridLayer::Preview), Some(TileState::Invalid));
        }
    }

    #[test]
    fn test_begin_rejects_second_session() {
        let mut store = buildable_store(5, 5);
        let mut tracker = PlacementTracker::new();
        tracker
            .begin(&mut store, Box::new(TestBuilding::new(1, 1)), (0, 0))
            .unwrap();
        let snapshot = store.clone();

        let err = tracker
            .begin(&mut store, Box::new(TestBuilding::new(1, 1)), (3, 3))
            .unwrap_err();

        assert_eq!(err.error, PlacementError::AlreadyActive);
        // The rejected building comes back to the caller
        assert!(!err.building.is_placed());
        assert_eq!(store, snapshot);
        assert_eq!(tracker.active_area(), Some(CellArea::new(0, 0, 1, 1)));
    }

    #[test]
    fn test_begin_out_of_bounds_stays_idle() {
        let mut store = buildable_store(3, 3);
        let mut tracker = PlacementTracker::new();

        let err = tracker
            .begin(&mut store, Box::new(TestBuilding::new(2, 2)), (2, 2))
            .unwrap_err();

        assert!(matches!(err.error, PlacementError::OutOfBounds { .. }));
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_move_clears_old_and_paints_new() {
        let mut store = buildable_store(5, 5);
        let mut tracker = PlacementTracker::new();
        tracker
            .begin(&mut store, Box::new(TestBuilding::new(1, 1)), (0, 0))
            .unwrap();

        tracker.move_to(&mut store, (1, 0)).unwrap();

        assert_eq!(store.get_cell(0, 0, GridLayer::Preview), Some(TileState::Empty));
        assert_eq!(store.get_cell(1, 0, GridLayer::Preview), Some(TileState::Valid));
    }

    #[test]
    fn test_move_to_same_cell_writes_nothing() {
        let mut store = buildable_store(5, 5);
        let mut tracker = PlacementTracker::new();
        tracker
            .begin(&mut store, Box::new(TestBuilding::new(2, 1)), (2, 2))
            .unwrap();
        let snapshot = store.clone();

        tracker.move_to(&mut store, (2, 2)).unwrap();
        tracker.move_to(&mut store, (2, 2)).unwrap();

        assert_eq!(store, snapshot);
    }

    #[test]
    fn test_move_out_of_bounds_keeps_old_overlay() {
        let mut store = buildable_store(4, 4);
        let mut tracker = PlacementTracker::new();
        tracker
            .begin(&mut store, Box::new(TestBuilding::new(2, 2)), (0, 0))
            .unwrap();
        let snapshot = store.clone();

        let err = tracker.move_to(&mut store, (3, 3)).unwrap_err();

        assert!(matches!(err, PlacementError::OutOfBounds { .. }));
        assert_eq!(store, snapshot);
        assert_eq!(tracker.active_area(), Some(CellArea::new(0, 0, 2, 2)));
    }

    #[test]
    fn test_confirm_commits_once() {
        let mut store = buildable_store(5, 5);
        let mut tracker = PlacementTracker::new();
        let building = TestBuilding::new(2, 2);
        let places = building.place_calls();
        tracker.begin(&mut store, Box::new(building), (1, 1)).unwrap();

        let committed = tracker.confirm(&mut store).unwrap();

        assert!(committed.is_placed());
        assert_eq!(places.get(), 1);
        assert!(!tracker.is_active());
        for (x, y) in CellArea::new(1, 1, 2, 2).cells() {
            assert_eq!(store.get_cell(x, y, GridLayer::Main), Some(TileState::Valid));
            assert_eq!(store.get_cell(x, y, GridLayer::Preview), Some(TileState::Empty));
        }
    }

    #[test]
    fn test_confirm_revalidates_against_main_grid() {
        let mut store = buildable_store(5, 5);
        let mut tracker = PlacementTracker::new();
        tracker
            .begin(&mut store, Box::new(TestBuilding::new(1, 1)), (1, 0))
            .unwrap();

        // The world changed after the last repaint
        store.set_cell(1, 0, GridLayer::Main, TileState::Invalid);
        let snapshot = store.clone();

        let err = tracker.confirm(&mut store).err().unwrap();

        assert_eq!(
            err,
            PlacementError::InvalidPlacement {
                area: CellArea::new(1, 0, 1, 1)
            }
        );
        // Session still active, grids untouched; the user may move and retry
        assert!(tracker.is_active());
        assert_eq!(store, snapshot);
    }

    #[test]
    fn test_cancel_clears_overlay_and_returns_building() {
        let mut store = buildable_store(5, 5);
        let mut tracker = PlacementTracker::new();
        tracker
            .begin(&mut store, Box::new(TestBuilding::new(2, 2)), (0, 0))
            .unwrap();

        let building = tracker.cancel(&mut store).unwrap();

        assert!(!building.is_placed());
        assert!(!tracker.is_active());
        for (x, y) in CellArea::new(0, 0, 2, 2).cells() {
            assert_eq!(store.get_cell(x, y, GridLayer::Preview), Some(TileState::Empty));
        }
    }

    #[test]
    fn test_operations_while_idle_are_rejected() {
        let mut store = buildable_store(3, 3);
        let mut tracker = PlacementTracker::new();

        assert_eq!(
            tracker.move_to(&mut store, (1, 1)).unwrap_err(),
            PlacementError::NoActiveSession
        );
        assert!(matches!(
            tracker.confirm(&mut store),
            Err(PlacementError::NoActiveSession)
        ));
        assert!(matches!(
            tracker.cancel(&mut store),
            Err(PlacementError::NoActiveSession)
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn overlay_is_never_mixed(
                ox in 0u32..14, oy in 0u32..14,
                w in 1u32..3, h in 1u32..3,
                bx in 0u32..16, by in 0u32..16,
            ) {
                let mut store = buildable_store(16, 16);
                store.set_cell(bx, by, GridLayer::Main, TileState::Valid);

                let mut tracker = PlacementTracker::new();
                if tracker
                    .begin(&mut store, Box::new(TestBuilding::new(w, h)), (ox, oy))
                    .is_err()
                {
                    return Ok(());
                }

                let area = tracker.active_area().unwrap();
                let painted: Vec<_> = area
                    .cells()
                    .map(|(x, y)| store.get_cell(x, y, GridLayer::Preview).unwrap())
                    .collect();

                let expected = if area.contains((bx, by)) {
                    TileState::Invalid
                } else {
                    TileState::Valid
                };
                prop_assert!(painted.iter().all(|&s| s == expected));
            }
        }
    }
}
