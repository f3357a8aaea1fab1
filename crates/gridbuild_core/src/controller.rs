//! Event dispatch over the grid store and the placement tracker.
//!
//! The controller is the thin outer layer: it translates already-decoded
//! input events into tracker calls and owns the store, the tracker, and the
//! list of committed buildings for the lifetime of the level. It is
//! constructed explicitly and passed to whoever composes the scene; there is
//! no process-wide instance.
//!
//! Expected failures (confirm on an invalid footprint, events with no ghost
//! in flight) are logged and swallowed here: the player sees them only
//! through the overlay color.

use crate::error::PlacementError;
use crate::grid::{CellPos, GridStore};
use crate::math::Vec2Fixed;
use crate::placement::{Building, PlacementTracker};

/// External input events the controller consumes.
///
/// Names are illustrative; any input source that can produce these four
/// signals can drive the controller.
pub enum PlacementEvent {
    /// A ghost for `building` should start at the grid origin.
    BeginRequested {
        /// The building to drag.
        building: Box<dyn Building>,
    },
    /// The pointer moved to a world position.
    PointerMoved {
        /// Pointer position in world units.
        world: Vec2Fixed,
        /// Whether the pointer is currently over UI. UI interaction takes
        /// priority: the event is suppressed entirely.
        over_ui: bool,
    },
    /// The player asked to commit the ghost.
    ConfirmRequested,
    /// The player asked to abandon the ghost.
    CancelRequested,
}

impl std::fmt::Debug for PlacementEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BeginRequested { .. } => f.write_str("BeginRequested"),
            Self::PointerMoved { world, over_ui } => f
                .debug_struct("PointerMoved")
                .field("world", world)
                .field("over_ui", over_ui)
                .finish(),
            Self::ConfirmRequested => f.write_str("ConfirmRequested"),
            Self::CancelRequested => f.write_str("CancelRequested"),
        }
    }
}

/// Owns the grid store and tracker, and drives them from input events.
pub struct PlacementController {
    store: GridStore,
    tracker: PlacementTracker,
    /// Last pointer cell forwarded to the tracker, to skip repeat events.
    last_cell: Option<CellPos>,
    /// Buildings committed this level.
    placed: Vec<Box<dyn Building>>,
}

impl PlacementController {
    /// Create a controller over a prepared grid store.
    #[must_use]
    pub fn new(store: GridStore) -> Self {
        Self {
            store,
            tracker: PlacementTracker::new(),
            last_cell: None,
            placed: Vec::new(),
        }
    }

    /// The grid store.
    #[must_use]
    pub const fn store(&self) -> &GridStore {
        &self.store
    }

    /// Mutable grid store access, for level setup (painting the buildable
    /// zone) and external world changes.
    pub fn store_mut(&mut self) -> &mut GridStore {
        &mut self.store
    }

    /// The placement tracker.
    #[must_use]
    pub const fn tracker(&self) -> &PlacementTracker {
        &self.tracker
    }

    /// Number of buildings committed so far.
    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Process one input event.
    ///
    /// Returns a building when one leaves the system without being placed
    /// (a cancelled ghost, or a begin request that was rejected); the caller
    /// destroys its visual object. Committed buildings stay in the
    /// controller's world list.
    pub fn handle_event(&mut self, event: PlacementEvent) -> Option<Box<dyn Building>> {
        match event {
            PlacementEvent::BeginRequested { building } => self.on_begin(building),
            PlacementEvent::PointerMoved { world, over_ui } => {
                if !over_ui {
                    self.on_pointer_moved(world);
                }
                None
            }
            PlacementEvent::ConfirmRequested => {
                self.on_confirm();
                None
            }
            PlacementEvent::CancelRequested => self.on_cancel(),
        }
    }

    fn on_begin(&mut self, building: Box<dyn Building>) -> Option<Box<dyn Building>> {
        match self.tracker.begin(&mut self.store, building, (0, 0)) {
            Ok(()) => {
                self.last_cell = Some((0, 0));
                None
            }
            Err(err) => {
                tracing::warn!(error = %err.error, "begin rejected");
                Some(err.building)
            }
        }
    }

    fn on_pointer_moved(&mut self, world: Vec2Fixed) {
        if !self.tracker.is_active() {
            return;
        }

        // A pointer outside the grid leaves the ghost where it is
        let Some(cell) = self.store.world_to_cell(world) else {
            return;
        };

        if self.last_cell == Some(cell) {
            return;
        }

        match self.tracker.move_to(&mut self.store, cell) {
            Ok(()) => self.last_cell = Some(cell),
            // Footprint would overhang the grid edge; ghost stays put
            Err(err) => tracing::debug!(error = %err, "move ignored"),
        }
    }

    fn on_confirm(&mut self) {
        match self.tracker.confirm(&mut self.store) {
            Ok(building) => {
                self.last_cell = None;
                self.placed.push(building);
            }
            // Ghost stays; the user must move it and retry
            Err(PlacementError::InvalidPlacement { area }) => {
                tracing::debug!(?area, "confirm ignored, placement invalid");
            }
            Err(err) => tracing::warn!(error = %err, "confirm with no ghost in flight"),
        }
    }

    fn on_cancel(&mut self) -> Option<Box<dyn Building>> {
        match self.tracker.cancel(&mut self.store) {
            Ok(building) => {
                self.last_cell = None;
                Some(building)
            }
            Err(err) => {
                tracing::warn!(error = %err, "cancel with no ghost in flight");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use gridbuild_core::prelude::*;
    use gridbuild_test_utils::fixtures::{buildable_store, vec2, TestBuilding};

    fn controller() -> PlacementController {
        PlacementController::new(buildable_store(5, 5))
    }

    #[test]
    fn test_begin_then_pointer_drags_ghost() {
        let mut ctl = controller();
        ctl.handle_event(PlacementEvent::BeginRequested {
            building: Box::new(TestBuilding::new(1, 1)),
        });
        assert_eq!(ctl.tracker().active_area(), Some(CellArea::new(0, 0, 1, 1)));

        ctl.handle_event(PlacementEvent::PointerMoved {
            world: vec2(3, 2),
            over_ui: false,
        });

        assert_eq!(ctl.tracker().active_area(), Some(CellArea::new(3, 2, 1, 1)));
        assert_eq!(
            ctl.store().get_cell(0, 0, GridLayer::Preview),
            Some(TileState::Empty)
        );
        assert_eq!(
            ctl.store().get_cell(3, 2, GridLayer::Preview),
            Some(TileState::Valid)
        );
    }

    #[test]
    fn test_pointer_over_ui_is_suppressed() {
        let mut ctl = controller();
        ctl.handle_event(PlacementEvent::BeginRequested {
            building: Box::new(TestBuilding::new(1, 1)),
        });
        let snapshot = ctl.store().clone();

        ctl.handle_event(PlacementEvent::PointerMoved {
            world: vec2(3, 2),
            over_ui: true,
        });

        assert_eq!(ctl.store(), &snapshot);
        assert_eq!(ctl.tracker().active_area(), Some(CellArea::new(0, 0, 1, 1)));
    }

    #[test]
    fn test_pointer_outside_grid_is_ignored() {
        let mut ctl = controller();
        ctl.handle_event(PlacementEvent::BeginRequested {
            building: Box::new(TestBuilding::new(1, 1)),
        });

        ctl.handle_event(PlacementEvent::PointerMoved {
            world: vec2(40, 40),
            over_ui: false,
        });

        assert_eq!(ctl.tracker().active_area(), Some(CellArea::new(0, 0, 1, 1)));
    }

    #[test]
    fn test_confirm_commits_and_retains_building() {
        let mut ctl = controller();
        let building = TestBuilding::new(2, 2);
        let places = building.place_calls();
        ctl.handle_event(PlacementEvent::BeginRequested {
            building: Box::new(building),
        });

        let released = ctl.handle_event(PlacementEvent::ConfirmRequested);

        assert!(released.is_none());
        assert_eq!(ctl.placed_count(), 1);
        assert_eq!(places.get(), 1);
        assert!(!ctl.tracker().is_active());
    }

    #[test]
    fn test_confirm_on_invalid_footprint_keeps_ghost() {
        let mut ctl = controller();
        ctl.store_mut()
            .set_cell(0, 0, GridLayer::Main, TileState::Invalid);
        ctl.handle_event(PlacementEvent::BeginRequested {
            building: Box::new(TestBuilding::new(1, 1)),
        });

        ctl.handle_event(PlacementEvent::ConfirmRequested);

        // Silent failure: ghost remains, nothing committed
        assert!(ctl.tracker().is_active());
        assert_eq!(ctl.placed_count(), 0);
        assert_eq!(
            ctl.store().get_cell(0, 0, GridLayer::Preview),
            Some(TileState::Invalid)
        );
    }

    #[test]
    fn test_cancel_releases_building() {
        let mut ctl = controller();
        ctl.handle_event(PlacementEvent::BeginRequested {
            building: Box::new(TestBuilding::new(1, 1)),
        });

        let released = ctl.handle_event(PlacementEvent::CancelRequested);

        assert!(released.is_some());
        assert!(!released.unwrap().is_placed());
        assert!(!ctl.tracker().is_active());
    }

    #[test]
    fn test_second_begin_hands_building_back() {
        let mut ctl = controller();
        ctl.handle_event(PlacementEvent::BeginRequested {
            building: Box::new(TestBuilding::new(1, 1)),
        });

        let rejected = ctl.handle_event(PlacementEvent::BeginRequested {
            building: Box::new(TestBuilding::new(2, 2)),
        });

        assert!(rejected.is_some());
        // The first session is untouched
        assert_eq!(ctl.tracker().active_area(), Some(CellArea::new(0, 0, 1, 1)));
    }

    #[test]
    fn test_confirm_and_cancel_while_idle_are_swallowed() {
        let mut ctl = controller();
        assert!(ctl.handle_event(PlacementEvent::ConfirmRequested).is_none());
        assert!(ctl.handle_event(PlacementEvent::CancelRequested).is_none());
        assert_eq!(ctl.placed_count(), 0);
    }
}
