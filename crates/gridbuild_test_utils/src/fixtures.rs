//! Test fixtures and helpers.
//!
//! Pre-built grid stores and a scripted building implementation
//! for consistent testing.

use std::cell::Cell;
use std::rc::Rc;

use fixed::types::I32F32;

use gridbuild_core::grid::{GridLayer, GridStore, TileState};
use gridbuild_core::math::Vec2Fixed;
use gridbuild_core::placement::{Building, Footprint};
use gridbuild_core::visuals::TileVisuals;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real placement code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point world position from integers.
#[must_use]
pub fn vec2(x: i32, y: i32) -> Vec2Fixed {
    Vec2Fixed::new(fixed(x), fixed(y))
}

/// A store with unit cells and the whole main grid marked buildable.
///
/// # Panics
///
/// Panics if `width` or `height` is zero.
#[must_use]
pub fn buildable_store(width: u32, height: u32) -> GridStore {
    let mut store = GridStore::new(width, height, fixed(1), TileVisuals::default());
    let bounds = store.bounds();
    store
        .fill_block(bounds, TileState::Buildable, GridLayer::Main)
        .expect("whole-grid fill is always in bounds");
    store
}

/// A scripted building for exercising the tracker.
///
/// Counts `place` calls through a shared handle so tests can observe the
/// commit after the tracker has given the building away.
pub struct TestBuilding {
    footprint: Footprint,
    placed: bool,
    place_calls: Rc<Cell<u32>>,
}

impl TestBuilding {
    /// Create an unplaced building with the given footprint.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            footprint: Footprint::new(width, height),
            placed: false,
            place_calls: Rc::new(Cell::new(0)),
        }
    }

    /// Shared counter of `place` invocations.
    #[must_use]
    pub fn place_calls(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.place_calls)
    }
}

impl Building for TestBuilding {
    fn footprint(&self) -> Footprint {
        self.footprint
    }

    fn is_placed(&self) -> bool {
        self.placed
    }

    fn place(&mut self) {
        self.placed = true;
        self.place_calls.set(self.place_calls.get() + 1);
    }
}
