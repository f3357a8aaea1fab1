//! Tile states, cell areas, and the two-layer grid store.
//!
//! The store owns two parallel grids of [`TileState`]:
//!
//! - **main** - the authoritative world: the buildable zone and every
//!   committed building.
//! - **preview** - the ephemeral ghost overlay, cleared and redrawn whenever
//!   the ghost moves.
//!
//! Invariant: a preview cell is non-[`TileState::Empty`] only while a ghost
//! building currently overlaps it.

use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::visuals::TileVisuals;

/// Grid cell coordinates as `(x, y)`.
pub type CellPos = (u32, u32);

/// Semantic state of a grid cell, decoupled from its visual representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileState {
    /// Nothing here; outside the buildable zone, or no overlay.
    #[default]
    Empty,
    /// Placement is currently permitted on this main-grid cell.
    Buildable,
    /// Committed building on main, or a fully-valid ghost on preview.
    Valid,
    /// Ghost overlay over at least one non-buildable cell.
    Invalid,
}

/// Which of the store's two grids an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridLayer {
    /// The authoritative world grid.
    Main,
    /// The ghost overlay grid.
    Preview,
}

/// An axis-aligned rectangular region of cells: origin plus size.
///
/// A zero-width or zero-height area is valid and covers no cells; every
/// block operation treats it as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellArea {
    /// Origin cell X.
    pub x: u32,
    /// Origin cell Y.
    pub y: u32,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
}

impl CellArea {
    /// Create a new cell area.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Total number of cells this area covers.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Whether this area covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Iterate the covered cells in row-major order.
    ///
    /// Row-major scan order is part of the contract: it matches the element
    /// order of [`GridStore::read_block`].
    pub fn cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        let (x, y, w) = (self.x, self.y, self.width);
        (0..self.height).flat_map(move |dy| (0..w).map(move |dx| (x + dx, y + dy)))
    }

    /// Whether a cell lies inside this area.
    #[must_use]
    pub fn contains(&self, pos: CellPos) -> bool {
        let (cx, cy) = pos;
        cx >= self.x
            && cy >= self.y
            && (cx as u64) < self.x as u64 + self.width as u64
            && (cy as u64) < self.y as u64 + self.height as u64
    }
}

/// Two-layer tile grid plus the injected tile-to-visual mapping.
///
/// Both grids are mutated exclusively through the store's own methods; there
/// is no direct cell access for callers outside targeted `set_cell` writes
/// (level setup, tests).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridStore {
    /// Grid width in cells.
    width: u32,
    /// Grid height in cells.
    height: u32,
    /// Main grid cells in row-major order.
    main: Vec<TileState>,
    /// Preview grid cells in row-major order.
    preview: Vec<TileState>,
    /// Size of each cell in world units.
    #[serde(with = "fixed_serde")]
    cell_size: Fixed,
    /// Tile-state to asset-name mapping, injected by the composition root.
    visuals: TileVisuals,
}

impl GridStore {
    /// Create a new store with both grids fully [`TileState::Empty`].
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero, or if `cell_size` is not
    /// positive.
    #[must_use]
    pub fn new(width: u32, height: u32, cell_size: Fixed, visuals: TileVisuals) -> Self {
        assert!(width > 0, "GridStore width must be positive");
        assert!(height > 0, "GridStore height must be positive");
        assert!(cell_size > Fixed::ZERO, "GridStore cell_size must be positive");

        let cell_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            main: vec![TileState::Empty; cell_count],
            preview: vec![TileState::Empty; cell_count],
            cell_size,
            visuals,
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell size in world units.
    #[must_use]
    pub const fn cell_size(&self) -> Fixed {
        self.cell_size
    }

    /// The area covering the whole grid.
    #[must_use]
    pub const fn bounds(&self) -> CellArea {
        CellArea::new(0, 0, self.width, self.height)
    }

    /// The injected tile visual mapping.
    #[must_use]
    pub const fn visuals(&self) -> &TileVisuals {
        &self.visuals
    }

    /// Convert (x, y) coordinates to grid index.
    #[inline]
    fn coords_to_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    fn layer(&self, layer: GridLayer) -> &[TileState] {
        match layer {
            GridLayer::Main => &self.main,
            GridLayer::Preview => &self.preview,
        }
    }

    fn layer_mut(&mut self, layer: GridLayer) -> &mut [TileState] {
        match layer {
            GridLayer::Main => &mut self.main,
            GridLayer::Preview => &mut self.preview,
        }
    }

    /// Check if coordinates are within grid bounds.
    #[must_use]
    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Check that an area lies fully within the grid.
    ///
    /// An empty area always passes: it covers no cells.
    fn check_area(&self, area: CellArea) -> Result<()> {
        if area.is_empty() {
            return Ok(());
        }
        let fits_x = area.x as u64 + area.width as u64 <= u64::from(self.width);
        let fits_y = area.y as u64 + area.height as u64 <= u64::from(self.height);
        if fits_x && fits_y {
            Ok(())
        } else {
            Err(PlacementError::OutOfBounds {
                area,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Get the state of one cell on a layer.
    /// Returns `None` if out of bounds.
    #[must_use]
    pub fn get_cell(&self, x: u32, y: u32, layer: GridLayer) -> Option<TileState> {
        if self.in_bounds(x, y) {
            Some(self.layer(layer)[self.coords_to_index(x, y)])
        } else {
            None
        }
    }

    /// Set the state of one cell on a layer.
    /// Returns `false` if out of bounds.
    pub fn set_cell(&mut self, x: u32, y: u32, layer: GridLayer, state: TileState) -> bool {
        if self.in_bounds(x, y) {
            let index = self.coords_to_index(x, y);
            self.layer_mut(layer)[index] = state;
            true
        } else {
            false
        }
    }

    /// Read the main grid's states for every cell of `area`, row-major.
    ///
    /// Does not mutate any state. An empty area yields an empty vector.
    pub fn read_block(&self, area: CellArea) -> Result<Vec<TileState>> {
        self.check_area(area)?;
        let mut states = Vec::with_capacity(area.cell_count());
        for (x, y) in area.cells() {
            states.push(self.main[self.coords_to_index(x, y)]);
        }
        Ok(states)
    }

    /// Set every cell of `area` on `layer` to `state`.
    ///
    /// Overwrites unconditionally; there are no merge semantics. An empty
    /// area is a no-op.
    pub fn fill_block(&mut self, area: CellArea, state: TileState, layer: GridLayer) -> Result<()> {
        self.check_area(area)?;
        for (x, y) in area.cells() {
            let index = self.coords_to_index(x, y);
            self.layer_mut(layer)[index] = state;
        }
        Ok(())
    }

    /// Set every cell of `area` on `layer` back to [`TileState::Empty`].
    pub fn clear_block(&mut self, area: CellArea, layer: GridLayer) -> Result<()> {
        self.fill_block(area, TileState::Empty, layer)
    }

    /// Whether every main-grid cell of `area` is [`TileState::Buildable`].
    ///
    /// An out-of-bounds area is simply not buildable. The scan stops at the
    /// first offending cell.
    #[must_use]
    pub fn is_area_buildable(&self, area: CellArea) -> bool {
        if self.check_area(area).is_err() {
            return false;
        }
        area.cells()
            .all(|(x, y)| self.main[self.coords_to_index(x, y)] == TileState::Buildable)
    }

    /// Convert a world position to the cell containing it.
    ///
    /// Returns `None` if the position is outside the grid bounds.
    #[must_use]
    pub fn world_to_cell(&self, pos: Vec2Fixed) -> Option<CellPos> {
        if pos.x < Fixed::ZERO || pos.y < Fixed::ZERO {
            return None;
        }

        let x = (pos.x / self.cell_size).to_num::<i64>();
        let y = (pos.y / self.cell_size).to_num::<i64>();

        if x >= 0 && x < i64::from(self.width) && y >= 0 && y < i64::from(self.height) {
            Some((x as u32, y as u32))
        } else {
            None
        }
    }

    /// Convert cell coordinates to the world position of the cell's center.
    #[must_use]
    pub fn cell_to_world_center(&self, pos: CellPos) -> Vec2Fixed {
        let half = self.cell_size / Fixed::from_num(2);
        Vec2Fixed::new(
            Fixed::from_num(pos.0) * self.cell_size + half,
            Fixed::from_num(pos.1) * self.cell_size + half,
        )
    }
}
