//! Tile-state to visual-asset configuration.
//!
//! The renderer owns the actual tile assets; the core only carries the
//! asset *names* so callers can look up what to draw for each
//! [`TileState`]. The mapping is plain data, sourced once by the
//! composition root (typically from a RON file) and injected into
//! [`crate::grid::GridStore::new`]. There is no global table.

use serde::{Deserialize, Serialize};

use crate::grid::TileState;

/// Asset names for each paintable tile state.
///
/// [`TileState::Empty`] never maps to an asset: an empty cell draws nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileVisuals {
    /// Asset for cells open to placement.
    pub buildable: String,
    /// Asset for a fully-valid ghost overlay and committed buildings.
    pub valid: String,
    /// Asset for an invalid ghost overlay.
    pub invalid: String,
}

impl Default for TileVisuals {
    fn default() -> Self {
        Self {
            buildable: "white".to_string(),
            valid: "green".to_string(),
            invalid: "red".to_string(),
        }
    }
}

impl TileVisuals {
    /// Look up the asset name for a tile state.
    ///
    /// Returns `None` for [`TileState::Empty`].
    #[must_use]
    pub fn asset(&self, state: TileState) -> Option<&str> {
        match state {
            TileState::Empty => None,
            TileState::Buildable => Some(&self.buildable),
            TileState::Valid => Some(&self.valid),
            TileState::Invalid => Some(&self.invalid),
        }
    }

    /// Parse a mapping from RON text.
    pub fn from_ron(text: &str) -> std::result::Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}
