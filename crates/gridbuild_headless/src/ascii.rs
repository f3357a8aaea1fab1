//! ASCII grid rendering for terminal review.
//!
//! Composes the preview overlay on top of the main grid, one character per
//! cell, row 0 at the top.

use gridbuild_core::grid::{GridLayer, GridStore, TileState};

/// Character for a main-grid cell.
fn main_char(state: TileState) -> char {
    match state {
        TileState::Empty => ' ',
        TileState::Buildable => '.',
        TileState::Valid => '#',
        TileState::Invalid => 'X',
    }
}

/// Character for a preview-overlay cell, `None` when the overlay is clear.
fn overlay_char(state: TileState) -> Option<char> {
    match state {
        TileState::Empty => None,
        TileState::Buildable => Some('?'),
        TileState::Valid => Some('+'),
        TileState::Invalid => Some('x'),
    }
}

/// Render the composed grid, one string per row.
///
/// Preview cells win over main cells, matching what the player would see
/// with the ghost overlay drawn on top of the world.
#[must_use]
pub fn render_grid(store: &GridStore) -> Vec<String> {
    let mut rows = Vec::with_capacity(store.height() as usize);
    for y in 0..store.height() {
        let mut row = String::with_capacity(store.width() as usize);
        for x in 0..store.width() {
            let main = store
                .get_cell(x, y, GridLayer::Main)
                .map_or(' ', main_char);
            let cell = store
                .get_cell(x, y, GridLayer::Preview)
                .and_then(overlay_char)
                .unwrap_or(main);
            row.push(cell);
        }
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbuild_test_utils::fixtures::buildable_store;

    #[test]
    fn test_render_overlay_wins() {
        let mut store = buildable_store(3, 2);
        store.set_cell(0, 0, GridLayer::Main, TileState::Valid);
        store.set_cell(1, 0, GridLayer::Preview, TileState::Valid);
        store.set_cell(2, 1, GridLayer::Preview, TileState::Invalid);

        let rows = render_grid(&store);
        assert_eq!(rows, vec!["#+.".to_string(), "..x".to_string()]);
    }
}
