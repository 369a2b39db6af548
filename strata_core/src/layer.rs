// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layers: one tile grid bound to one tile source.
//!
//! A scene stacks layers in *authoring order*: index 0 is the topmost layer,
//! matching the order level files declare them. Scene assembly iterates the
//! list in reverse so the bottom semantic layer paints first and the top
//! layer paints last.

use crate::grid::TileGrid;
use crate::source::SourceId;

/// One layer of a scene: a grid of cell stacks plus its tile source.
///
/// Layers are immutable for the duration of a single compose pass. The rule
/// engine replaces a layer's grid wholesale via [`swap_grid`](Self::swap_grid)
/// between frames; partial in-place edits are not part of the model.
#[derive(Clone, Debug)]
pub struct Layer {
    source: SourceId,
    cell_pixel_size: u32,
    grid: TileGrid,
}

impl Layer {
    /// Creates a layer over the given grid.
    ///
    /// # Panics
    ///
    /// Panics if `cell_pixel_size` is zero.
    #[must_use]
    pub fn new(source: SourceId, cell_pixel_size: u32, grid: TileGrid) -> Self {
        assert!(cell_pixel_size > 0, "cell_pixel_size must be positive");
        Self {
            source,
            cell_pixel_size,
            grid,
        }
    }

    /// The tile source this layer draws from.
    #[must_use]
    pub const fn source(&self) -> SourceId {
        self.source
    }

    /// Square cell edge length in destination pixels.
    #[must_use]
    pub const fn cell_pixel_size(&self) -> u32 {
        self.cell_pixel_size
    }

    /// The current placement grid snapshot.
    #[must_use]
    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Swaps in a freshly generated grid, returning the old snapshot.
    ///
    /// This is the only way the rule engine hands the layer new content: a
    /// whole-grid swap, never an in-place edit, so a compose pass always
    /// reads one fully formed snapshot. A multi-threaded port must keep this
    /// an atomic exchange (e.g. double-buffering).
    pub fn swap_grid(&mut self, grid: TileGrid) -> TileGrid {
        core::mem::replace(&mut self.grid, grid)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::grid::CellStack;
    use crate::placement::TilePlacement;
    use crate::source::TileId;

    #[test]
    fn swap_grid_returns_old_snapshot() {
        let mut old = TileGrid::new(1, 1);
        old.set(
            0,
            0,
            CellStack::from_front_to_back(vec![TilePlacement::new(TileId(3), 0)]),
        );
        let mut layer = Layer::new(SourceId(0), 16, old.clone());

        let replaced = layer.swap_grid(TileGrid::new(1, 1));
        assert_eq!(replaced, old);
        assert!(layer.grid().is_blank());
    }

    #[test]
    #[should_panic(expected = "cell_pixel_size must be positive")]
    fn zero_cell_size_panics() {
        let _ = Layer::new(SourceId(0), 0, TileGrid::new(1, 1));
    }
}
