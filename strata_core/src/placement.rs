// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile placements: one tile to be drawn in one cell.

use kurbo::Vec2;

use crate::source::TileId;

/// Half-cell nudge flags for a placement.
///
/// An offset flag shifts the placement's rendered position half a cell toward
/// the named edge, letting a tile visually bridge into the neighboring cell
/// (e.g. a wall top leaning into the cell to its right). The flags are baked
/// in by the upstream rule engine; the compositor reads them and never
/// mutates them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OffsetFlags {
    /// Nudged half a cell upward (negative Y).
    pub up: bool,
    /// Nudged half a cell downward (positive Y).
    pub down: bool,
    /// Nudged half a cell leftward (negative X).
    pub left: bool,
    /// Nudged half a cell rightward (positive X).
    pub right: bool,
}

impl OffsetFlags {
    /// No offset in either axis.
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Offset half a cell to the right.
    pub const RIGHT: Self = Self {
        right: true,
        ..Self::NONE
    };

    /// Returns the pixel nudge for these flags, given half the cell edge
    /// length in pixels.
    ///
    /// Up/down subtract/add on Y, left/right subtract/add on X. An unset pair
    /// contributes zero on its axis.
    #[must_use]
    pub fn offset_vec(self, half_cell: f64) -> Vec2 {
        let x = if self.left {
            -half_cell
        } else if self.right {
            half_cell
        } else {
            0.0
        };
        let y = if self.up {
            -half_cell
        } else if self.down {
            half_cell
        } else {
            0.0
        };
        Vec2::new(x, y)
    }
}

/// One tile to be drawn in one cell.
///
/// Placements are produced by the external rule-matching engine and consumed
/// read-only by the compositor. `priority` is the rule engine's rank: lower
/// numeric values were established earlier. Within a [`CellStack`] the
/// element closer to the stack's front is the most recently resolved — and
/// therefore the visually topmost — placement.
///
/// [`CellStack`]: crate::grid::CellStack
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TilePlacement {
    /// Which tile of the owning layer's source to draw.
    pub tile_id: TileId,
    /// Rule-engine rank; lower values were established earlier.
    pub priority: u8,
    /// Half-cell nudge toward a neighboring cell, if any.
    pub offset: OffsetFlags,
    /// Mirror horizontally around the cell's right edge.
    pub flip_x: bool,
    /// Mirror vertically around the cell's bottom edge.
    pub flip_y: bool,
    /// No further rule may add placements beneath this one.
    ///
    /// Informational for tooling; the compositor's ordering decisions never
    /// read it.
    pub terminal: bool,
}

impl TilePlacement {
    /// Creates an unflipped, unoffset, non-terminal placement.
    #[must_use]
    pub const fn new(tile_id: TileId, priority: u8) -> Self {
        Self {
            tile_id,
            priority,
            offset: OffsetFlags::NONE,
            flip_x: false,
            flip_y: false,
            terminal: false,
        }
    }

    /// Returns a copy with the given offset flags.
    #[must_use]
    pub const fn with_offset(mut self, offset: OffsetFlags) -> Self {
        self.offset = offset;
        self
    }

    /// Returns a copy with horizontal mirroring.
    #[must_use]
    pub const fn flipped_x(mut self) -> Self {
        self.flip_x = true;
        self
    }

    /// Returns a copy with vertical mirroring.
    #[must_use]
    pub const fn flipped_y(mut self) -> Self {
        self.flip_y = true;
        self
    }

    /// Returns a copy marked terminal.
    #[must_use]
    pub const fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }
}
