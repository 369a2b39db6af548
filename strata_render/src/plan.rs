// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw plan: an ordered sequence of draw commands for one frame.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};

use strata_core::source::{SourceId, TileId};

/// A single blit in the draw plan.
///
/// Commands are produced in back-to-front paint order: earlier commands are
/// visually underneath later ones. The destination is in pixels, not cells;
/// pivot and per-axis ±1 scale express mirroring around a cell edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    /// Authoring index of the layer this command originates from.
    pub layer_index: u32,
    /// The tile source whose image supplies the pixels.
    pub source: SourceId,
    /// Which tile of the source is drawn.
    pub tile_id: TileId,
    /// Source rectangle within the tile source's image.
    pub src_rect: Rect,
    /// Destination position in output pixels (cell origin plus any
    /// half-cell offset).
    pub dest: Point,
    /// Pivot the scale is applied around, relative to the destination.
    pub pivot: Point,
    /// Per-axis mirroring scale: each component is `+1.0` or `-1.0`.
    pub scale: Vec2,
}

/// An ordered list of draw commands for a single frame.
///
/// Rendering surfaces translate this into blits or GPU draw calls; the plan
/// itself carries no pixels.
#[derive(Clone, Debug, Default)]
pub struct DrawPlan {
    /// Draw commands in back-to-front paint order.
    pub commands: Vec<DrawCommand>,
}

impl DrawPlan {
    /// Creates an empty draw plan.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of commands in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if the plan holds no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterates commands in paint order.
    pub fn iter(&self) -> core::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }
}

impl<'a> IntoIterator for &'a DrawPlan {
    type Item = &'a DrawCommand;
    type IntoIter = core::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
