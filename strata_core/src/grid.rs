// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell stacks and the per-layer tile grid.
//!
//! A [`CellStack`] is the ordered set of placements occupying one cell; a
//! [`TileGrid`] is a rectangular row-major grid of cell stacks, regenerated
//! wholesale by the external rule engine and read by the compositor.
//!
//! # Ordering invariant
//!
//! The stack is authored front-to-back: **index 0 is the visually topmost
//! placement**. Paint order is the reverse — the rear element is drawn first
//! and the front element last. This is an explicit invariant of the type,
//! not an artifact of iteration direction; every consumer of a stack must
//! honor it.

use alloc::vec::Vec;

use crate::placement::TilePlacement;

/// The ordered placements occupying one cell on one layer.
///
/// Front (index 0) is topmost; see the [module docs](self) for the ordering
/// invariant. Stacks are small — the rule engine bounds them (typically ≤ 8
/// entries) — and may be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellStack {
    placements: Vec<TilePlacement>,
}

impl CellStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            placements: Vec::new(),
        }
    }

    /// Creates a stack from placements in front-to-back order.
    #[must_use]
    pub fn from_front_to_back(placements: Vec<TilePlacement>) -> Self {
        Self { placements }
    }

    /// Pushes a placement beneath the current rear (it will paint first).
    pub fn push_under(&mut self, placement: TilePlacement) {
        self.placements.push(placement);
    }

    /// Returns the topmost placement, if the stack is non-empty.
    #[must_use]
    pub fn front(&self) -> Option<&TilePlacement> {
        self.placements.first()
    }

    /// Returns the placement at `index` (0 = front/topmost).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TilePlacement> {
        self.placements.get(index)
    }

    /// Number of placements in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Returns `true` if the stack holds no placements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Iterates placements front-to-back (topmost first).
    pub fn iter(&self) -> core::slice::Iter<'_, TilePlacement> {
        self.placements.iter()
    }

    /// Returns the placements as a front-to-back slice.
    #[must_use]
    pub fn as_slice(&self) -> &[TilePlacement] {
        &self.placements
    }
}

impl<'a> IntoIterator for &'a CellStack {
    type Item = &'a TilePlacement;
    type IntoIter = core::slice::Iter<'a, TilePlacement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}

/// A rectangular, row-major grid of [`CellStack`]s for one layer.
///
/// Grids are immutable for the duration of a compose pass. The rule engine
/// regenerates them wholesale and swaps them in between frames (see
/// [`Layer::swap_grid`](crate::layer::Layer::swap_grid)); nothing mutates a
/// grid in place while a pass is reading it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    /// Row-major: `y * width + x`.
    cells: Vec<CellStack>,
}

impl TileGrid {
    /// Creates a grid of the given dimensions with every cell empty.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut cells = Vec::new();
        cells.resize_with((width as usize) * (height as usize), CellStack::new);
        Self {
            width,
            height,
            cells,
        }
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the stack at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the grid — out-of-bounds access
    /// is a caller logic error, not a runtime condition.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> &CellStack {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) out of range ({}x{})",
            self.width,
            self.height
        );
        &self.cells[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Returns the stack at `(x, y)` mutably.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the grid.
    pub fn get_mut(&mut self, x: u32, y: u32) -> &mut CellStack {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) out of range ({}x{})",
            self.width,
            self.height
        );
        &mut self.cells[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Replaces the stack at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the grid.
    pub fn set(&mut self, x: u32, y: u32, stack: CellStack) {
        *self.get_mut(x, y) = stack;
    }

    /// Returns `true` if every cell in the grid is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellStack::is_empty)
    }
}
