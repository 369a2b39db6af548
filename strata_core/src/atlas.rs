// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atlas index: tile id → source rectangle lookup for one tile source.
//!
//! An [`AtlasIndex`] is built once at load time by walking the tile ids the
//! source's active rules actually reference — not every tile the image
//! contains, since sources are often sparsely used. It is read-only
//! thereafter; if the rule set changes which ids are referenced, the loader
//! rebuilds the index from scratch.

use alloc::collections::BTreeMap;

use kurbo::Rect;

use crate::error::ComposeError;
use crate::source::{SourceId, TileId};

/// Maps tile ids to their pixel rectangles within one tile source's image.
#[derive(Clone, Debug)]
pub struct AtlasIndex {
    source: SourceId,
    cell_pixel_size: u32,
    rects: BTreeMap<TileId, Rect>,
}

impl AtlasIndex {
    /// Creates an empty index for `source` with the given grid spacing.
    ///
    /// # Panics
    ///
    /// Panics if `cell_pixel_size` is zero.
    #[must_use]
    pub fn new(source: SourceId, cell_pixel_size: u32) -> Self {
        assert!(cell_pixel_size > 0, "cell_pixel_size must be positive");
        Self {
            source,
            cell_pixel_size,
            rects: BTreeMap::new(),
        }
    }

    /// The tile source this index describes.
    #[must_use]
    pub const fn source(&self) -> SourceId {
        self.source
    }

    /// Square cell edge length of the source's native grid, in pixels.
    #[must_use]
    pub const fn cell_pixel_size(&self) -> u32 {
        self.cell_pixel_size
    }

    /// Registers `tile_id` at the source's native grid position
    /// `(column, row)`.
    ///
    /// The rectangle is `(column * s, row * s, s, s)` for cell pixel size
    /// `s`. Inserting an already-indexed id is a no-op (first registration
    /// wins), so construction is idempotent and independent of the order
    /// rules are walked in.
    pub fn insert(&mut self, tile_id: TileId, column: u16, row: u16) {
        let s = f64::from(self.cell_pixel_size);
        self.rects.entry(tile_id).or_insert_with(|| {
            Rect::from_origin_size((f64::from(column) * s, f64::from(row) * s), (s, s))
        });
    }

    /// Resolves a tile id to its source rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::TileNotIndexed`] if no active rule of this
    /// source ever referenced `tile_id`. That indicates a caller logic error
    /// (the placement names a tile its own source never registered), not a
    /// condition to recover from.
    pub fn resolve(&self, tile_id: TileId) -> Result<Rect, ComposeError> {
        self.rects
            .get(&tile_id)
            .copied()
            .ok_or(ComposeError::TileNotIndexed {
                source: self.source,
                tile: tile_id,
            })
    }

    /// Returns `true` if `tile_id` is registered.
    #[must_use]
    pub fn contains(&self, tile_id: TileId) -> bool {
        self.rects.contains_key(&tile_id)
    }

    /// Number of registered tile ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Returns `true` if no tile ids are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}
