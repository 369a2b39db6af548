// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile and tile-source identity types.
//!
//! [`SourceId`] identifies one tile source — a pixel image cut into square
//! regions on a fixed grid. [`TileId`] identifies one such region within its
//! source. Both are assigned by the level loader; core code passes them
//! through without interpreting the values.

use core::fmt;

/// Identifies one tile within a tile source's atlas.
///
/// Tile ids are native to their source: the same numeric id in two different
/// sources names two unrelated tiles.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(pub u32);

impl fmt::Debug for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileId({})", self.0)
    }
}

/// Identifies a tile source (one pixel image plus its grid spacing).
///
/// The loader collaborator assigns source ids and owns the pixel data; the
/// compositor only ever resolves rectangles against a source's
/// [`AtlasIndex`](crate::atlas::AtlasIndex).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourceId(pub u32);

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}
