// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable synthetic level fixtures for demo harnesses and tests.
//!
//! The rule-matching engine that produces placement grids in production is
//! an external collaborator; demos and tests need grids without it. This
//! crate fabricates them: [`GridSketch`] for hand-authored cell stacks,
//! [`scatter`] for deterministic pseudo-random fill, and [`uniform_atlas`]
//! for the sequential tile registrations a loader would perform.
//!
//! Nothing here pattern-matches anything — fixtures produce placements
//! directly, which is exactly the shape of input the compositor consumes.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use strata_core::atlas::AtlasIndex;
use strata_core::grid::{CellStack, TileGrid};
use strata_core::placement::{OffsetFlags, TilePlacement};
use strata_core::source::{SourceId, TileId};

/// A tiny deterministic generator (SplitMix64) for fixture randomness.
///
/// Deliberately not a `rand` dependency: fixtures must reproduce bit-for-bit
/// from a seed across platforms, and two shifts and a multiply are all the
/// quality scattering tiles needs.
#[derive(Clone, Debug)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Creates a generator from a seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Returns the next value in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Returns a value in `0..bound` (`bound` must be non-zero).
    pub fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }

    /// Returns `true` roughly once per `denominator` calls.
    pub fn one_in(&mut self, denominator: u64) -> bool {
        self.below(denominator) == 0
    }
}

/// A hand-authored grid under construction.
///
/// Stacks are given front-to-back (topmost placement first), matching the
/// [`CellStack`] ordering invariant.
#[derive(Debug)]
pub struct GridSketch {
    grid: TileGrid,
}

impl GridSketch {
    /// Starts a sketch of the given dimensions with every cell empty.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            grid: TileGrid::new(width, height),
        }
    }

    /// Places a stack at `(x, y)`, front-to-back.
    #[must_use]
    pub fn stack(mut self, x: u32, y: u32, placements: &[TilePlacement]) -> Self {
        self.grid
            .set(x, y, CellStack::from_front_to_back(placements.to_vec()));
        self
    }

    /// Places a single-placement stack of `tile` at `(x, y)`.
    #[must_use]
    pub fn tile(self, x: u32, y: u32, tile: u32, priority: u8) -> Self {
        self.stack(x, y, &[TilePlacement::new(TileId(tile), priority)])
    }

    /// Fills the rectangle `(x0..x1, y0..y1)` with single-placement stacks
    /// of `tile`.
    #[must_use]
    pub fn fill(mut self, x0: u32, y0: u32, x1: u32, y1: u32, tile: u32, priority: u8) -> Self {
        for y in y0..y1 {
            for x in x0..x1 {
                self.grid.set(
                    x,
                    y,
                    CellStack::from_front_to_back(
                        [TilePlacement::new(TileId(tile), priority)].to_vec(),
                    ),
                );
            }
        }
        self
    }

    /// Finishes the sketch.
    #[must_use]
    pub fn build(self) -> TileGrid {
        self.grid
    }
}

/// Fabricates a dense pseudo-random grid for stress use.
///
/// Roughly four of five cells get one or two placements drawn from `tiles`,
/// with occasional right offsets (the deferral trigger), up/down offsets,
/// and mirroring — the mix an auto-tiling rule set tends to produce. The
/// same seed always yields the same grid.
///
/// # Panics
///
/// Panics if `tiles` is empty.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "draws are bounded by tiny fixture constants"
)]
pub fn scatter(seed: u64, width: u32, height: u32, tiles: &[u32]) -> TileGrid {
    assert!(!tiles.is_empty(), "scatter needs at least one tile id");
    let mut rng = SplitMix64::new(seed);
    let mut grid = TileGrid::new(width, height);

    for y in 0..height {
        for x in 0..width {
            if rng.one_in(5) {
                continue;
            }

            let mut placements: Vec<TilePlacement> = Vec::new();
            let count = 1 + usize::from(rng.one_in(3));
            for _ in 0..count {
                let tile = tiles[rng.below(tiles.len() as u64) as usize];
                let priority = rng.below(8) as u8;
                let mut p = TilePlacement::new(TileId(tile), priority);
                if rng.one_in(6) {
                    p = p.with_offset(OffsetFlags::RIGHT);
                } else if rng.one_in(8) {
                    p = p.with_offset(OffsetFlags {
                        down: rng.one_in(2),
                        up: false,
                        left: false,
                        right: false,
                    });
                }
                if rng.one_in(7) {
                    p = p.flipped_x();
                }
                if rng.one_in(9) {
                    p = p.flipped_y();
                }
                placements.push(p);
            }
            // Front placement last resolved: give it the highest priority.
            placements.sort_by(|a, b| b.priority.cmp(&a.priority));
            grid.set(x, y, CellStack::from_front_to_back(placements));
        }
    }

    grid
}

/// Builds an atlas index the way a loader would for a source whose active
/// rules reference `tiles`: sequential native grid coordinates, `columns`
/// tiles per row.
///
/// # Panics
///
/// Panics if `columns` is zero.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "atlas coordinates are bounded by the tile list length"
)]
pub fn uniform_atlas(
    source: SourceId,
    cell_pixel_size: u32,
    columns: u16,
    tiles: &[u32],
) -> AtlasIndex {
    assert!(columns > 0, "atlas needs at least one column");
    let mut atlas = AtlasIndex::new(source, cell_pixel_size);
    for (i, &id) in tiles.iter().enumerate() {
        let column = (i % usize::from(columns)) as u16;
        let row = (i / usize::from(columns)) as u16;
        atlas.insert(TileId(id), column, row);
    }
    atlas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix_is_deterministic() {
        let mut a = SplitMix64::new(42);
        let mut b = SplitMix64::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn scatter_reproduces_from_seed() {
        let a = scatter(7, 10, 6, &[1, 2, 3]);
        let b = scatter(7, 10, 6, &[1, 2, 3]);
        assert_eq!(a, b);
    }

    #[test]
    fn scatter_differs_across_seeds() {
        let a = scatter(1, 10, 6, &[1, 2, 3]);
        let b = scatter(2, 10, 6, &[1, 2, 3]);
        assert_ne!(a, b);
    }

    #[test]
    fn scatter_stacks_keep_front_highest_priority() {
        let grid = scatter(11, 16, 16, &[1, 2, 3, 4]);
        for y in 0..16 {
            for x in 0..16 {
                let stack = grid.get(x, y);
                if stack.len() == 2 {
                    assert!(
                        stack.get(0).unwrap().priority >= stack.get(1).unwrap().priority,
                        "front placement must not be outranked within its stack"
                    );
                }
            }
        }
    }

    #[test]
    fn sketch_places_and_fills() {
        let grid = GridSketch::new(4, 4)
            .fill(0, 0, 4, 1, 9, 0)
            .tile(2, 2, 5, 1)
            .build();
        assert_eq!(grid.get(3, 0).front().unwrap().tile_id, TileId(9));
        assert_eq!(grid.get(2, 2).front().unwrap().tile_id, TileId(5));
        assert!(grid.get(0, 1).is_empty());
    }

    #[test]
    fn uniform_atlas_wraps_rows() {
        let atlas = uniform_atlas(SourceId(0), 16, 3, &[10, 11, 12, 13]);
        // Fourth tile wraps to the second row.
        let rect = atlas.resolve(TileId(13)).unwrap();
        assert_eq!((rect.x0, rect.y0), (0.0, 16.0));
    }
}
