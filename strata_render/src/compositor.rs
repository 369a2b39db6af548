// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer draw-order resolution, including cross-cell deferral.
//!
//! [`compose_layer`] walks one layer's grid in row-major order and appends
//! draw commands to a [`DrawPlan`] such that:
//!
//! - within a cell, placements paint in reverse of their authored stack
//!   order (rear element first, front element last — see the ordering
//!   invariant on [`CellStack`]);
//! - a placement nudged half a cell to the right over a non-empty neighbor
//!   is *deferred*: it and every placement in front of it in its stack are
//!   withheld as a unit until the neighbor's priorities are known, then
//!   flushed either underneath or on top of the neighbor's commands.
//!
//! # The deferral state machine
//!
//! Deferral is a two-state machine, [`Idle`](Deferral::Idle) and
//! [`Pending`](Deferral::Pending), with these transitions:
//!
//! 1. **Begin** — while painting a cell rear-to-front, the first placement
//!    carrying a right offset whose right neighbor exists and is non-empty
//!    becomes pending together with everything in front of it; painting of
//!    that cell stops. A unit already pending from an earlier cell is
//!    flushed first rather than silently dropped.
//! 2. **Flush under** — before painting a placement of a *different* cell,
//!    if the pending priority is numerically greater than that placement's
//!    priority, the unit flushes now, placing it underneath what the cell
//!    paints next.
//! 3. **Flush over** — after a different, non-empty cell finishes, if the
//!    pending priority is numerically less than that cell's front
//!    (topmost) priority, the unit flushes now, placing it on top of the
//!    cell just painted.
//! 4. **Row end** — a unit still pending when the row ends flushes
//!    unconditionally; an offset tile never leaks into the next row.
//!
//! The `>` / `<` operator asymmetry between transitions 2 and 3 is
//! deliberate and load-bearing: it reproduces the shipped behavior of the
//! authored content this compositor exists to paint. Equal priorities
//! trigger neither transition, so such a unit rides along until the row
//! ends.
//!
//! Only horizontal (right) deferral exists. A symmetric vertical mechanism
//! for down-offset tiles would need a tie-break that authored content has
//! never pinned down, so it is intentionally absent rather than guessed at.
//!
//! [`CellStack`]: strata_core::grid::CellStack

use alloc::collections::BTreeSet;

use kurbo::{Point, Vec2};

use strata_core::atlas::AtlasIndex;
use strata_core::grid::TileGrid;
use strata_core::layer::Layer;
use strata_core::placement::TilePlacement;
use strata_core::source::{SourceId, TileId};
use strata_core::trace::{PlacementSkippedEvent, Tracer};
#[cfg(feature = "trace-rich")]
use strata_core::trace::{DeferralAction, DeferralEvent};

use crate::plan::{DrawCommand, DrawPlan};

/// Per-layer counters returned by [`compose_layer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerStats {
    /// Draw commands appended for this layer.
    pub commands: u32,
    /// Placements skipped because their tile id was never indexed.
    pub placements_skipped: u32,
}

/// Cross-cell deferral state.
///
/// At most one unit is pending at a time; the unit is identified by its
/// cell and the stack index it starts at, so flushing re-reads the
/// placements from the (immutable) grid snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Deferral {
    /// Nothing is deferred.
    Idle,
    /// The placements `0..=start_index` of cell `(cell_x, cell_y)` await a
    /// flush decision.
    Pending {
        cell_x: u32,
        cell_y: u32,
        start_index: usize,
        priority: u8,
    },
}

/// Composes one layer into `plan`, appending commands in paint order.
///
/// `seen_unindexed` deduplicates [`PlacementSkippedEvent`]s across the whole
/// pass; scene assembly shares one set across layers so a bad tile id
/// reports once per pass even when sources are shared. Failures never abort
/// the layer: an unindexed placement is skipped and everything else still
/// paints.
pub fn compose_layer(
    layer_index: u32,
    layer: &Layer,
    atlas: &AtlasIndex,
    frame_index: u64,
    plan: &mut DrawPlan,
    tracer: &mut Tracer<'_>,
    seen_unindexed: &mut BTreeSet<(SourceId, TileId)>,
) -> LayerStats {
    let grid = layer.grid();
    let cell_size = f64::from(layer.cell_pixel_size());
    let half_cell = cell_size * 0.5;

    let mut stats = LayerStats::default();
    let cx = EmitCx {
        layer_index,
        source: layer.source(),
        atlas,
        frame_index,
        cell_size,
        half_cell,
    };

    for cell_y in 0..grid.height() {
        // Each row starts Idle; transition 4 below guarantees it.
        let mut deferral = Deferral::Idle;

        for cell_x in 0..grid.width() {
            let stack = grid.get(cell_x, cell_y);

            // Paint rear-to-front (highest index first).
            for index in (0..stack.len()).rev() {
                let placement = &stack.as_slice()[index];

                // Transition 1: begin a deferral.
                if placement.offset.right
                    && cell_x + 1 < grid.width()
                    && !grid.get(cell_x + 1, cell_y).is_empty()
                {
                    if let Deferral::Pending { .. } = deferral {
                        // A unit from an earlier cell is still pending; a
                        // dropped draw is never acceptable, so flush it
                        // before it is displaced.
                        flush(
                            &mut deferral,
                            grid,
                            plan,
                            tracer,
                            seen_unindexed,
                            &mut stats,
                            &cx,
                            FlushCause::Displaced,
                        );
                    }
                    deferral = Deferral::Pending {
                        cell_x,
                        cell_y,
                        start_index: index,
                        priority: placement.priority,
                    };
                    #[cfg(feature = "trace-rich")]
                    #[expect(
                        clippy::cast_possible_truncation,
                        reason = "stack depth never approaches u8::MAX"
                    )]
                    tracer.deferral(&DeferralEvent {
                        layer_index,
                        cell_x,
                        cell_y,
                        start_index: index as u8,
                        priority: placement.priority,
                        action: DeferralAction::Begin,
                    });
                    // The rest of this stack (this placement and everything
                    // in front of it) is the deferred unit.
                    break;
                }

                // Transition 2: flush under a higher-significance placement.
                if let Deferral::Pending {
                    cell_x: pending_x,
                    priority,
                    ..
                } = deferral
                    && pending_x != cell_x
                    && priority > placement.priority
                {
                    flush(
                        &mut deferral,
                        grid,
                        plan,
                        tracer,
                        seen_unindexed,
                        &mut stats,
                        &cx,
                        FlushCause::Under,
                    );
                }

                emit(
                    plan,
                    tracer,
                    seen_unindexed,
                    &mut stats,
                    &cx,
                    placement,
                    cell_x,
                    cell_y,
                );
            }

            // Transition 3: flush over a finished lower-ranked cell.
            if let Deferral::Pending {
                cell_x: pending_x,
                priority,
                ..
            } = deferral
                && pending_x != cell_x
                && let Some(front) = stack.front()
                && priority < front.priority
            {
                flush(
                    &mut deferral,
                    grid,
                    plan,
                    tracer,
                    seen_unindexed,
                    &mut stats,
                    &cx,
                    FlushCause::Over,
                );
            }
        }

        // Transition 4: nothing pending may survive the row.
        if let Deferral::Pending { .. } = deferral {
            flush(
                &mut deferral,
                grid,
                plan,
                tracer,
                seen_unindexed,
                &mut stats,
                &cx,
                FlushCause::RowEnd,
            );
        }
    }

    stats
}

/// Why a pending unit is being flushed (mapped to trace actions).
#[derive(Clone, Copy, Debug)]
enum FlushCause {
    Under,
    Over,
    RowEnd,
    Displaced,
}

/// Everything [`emit`] needs that is constant for one layer.
struct EmitCx<'a> {
    layer_index: u32,
    source: SourceId,
    atlas: &'a AtlasIndex,
    frame_index: u64,
    cell_size: f64,
    half_cell: f64,
}

/// Paints a pending unit rear-to-front and returns the machine to Idle.
fn flush(
    deferral: &mut Deferral,
    grid: &TileGrid,
    plan: &mut DrawPlan,
    tracer: &mut Tracer<'_>,
    seen_unindexed: &mut BTreeSet<(SourceId, TileId)>,
    stats: &mut LayerStats,
    cx: &EmitCx<'_>,
    cause: FlushCause,
) {
    let Deferral::Pending {
        cell_x,
        cell_y,
        start_index,
        priority,
    } = *deferral
    else {
        unreachable!("flush is only called with a pending unit");
    };

    #[cfg(feature = "trace-rich")]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "stack depth never approaches u8::MAX"
    )]
    tracer.deferral(&DeferralEvent {
        layer_index: cx.layer_index,
        cell_x,
        cell_y,
        start_index: start_index as u8,
        priority,
        action: match cause {
            FlushCause::Under => DeferralAction::FlushUnder,
            FlushCause::Over => DeferralAction::FlushOver,
            FlushCause::RowEnd => DeferralAction::FlushRowEnd,
            FlushCause::Displaced => DeferralAction::FlushDisplaced,
        },
    });
    #[cfg(not(feature = "trace-rich"))]
    {
        _ = (priority, cause);
    }

    let stack = grid.get(cell_x, cell_y);
    for index in (0..=start_index).rev() {
        emit(
            plan,
            tracer,
            seen_unindexed,
            stats,
            cx,
            &stack.as_slice()[index],
            cell_x,
            cell_y,
        );
    }

    *deferral = Deferral::Idle;
}

/// Appends one draw command, or skips it if the tile id is unindexed.
fn emit(
    plan: &mut DrawPlan,
    tracer: &mut Tracer<'_>,
    seen_unindexed: &mut BTreeSet<(SourceId, TileId)>,
    stats: &mut LayerStats,
    cx: &EmitCx<'_>,
    placement: &TilePlacement,
    cell_x: u32,
    cell_y: u32,
) {
    let src_rect = match cx.atlas.resolve(placement.tile_id) {
        Ok(rect) => rect,
        Err(_) => {
            stats.placements_skipped += 1;
            if seen_unindexed.insert((cx.source, placement.tile_id)) {
                tracer.placement_skipped(&PlacementSkippedEvent {
                    frame_index: cx.frame_index,
                    layer_index: cx.layer_index,
                    cell_x,
                    cell_y,
                    source: cx.source,
                    tile: placement.tile_id,
                });
            }
            return;
        }
    };

    let offset = placement.offset.offset_vec(cx.half_cell);
    let dest = Point::new(
        f64::from(cell_x) * cx.cell_size + offset.x,
        f64::from(cell_y) * cx.cell_size + offset.y,
    );

    let (scale_x, pivot_x) = if placement.flip_x {
        (-1.0, cx.cell_size)
    } else {
        (1.0, 0.0)
    };
    let (scale_y, pivot_y) = if placement.flip_y {
        (-1.0, cx.cell_size)
    } else {
        (1.0, 0.0)
    };

    plan.commands.push(DrawCommand {
        layer_index: cx.layer_index,
        source: cx.source,
        tile_id: placement.tile_id,
        src_rect,
        dest,
        pivot: Point::new(pivot_x, pivot_y),
        scale: Vec2::new(scale_x, scale_y),
    });
    stats.commands += 1;
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use strata_core::grid::CellStack;
    use strata_core::placement::OffsetFlags;

    use super::*;

    fn atlas_with(ids: &[u32], cell_pixel_size: u32) -> AtlasIndex {
        let mut atlas = AtlasIndex::new(SourceId(0), cell_pixel_size);
        for (i, &id) in ids.iter().enumerate() {
            atlas.insert(TileId(id), u16::try_from(i).unwrap(), 0);
        }
        atlas
    }

    fn layer_1xn(stacks: Vec<CellStack>) -> Layer {
        let mut grid = TileGrid::new(u32::try_from(stacks.len()).unwrap(), 1);
        for (x, stack) in stacks.into_iter().enumerate() {
            grid.set(u32::try_from(x).unwrap(), 0, stack);
        }
        Layer::new(SourceId(0), 16, grid)
    }

    fn composed_tiles(layer: &Layer, atlas: &AtlasIndex) -> Vec<u32> {
        let mut plan = DrawPlan::new();
        let mut seen = BTreeSet::new();
        compose_layer(
            0,
            layer,
            atlas,
            0,
            &mut plan,
            &mut Tracer::none(),
            &mut seen,
        );
        plan.iter().map(|c| c.tile_id.0).collect()
    }

    #[test]
    fn stack_paints_in_reverse_authored_order() {
        // Front-to-back authoring [1, 2, 3] paints rear-first: 3, 2, 1.
        let stack = CellStack::from_front_to_back(vec![
            TilePlacement::new(TileId(1), 2),
            TilePlacement::new(TileId(2), 1),
            TilePlacement::new(TileId(3), 0),
        ]);
        let layer = layer_1xn(vec![stack]);
        let atlas = atlas_with(&[1, 2, 3], 16);
        assert_eq!(composed_tiles(&layer, &atlas), [3, 2, 1]);
    }

    #[test]
    fn no_offset_placement_lands_on_cell_origin() {
        let mut grid = TileGrid::new(3, 2);
        grid.set(
            2,
            1,
            CellStack::from_front_to_back(vec![TilePlacement::new(TileId(1), 0)]),
        );
        let layer = Layer::new(SourceId(0), 16, grid);
        let atlas = atlas_with(&[1], 16);

        let mut plan = DrawPlan::new();
        let mut seen = BTreeSet::new();
        compose_layer(
            0,
            &layer,
            &atlas,
            0,
            &mut plan,
            &mut Tracer::none(),
            &mut seen,
        );

        let cmd = plan.commands[0];
        assert_eq!(cmd.dest, Point::new(32.0, 16.0));
        assert_eq!(cmd.pivot, Point::ZERO);
        assert_eq!(cmd.scale, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn flip_x_mirrors_around_right_edge() {
        let placement = TilePlacement::new(TileId(1), 0)
            .with_offset(OffsetFlags::RIGHT)
            .flipped_x();
        let layer = layer_1xn(vec![CellStack::from_front_to_back(vec![placement])]);
        let atlas = atlas_with(&[1], 16);

        let mut plan = DrawPlan::new();
        let mut seen = BTreeSet::new();
        compose_layer(
            0,
            &layer,
            &atlas,
            0,
            &mut plan,
            &mut Tracer::none(),
            &mut seen,
        );

        let cmd = plan.commands[0];
        // flip_x pins the pivot to the cell's right edge regardless of
        // offset flags; the right offset moves dest, not the pivot.
        assert_eq!(cmd.scale, Vec2::new(-1.0, 1.0));
        assert_eq!(cmd.pivot, Point::new(16.0, 0.0));
        assert_eq!(cmd.dest, Point::new(8.0, 0.0));
    }

    #[test]
    fn offset_flags_nudge_destination_half_a_cell() {
        let placement = TilePlacement::new(TileId(1), 0).with_offset(OffsetFlags {
            down: true,
            left: true,
            ..OffsetFlags::NONE
        });
        let layer = layer_1xn(vec![CellStack::from_front_to_back(vec![placement])]);
        let atlas = atlas_with(&[1], 16);

        let mut plan = DrawPlan::new();
        let mut seen = BTreeSet::new();
        compose_layer(
            0,
            &layer,
            &atlas,
            0,
            &mut plan,
            &mut Tracer::none(),
            &mut seen,
        );
        assert_eq!(plan.commands[0].dest, Point::new(-8.0, 8.0));
    }

    #[test]
    fn higher_pending_priority_flushes_under_neighbor() {
        // Pending priority 5 vs neighbor front priority 3: 5 > 3, so the
        // deferred tile flushes before the neighbor paints.
        let deferred = TilePlacement::new(TileId(10), 5).with_offset(OffsetFlags::RIGHT);
        let neighbor = TilePlacement::new(TileId(20), 3);
        let layer = layer_1xn(vec![
            CellStack::from_front_to_back(vec![deferred]),
            CellStack::from_front_to_back(vec![neighbor]),
        ]);
        let atlas = atlas_with(&[10, 20], 16);
        assert_eq!(composed_tiles(&layer, &atlas), [10, 20]);
    }

    #[test]
    fn lower_pending_priority_flushes_over_neighbor() {
        // Pending priority 5 vs neighbor front priority 8: 5 < 8, so the
        // deferred tile flushes after the neighbor's placements.
        let deferred = TilePlacement::new(TileId(10), 5).with_offset(OffsetFlags::RIGHT);
        let neighbor = TilePlacement::new(TileId(20), 8);
        let layer = layer_1xn(vec![
            CellStack::from_front_to_back(vec![deferred]),
            CellStack::from_front_to_back(vec![neighbor]),
        ]);
        let atlas = atlas_with(&[10, 20], 16);
        assert_eq!(composed_tiles(&layer, &atlas), [20, 10]);
    }

    #[test]
    fn deferred_unit_carries_everything_in_front() {
        // Stack (front-to-back): [40 on top, 10 right-offset, 30 beneath].
        // 30 paints immediately; 10 and 40 defer as a unit and flush after
        // the neighbor (5 < 8), still in rear-to-front order.
        let stack = CellStack::from_front_to_back(vec![
            TilePlacement::new(TileId(40), 6),
            TilePlacement::new(TileId(10), 5).with_offset(OffsetFlags::RIGHT),
            TilePlacement::new(TileId(30), 1),
        ]);
        let neighbor = CellStack::from_front_to_back(vec![TilePlacement::new(TileId(20), 8)]);
        let layer = layer_1xn(vec![stack, neighbor]);
        let atlas = atlas_with(&[10, 20, 30, 40], 16);
        assert_eq!(composed_tiles(&layer, &atlas), [30, 20, 10, 40]);
    }

    #[test]
    fn offset_without_neighbor_paints_in_place() {
        // Right offset into an empty neighbor: no deferral at all.
        let placement = TilePlacement::new(TileId(10), 5).with_offset(OffsetFlags::RIGHT);
        let layer = layer_1xn(vec![
            CellStack::from_front_to_back(vec![placement]),
            CellStack::new(),
        ]);
        let atlas = atlas_with(&[10], 16);
        assert_eq!(composed_tiles(&layer, &atlas), [10]);
    }

    #[test]
    fn offset_in_last_column_never_defers() {
        let placement = TilePlacement::new(TileId(10), 5).with_offset(OffsetFlags::RIGHT);
        let layer = layer_1xn(vec![CellStack::from_front_to_back(vec![placement])]);
        let atlas = atlas_with(&[10], 16);
        assert_eq!(composed_tiles(&layer, &atlas), [10]);
    }

    #[test]
    fn equal_priority_pending_rides_to_row_end() {
        // Equal priorities trigger neither flush comparison; the unit
        // flushes at the forced row-end transition, after the neighbor.
        let deferred = TilePlacement::new(TileId(10), 5).with_offset(OffsetFlags::RIGHT);
        let neighbor = TilePlacement::new(TileId(20), 5);
        let layer = layer_1xn(vec![
            CellStack::from_front_to_back(vec![deferred]),
            CellStack::from_front_to_back(vec![neighbor]),
        ]);
        let atlas = atlas_with(&[10, 20], 16);
        assert_eq!(composed_tiles(&layer, &atlas), [20, 10]);
    }

    #[test]
    fn pending_never_leaks_into_next_row() {
        // 2x2 grid; the pending unit from row 0 must flush before row 1
        // paints, whatever row 1 contains.
        let deferred = TilePlacement::new(TileId(10), 5).with_offset(OffsetFlags::RIGHT);
        let mut grid = TileGrid::new(2, 2);
        grid.set(0, 0, CellStack::from_front_to_back(vec![deferred]));
        grid.set(
            1,
            0,
            CellStack::from_front_to_back(vec![TilePlacement::new(TileId(20), 5)]),
        );
        grid.set(
            0,
            1,
            CellStack::from_front_to_back(vec![TilePlacement::new(TileId(30), 0)]),
        );
        let layer = Layer::new(SourceId(0), 16, grid);
        let atlas = atlas_with(&[10, 20, 30], 16);
        assert_eq!(composed_tiles(&layer, &atlas), [20, 10, 30]);
    }

    #[test]
    fn new_deferral_flushes_displaced_unit_first() {
        // Two deferrals in one row: the second begins while the first is
        // still pending (equal priorities kept it alive), so the first
        // flushes at displacement time instead of being dropped.
        let first = TilePlacement::new(TileId(10), 5).with_offset(OffsetFlags::RIGHT);
        let second = TilePlacement::new(TileId(20), 5).with_offset(OffsetFlags::RIGHT);
        let third = TilePlacement::new(TileId(30), 5);
        let layer = layer_1xn(vec![
            CellStack::from_front_to_back(vec![first]),
            CellStack::from_front_to_back(vec![second]),
            CellStack::from_front_to_back(vec![third]),
        ]);
        let atlas = atlas_with(&[10, 20, 30], 16);
        assert_eq!(composed_tiles(&layer, &atlas), [10, 30, 20]);
    }

    #[test]
    fn unindexed_placement_is_skipped_not_fatal() {
        let stack = CellStack::from_front_to_back(vec![
            TilePlacement::new(TileId(1), 1),
            TilePlacement::new(TileId(99), 0),
        ]);
        let layer = layer_1xn(vec![stack]);
        let atlas = atlas_with(&[1], 16);

        let mut plan = DrawPlan::new();
        let mut seen = BTreeSet::new();
        let stats = compose_layer(
            0,
            &layer,
            &atlas,
            0,
            &mut plan,
            &mut Tracer::none(),
            &mut seen,
        );

        assert_eq!(stats.placements_skipped, 1);
        assert_eq!(stats.commands, 1);
        assert_eq!(plan.commands[0].tile_id, TileId(1));
        assert!(seen.contains(&(SourceId(0), TileId(99))));
    }

    #[test]
    fn empty_grid_emits_nothing() {
        let layer = Layer::new(SourceId(0), 16, TileGrid::new(8, 8));
        let atlas = atlas_with(&[], 16);
        assert!(composed_tiles(&layer, &atlas).is_empty());
    }
}
