// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene assembly: layer sequencing and the atlas table.
//!
//! A [`Scene`] owns every [`Layer`] and [`AtlasIndex`] for the lifetime of
//! the program; compose passes borrow them and produce a transient
//! [`DrawPlan`] with no state retained between calls. Layers sit in
//! authoring order (index 0 topmost) and are walked in reverse, so the
//! bottom semantic layer paints first and the top layer paints last.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use strata_core::atlas::AtlasIndex;
use strata_core::grid::TileGrid;
use strata_core::layer::Layer;
use strata_core::source::SourceId;
use strata_core::trace::{ComposeBeginEvent, ComposeSummary, LayerSkippedEvent, Tracer};

use crate::compositor::compose_layer;
use crate::plan::DrawPlan;

/// All layers of a level plus the atlas table that resolves their sources.
#[derive(Debug, Default)]
pub struct Scene {
    /// Authoring order: index 0 is the topmost layer.
    layers: Vec<Layer>,
    atlases: BTreeMap<SourceId, AtlasIndex>,
}

impl Scene {
    /// Creates a scene with no layers and an empty atlas table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            layers: Vec::new(),
            atlases: BTreeMap::new(),
        }
    }

    /// Appends a layer beneath all existing layers.
    pub fn push_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Registers an atlas index under its source id.
    ///
    /// A second index for the same source replaces the first (atlas
    /// rebuilds after a rule-set change hand the scene a fresh index).
    pub fn insert_atlas(&mut self, atlas: AtlasIndex) {
        self.atlases.insert(atlas.source(), atlas);
    }

    /// The layers in authoring order (index 0 topmost).
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Looks up the atlas index for a source, if registered.
    #[must_use]
    pub fn atlas(&self, source: SourceId) -> Option<&AtlasIndex> {
        self.atlases.get(&source)
    }

    /// Swaps a freshly generated grid into the layer at `layer_index`,
    /// returning the old snapshot.
    ///
    /// This is the rule engine's hand-off point between frames; see
    /// [`Layer::swap_grid`] for the snapshot discipline.
    ///
    /// # Panics
    ///
    /// Panics if `layer_index` is out of range.
    pub fn swap_grid(&mut self, layer_index: usize, grid: TileGrid) -> TileGrid {
        self.layers[layer_index].swap_grid(grid)
    }

    /// Composes the whole scene into a fresh [`DrawPlan`].
    ///
    /// `frame_index` is a monotonic counter supplied by the frame loop; it
    /// only feeds diagnostics.
    #[must_use]
    pub fn compose(&self, frame_index: u64, tracer: &mut Tracer<'_>) -> DrawPlan {
        let mut plan = DrawPlan::new();
        self.compose_into(frame_index, &mut plan, tracer);
        plan
    }

    /// Like [`compose`](Self::compose), but reuses a caller-provided plan
    /// buffer to avoid allocation.
    ///
    /// Layers whose tile source has no registered atlas are skipped with a
    /// [`LayerSkippedEvent`]; every other layer's output is unaffected by
    /// the skip. The pass never fails: all per-layer and per-placement
    /// problems are absorbed as diagnostics.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "layer and command counts stay far below u32::MAX"
    )]
    pub fn compose_into(&self, frame_index: u64, plan: &mut DrawPlan, tracer: &mut Tracer<'_>) {
        plan.clear();
        tracer.compose_begin(&ComposeBeginEvent {
            frame_index,
            layer_count: self.layers.len() as u32,
        });

        let mut layers_composed = 0_u32;
        let mut layers_skipped = 0_u32;
        let mut placements_skipped = 0_u32;
        let mut seen_unindexed = BTreeSet::new();

        // Reverse authoring order: bottom layer first, top layer last.
        for (layer_index, layer) in self.layers.iter().enumerate().rev() {
            let Some(atlas) = self.atlases.get(&layer.source()) else {
                layers_skipped += 1;
                tracer.layer_skipped(&LayerSkippedEvent {
                    frame_index,
                    layer_index: layer_index as u32,
                    source: layer.source(),
                });
                continue;
            };

            let stats = compose_layer(
                layer_index as u32,
                layer,
                atlas,
                frame_index,
                plan,
                tracer,
                &mut seen_unindexed,
            );
            layers_composed += 1;
            placements_skipped += stats.placements_skipped;
        }

        tracer.compose_summary(&ComposeSummary {
            frame_index,
            commands: plan.len() as u32,
            layers_composed,
            layers_skipped,
            placements_skipped,
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use strata_core::grid::CellStack;
    use strata_core::placement::TilePlacement;
    use strata_core::source::TileId;
    use strata_core::trace::{PlacementSkippedEvent, TraceSink};

    use super::*;

    fn single_tile_layer(source: SourceId, tile: u32) -> Layer {
        let mut grid = TileGrid::new(1, 1);
        grid.set(
            0,
            0,
            CellStack::from_front_to_back(vec![TilePlacement::new(TileId(tile), 0)]),
        );
        Layer::new(source, 16, grid)
    }

    fn atlas_for(source: SourceId, tiles: &[u32]) -> AtlasIndex {
        let mut atlas = AtlasIndex::new(source, 16);
        for (i, &id) in tiles.iter().enumerate() {
            atlas.insert(TileId(id), u16::try_from(i).unwrap(), 0);
        }
        atlas
    }

    #[test]
    fn layers_paint_bottom_up() {
        // Authoring order: layer 0 on top of layer 1; layer 1's command
        // must come first in the plan.
        let mut scene = Scene::new();
        scene.push_layer(single_tile_layer(SourceId(0), 1));
        scene.push_layer(single_tile_layer(SourceId(0), 2));
        scene.insert_atlas(atlas_for(SourceId(0), &[1, 2]));

        let plan = scene.compose(0, &mut Tracer::none());
        let tiles: Vec<u32> = plan.iter().map(|c| c.tile_id.0).collect();
        assert_eq!(tiles, [2, 1]);
        assert_eq!(plan.commands[0].layer_index, 1);
        assert_eq!(plan.commands[1].layer_index, 0);
    }

    #[test]
    fn all_empty_scene_composes_to_empty_plan() {
        let mut scene = Scene::new();
        scene.push_layer(Layer::new(SourceId(0), 16, TileGrid::new(4, 4)));
        scene.insert_atlas(atlas_for(SourceId(0), &[]));

        let plan = scene.compose(0, &mut Tracer::none());
        assert!(plan.is_empty());
    }

    #[test]
    fn missing_atlas_skips_only_that_layer() {
        let mut scene = Scene::new();
        scene.push_layer(single_tile_layer(SourceId(7), 1)); // no atlas
        scene.push_layer(single_tile_layer(SourceId(0), 2));
        scene.insert_atlas(atlas_for(SourceId(0), &[2]));

        let plan = scene.compose(0, &mut Tracer::none());
        let tiles: Vec<u32> = plan.iter().map(|c| c.tile_id.0).collect();
        assert_eq!(tiles, [2]);

        // The healthy layer's output is identical with the bad layer gone.
        let mut healthy = Scene::new();
        healthy.push_layer(single_tile_layer(SourceId(0), 2));
        healthy.insert_atlas(atlas_for(SourceId(0), &[2]));
        let reference = healthy.compose(0, &mut Tracer::none());
        assert_eq!(plan.commands, reference.commands);
    }

    #[test]
    fn compose_into_reuses_buffer() {
        let mut scene = Scene::new();
        scene.push_layer(single_tile_layer(SourceId(0), 1));
        scene.insert_atlas(atlas_for(SourceId(0), &[1]));

        let mut plan = DrawPlan::new();
        scene.compose_into(0, &mut plan, &mut Tracer::none());
        assert_eq!(plan.len(), 1);
        scene.compose_into(1, &mut plan, &mut Tracer::none());
        assert_eq!(plan.len(), 1, "plan must be cleared between passes");
    }

    #[test]
    fn swap_grid_changes_next_pass_only() {
        let mut scene = Scene::new();
        scene.push_layer(single_tile_layer(SourceId(0), 1));
        scene.insert_atlas(atlas_for(SourceId(0), &[1]));

        let before = scene.compose(0, &mut Tracer::none());
        assert_eq!(before.len(), 1);

        let old = scene.swap_grid(0, TileGrid::new(1, 1));
        assert!(!old.is_blank());

        let after = scene.compose(1, &mut Tracer::none());
        assert!(after.is_empty());
    }

    #[test]
    fn unindexed_diagnostic_deduplicates_across_layers() {
        // Both layers reference the same unindexed (source, tile); the
        // sink hears about it once per pass.
        #[derive(Default)]
        struct SkipSink(Vec<PlacementSkippedEvent>);
        impl TraceSink for SkipSink {
            fn on_placement_skipped(&mut self, e: &PlacementSkippedEvent) {
                self.0.push(*e);
            }
        }

        let mut scene = Scene::new();
        scene.push_layer(single_tile_layer(SourceId(0), 99));
        scene.push_layer(single_tile_layer(SourceId(0), 99));
        scene.insert_atlas(atlas_for(SourceId(0), &[]));

        let mut sink = SkipSink::default();
        let mut tracer = Tracer::new(&mut sink);
        let plan = scene.compose(0, &mut tracer);
        drop(tracer);

        assert!(plan.is_empty());
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].tile, TileId(99));
    }

    #[test]
    fn scatter_fixture_stays_in_bounds() {
        // Stress the compositor with a dense generated grid; every command
        // must target a destination within half a cell of the layer bounds.
        let grid = strata_harness::scatter(0x5157_u64, 20, 12, &[1, 2, 3, 4, 5]);
        let mut scene = Scene::new();
        scene.push_layer(Layer::new(SourceId(0), 16, grid));
        scene.insert_atlas(atlas_for(SourceId(0), &[1, 2, 3, 4, 5]));

        let plan = scene.compose(0, &mut Tracer::none());
        assert!(!plan.is_empty());
        for cmd in &plan {
            assert!(cmd.dest.x >= -8.0 && cmd.dest.x <= 20.0 * 16.0 + 8.0);
            assert!(cmd.dest.y >= -8.0 && cmd.dest.y <= 12.0 * 16.0 + 8.0);
        }
    }
}
