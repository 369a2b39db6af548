// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop that exercises the compositing and diagnostics
//! pipeline.
//!
//! Runs 60 synthetic frames through a three-layer scene, re-scattering the
//! prop layer every 12 frames the way a rule engine would hand off fresh
//! grids, recording events to both a
//! [`PrettyPrintSink`](strata_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](strata_debug::recorder::RecorderSink), then exports the
//! recording as a JSON event file.

use std::fs::File;
use std::io::BufWriter;

use strata_core::layer::Layer;
use strata_core::source::SourceId;
use strata_core::trace::{
    ComposeBeginEvent, ComposeSummary, DeferralEvent, LayerSkippedEvent, PlacementSkippedEvent,
    TraceSink, Tracer,
};
use strata_render::{DrawPlan, Scene, Surface};

use strata_debug::pretty::PrettyPrintSink;
use strata_debug::recorder::RecorderSink;
use strata_harness::{scatter, uniform_atlas};

const FRAME_COUNT: u64 = 60;
/// Frames between grid hand-offs on the prop layer.
const RESCATTER_PERIOD: u64 = 12;

const TERRAIN: SourceId = SourceId(0);
const PROPS: SourceId = SourceId(1);
const CELL: u32 = 16;

const GRID_W: u32 = 40;
const GRID_H: u32 = 24;

/// Fans every event out to a pretty printer and a binary recorder.
struct TeeSink {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for TeeSink {
    fn on_compose_begin(&mut self, e: &ComposeBeginEvent) {
        self.pretty.on_compose_begin(e);
        self.recorder.on_compose_begin(e);
    }

    fn on_layer_skipped(&mut self, e: &LayerSkippedEvent) {
        self.pretty.on_layer_skipped(e);
        self.recorder.on_layer_skipped(e);
    }

    fn on_placement_skipped(&mut self, e: &PlacementSkippedEvent) {
        self.pretty.on_placement_skipped(e);
        self.recorder.on_placement_skipped(e);
    }

    fn on_compose_summary(&mut self, s: &ComposeSummary) {
        self.pretty.on_compose_summary(s);
        self.recorder.on_compose_summary(s);
    }

    fn on_deferral(&mut self, e: &DeferralEvent) {
        self.pretty.on_deferral(e);
        self.recorder.on_deferral(e);
    }
}

/// A [`Surface`] that counts submissions instead of presenting them.
#[derive(Debug, Default)]
struct CountingSurface {
    frames: u64,
    commands: u64,
}

impl Surface for CountingSurface {
    fn submit(&mut self, plan: &DrawPlan) {
        self.frames += 1;
        self.commands += plan.len() as u64;
    }
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut tee = TeeSink {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };

    // -- scene -------------------------------------------------------------
    let terrain_tiles: Vec<u32> = (1..=24).collect();
    let prop_tiles: Vec<u32> = (100..=111).collect();

    let mut scene = Scene::new();
    scene.insert_atlas(uniform_atlas(TERRAIN, CELL, 8, &terrain_tiles));
    scene.insert_atlas(uniform_atlas(PROPS, CELL, 4, &prop_tiles));

    // Index 0 is topmost; the ground paints first, props last.
    scene.push_layer(Layer::new(
        PROPS,
        CELL,
        scatter(0xA11C, GRID_W, GRID_H, &prop_tiles),
    ));
    scene.push_layer(Layer::new(
        TERRAIN,
        CELL,
        scatter(0xC33E, GRID_W, GRID_H, &terrain_tiles[16..]),
    ));
    scene.push_layer(Layer::new(
        TERRAIN,
        CELL,
        scatter(0xB22D, GRID_W, GRID_H, &terrain_tiles),
    ));

    // -- simulated loop ----------------------------------------------------
    let mut surface = CountingSurface::default();
    let mut plan = DrawPlan::new();

    for frame_index in 0..FRAME_COUNT {
        // Periodic rule-engine hand-off: the prop layer gets a fresh grid,
        // the old snapshot is dropped.
        if frame_index > 0 && frame_index % RESCATTER_PERIOD == 0 {
            let grid = scatter(0xA11C ^ frame_index, GRID_W, GRID_H, &prop_tiles);
            let _old = scene.swap_grid(0, grid);
        }

        let mut tracer = Tracer::new(&mut tee);
        scene.compose_into(frame_index, &mut plan, &mut tracer);
        drop(tracer);

        surface.submit(&plan);
    }

    println!(
        "Composed {} frames, {} draw commands total",
        surface.frames, surface.commands,
    );

    // -- export recording --------------------------------------------------
    let path = "compose_trace.json";
    let file = File::create(path).expect("failed to create compose_trace.json");
    let mut writer = BufWriter::new(file);
    strata_debug::json::export(tee.recorder.as_bytes(), &mut writer)
        .expect("failed to write JSON trace");

    println!("Wrote {path} ({FRAME_COUNT} frames)");
}
