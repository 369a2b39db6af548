// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strata_core::trace::{
    ComposeBeginEvent, ComposeSummary, DeferralEvent, LayerSkippedEvent, PlacementSkippedEvent,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_compose_begin(&mut self, e: &ComposeBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[compose] frame={} layers={}",
            e.frame_index, e.layer_count,
        );
    }

    fn on_layer_skipped(&mut self, e: &LayerSkippedEvent) {
        let _ = writeln!(
            self.writer,
            "[layer:skip] frame={} layer={} source={}",
            e.frame_index, e.layer_index, e.source.0,
        );
    }

    fn on_placement_skipped(&mut self, e: &PlacementSkippedEvent) {
        let _ = writeln!(
            self.writer,
            "[placement:skip] frame={} layer={} cell=({},{}) source={} tile={}",
            e.frame_index, e.layer_index, e.cell_x, e.cell_y, e.source.0, e.tile.0,
        );
    }

    fn on_compose_summary(&mut self, s: &ComposeSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} commands={} composed={} layers_skipped={} placements_skipped={}",
            s.frame_index, s.commands, s.layers_composed, s.layers_skipped, s.placements_skipped,
        );
    }

    fn on_deferral(&mut self, e: &DeferralEvent) {
        let _ = writeln!(
            self.writer,
            "[deferral] layer={} cell=({},{}) start={} priority={} action={:?}",
            e.layer_index, e.cell_x, e.cell_y, e.start_index, e.priority, e.action,
        );
    }
}
