// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for compose passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! compositor calls as a pass progresses. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates [`DeferralEvent`] and the
//!   corresponding `TraceSink` method, making every transition of the
//!   cross-cell deferral state machine observable.

use crate::source::{SourceId, TileId};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which transition the deferral state machine took.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeferralAction {
    /// A right-offset placement over a non-empty neighbor became pending.
    Begin,
    /// Flushed before a higher-significance placement in a later cell, so
    /// the deferred unit sits underneath it.
    FlushUnder,
    /// Flushed after a finished cell whose front outranked the pending
    /// priority, so the deferred unit sits on top of that cell.
    FlushOver,
    /// Forced flush at the end of a row.
    FlushRowEnd,
    /// Flushed because a new deferral displaced the pending unit.
    FlushDisplaced,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when scene assembly starts a compose pass.
#[derive(Clone, Copy, Debug)]
pub struct ComposeBeginEvent {
    /// Monotonic frame counter, supplied by the frame loop.
    pub frame_index: u64,
    /// Number of layers the scene will walk.
    pub layer_count: u32,
}

/// Emitted when a layer is skipped because its tile source has no atlas.
#[derive(Clone, Copy, Debug)]
pub struct LayerSkippedEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Authoring index of the skipped layer.
    pub layer_index: u32,
    /// The source the scene's atlas table does not know.
    pub source: SourceId,
}

/// Emitted when a single placement is skipped because its tile id was never
/// indexed.
///
/// Deduplicated per (source, tile) within one compose pass, so a tile id
/// repeated across many cells reports once.
#[derive(Clone, Copy, Debug)]
pub struct PlacementSkippedEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Authoring index of the owning layer.
    pub layer_index: u32,
    /// Cell column of the first offending placement.
    pub cell_x: u32,
    /// Cell row of the first offending placement.
    pub cell_y: u32,
    /// The source whose index was consulted.
    pub source: SourceId,
    /// The unregistered tile id.
    pub tile: TileId,
}

/// Per-pass summary emitted after the last layer.
#[derive(Clone, Copy, Debug)]
pub struct ComposeSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Draw commands emitted this pass.
    pub commands: u32,
    /// Layers composed.
    pub layers_composed: u32,
    /// Layers skipped for a missing tile source.
    pub layers_skipped: u32,
    /// Placements skipped for unindexed tile ids (counted per occurrence,
    /// not per deduplicated diagnostic).
    pub placements_skipped: u32,
}

/// A deferral state-machine transition (requires `trace-rich`).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct DeferralEvent {
    /// Authoring index of the layer being composed.
    pub layer_index: u32,
    /// Cell column of the deferred unit's own cell.
    pub cell_x: u32,
    /// Cell row of the deferred unit's own cell.
    pub cell_y: u32,
    /// Stack index where the deferred unit starts (0 = front).
    pub start_index: u8,
    /// Priority of the deferred placement.
    pub priority: u8,
    /// Which transition was taken.
    pub action: DeferralAction,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from compose passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a compose pass begins.
    fn on_compose_begin(&mut self, e: &ComposeBeginEvent) {
        _ = e;
    }

    /// Called when a layer is skipped.
    fn on_layer_skipped(&mut self, e: &LayerSkippedEvent) {
        _ = e;
    }

    /// Called when a placement is skipped (once per (source, tile) per pass).
    fn on_placement_skipped(&mut self, e: &PlacementSkippedEvent) {
        _ = e;
    }

    /// Called with a per-pass summary.
    fn on_compose_summary(&mut self, s: &ComposeSummary) {
        _ = s;
    }

    /// Called on every deferral transition (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_deferral(&mut self, e: &DeferralEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`ComposeBeginEvent`].
    #[inline]
    pub fn compose_begin(&mut self, e: &ComposeBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_compose_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayerSkippedEvent`].
    #[inline]
    pub fn layer_skipped(&mut self, e: &LayerSkippedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layer_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PlacementSkippedEvent`].
    #[inline]
    pub fn placement_skipped(&mut self, e: &PlacementSkippedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_placement_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ComposeSummary`].
    #[inline]
    pub fn compose_summary(&mut self, s: &ComposeSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_compose_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`DeferralEvent`] (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn deferral(&mut self, e: &DeferralEvent) {
        if let Some(s) = &mut self.sink {
            s.on_deferral(e);
        }
    }
}
