// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use strata_core::source::{SourceId, TileId};
use strata_core::trace::{
    ComposeBeginEvent, ComposeSummary, DeferralAction, DeferralEvent, LayerSkippedEvent,
    PlacementSkippedEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_COMPOSE_BEGIN: u8 = 1;
const TAG_LAYER_SKIPPED: u8 = 2;
const TAG_PLACEMENT_SKIPPED: u8 = 3;
const TAG_COMPOSE_SUMMARY: u8 = 4;
const TAG_DEFERRAL: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_action(&mut self, a: DeferralAction) {
        self.write_u8(match a {
            DeferralAction::Begin => 0,
            DeferralAction::FlushUnder => 1,
            DeferralAction::FlushOver => 2,
            DeferralAction::FlushRowEnd => 3,
            DeferralAction::FlushDisplaced => 4,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_compose_begin(&mut self, e: &ComposeBeginEvent) {
        self.write_u8(TAG_COMPOSE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_u32(e.layer_count);
    }

    fn on_layer_skipped(&mut self, e: &LayerSkippedEvent) {
        self.write_u8(TAG_LAYER_SKIPPED);
        self.write_u64(e.frame_index);
        self.write_u32(e.layer_index);
        self.write_u32(e.source.0);
    }

    fn on_placement_skipped(&mut self, e: &PlacementSkippedEvent) {
        self.write_u8(TAG_PLACEMENT_SKIPPED);
        self.write_u64(e.frame_index);
        self.write_u32(e.layer_index);
        self.write_u32(e.cell_x);
        self.write_u32(e.cell_y);
        self.write_u32(e.source.0);
        self.write_u32(e.tile.0);
    }

    fn on_compose_summary(&mut self, s: &ComposeSummary) {
        self.write_u8(TAG_COMPOSE_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u32(s.commands);
        self.write_u32(s.layers_composed);
        self.write_u32(s.layers_skipped);
        self.write_u32(s.placements_skipped);
    }

    fn on_deferral(&mut self, e: &DeferralEvent) {
        self.write_u8(TAG_DEFERRAL);
        self.write_u32(e.layer_index);
        self.write_u32(e.cell_x);
        self.write_u32(e.cell_y);
        self.write_u8(e.start_index);
        self.write_u8(e.priority);
        self.write_action(e.action);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`ComposeBeginEvent`].
    ComposeBegin(ComposeBeginEvent),
    /// A [`LayerSkippedEvent`].
    LayerSkipped(LayerSkippedEvent),
    /// A [`PlacementSkippedEvent`].
    PlacementSkipped(PlacementSkippedEvent),
    /// A [`ComposeSummary`].
    ComposeSummary(ComposeSummary),
    /// A [`DeferralEvent`].
    Deferral(DeferralEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_action(&mut self) -> Option<DeferralAction> {
        Some(match self.read_u8()? {
            0 => DeferralAction::Begin,
            1 => DeferralAction::FlushUnder,
            2 => DeferralAction::FlushOver,
            3 => DeferralAction::FlushRowEnd,
            _ => DeferralAction::FlushDisplaced,
        })
    }

    fn decode_compose_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ComposeBegin(ComposeBeginEvent {
            frame_index: self.read_u64()?,
            layer_count: self.read_u32()?,
        }))
    }

    fn decode_layer_skipped(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LayerSkipped(LayerSkippedEvent {
            frame_index: self.read_u64()?,
            layer_index: self.read_u32()?,
            source: SourceId(self.read_u32()?),
        }))
    }

    fn decode_placement_skipped(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PlacementSkipped(PlacementSkippedEvent {
            frame_index: self.read_u64()?,
            layer_index: self.read_u32()?,
            cell_x: self.read_u32()?,
            cell_y: self.read_u32()?,
            source: SourceId(self.read_u32()?),
            tile: TileId(self.read_u32()?),
        }))
    }

    fn decode_compose_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ComposeSummary(ComposeSummary {
            frame_index: self.read_u64()?,
            commands: self.read_u32()?,
            layers_composed: self.read_u32()?,
            layers_skipped: self.read_u32()?,
            placements_skipped: self.read_u32()?,
        }))
    }

    fn decode_deferral(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Deferral(DeferralEvent {
            layer_index: self.read_u32()?,
            cell_x: self.read_u32()?,
            cell_y: self.read_u32()?,
            start_index: self.read_u8()?,
            priority: self.read_u8()?,
            action: self.read_action()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_COMPOSE_BEGIN => self.decode_compose_begin(),
            TAG_LAYER_SKIPPED => self.decode_layer_skipped(),
            TAG_PLACEMENT_SKIPPED => self.decode_placement_skipped(),
            TAG_COMPOSE_SUMMARY => self.decode_compose_summary(),
            TAG_DEFERRAL => self.decode_deferral(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
