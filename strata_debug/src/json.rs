// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export for recorded compose traces.
//!
//! [`export`] reads recorded bytes from a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes a JSON array of
//! event objects to the given writer, one object per event. The output is
//! meant for ad-hoc inspection and for diffing compose passes across runs.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a JSON array.
///
/// Each event becomes one object with an `"event"` discriminant and the
/// event's fields. Unknown or truncated trailing bytes end the export at the
/// last whole record.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::ComposeBegin(e) => {
                events.push(json!({
                    "event": "ComposeBegin",
                    "frame_index": e.frame_index,
                    "layer_count": e.layer_count,
                }));
            }
            RecordedEvent::LayerSkipped(e) => {
                events.push(json!({
                    "event": "LayerSkipped",
                    "frame_index": e.frame_index,
                    "layer_index": e.layer_index,
                    "source": e.source.0,
                }));
            }
            RecordedEvent::PlacementSkipped(e) => {
                events.push(json!({
                    "event": "PlacementSkipped",
                    "frame_index": e.frame_index,
                    "layer_index": e.layer_index,
                    "cell": [e.cell_x, e.cell_y],
                    "source": e.source.0,
                    "tile": e.tile.0,
                }));
            }
            RecordedEvent::ComposeSummary(s) => {
                events.push(json!({
                    "event": "ComposeSummary",
                    "frame_index": s.frame_index,
                    "commands": s.commands,
                    "layers_composed": s.layers_composed,
                    "layers_skipped": s.layers_skipped,
                    "placements_skipped": s.placements_skipped,
                }));
            }
            RecordedEvent::Deferral(e) => {
                events.push(json!({
                    "event": "Deferral",
                    "layer_index": e.layer_index,
                    "cell": [e.cell_x, e.cell_y],
                    "start_index": e.start_index,
                    "priority": e.priority,
                    "action": format!("{:?}", e.action),
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use strata_core::source::SourceId;
    use strata_core::trace::{ComposeBeginEvent, ComposeSummary, LayerSkippedEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_compose_begin(&ComposeBeginEvent {
            frame_index: 0,
            layer_count: 2,
        });
        rec.on_layer_skipped(&LayerSkippedEvent {
            frame_index: 0,
            layer_index: 1,
            source: SourceId(3),
        });
        rec.on_compose_summary(&ComposeSummary {
            frame_index: 0,
            commands: 64,
            layers_composed: 1,
            layers_skipped: 1,
            placements_skipped: 0,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["event"], "ComposeBegin");
        assert_eq!(parsed[1]["event"], "LayerSkipped");
        assert_eq!(parsed[1]["source"], 3);
        assert_eq!(parsed[2]["event"], "ComposeSummary");
        assert_eq!(parsed[2]["commands"], 64);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
