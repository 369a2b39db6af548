// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core data model for the strata auto-tile compositor.
//!
//! `strata_core` provides the data structures an auto-tiled 2D level is made
//! of: per-cell stacks of tile placements, per-layer grids, and the atlas
//! indexes that map tile ids to source rectangles. It is `no_std` compatible
//! (with `alloc`). The draw-order algorithm itself lives in `strata_render`.
//!
//! # Architecture
//!
//! A frame flows through the workspace like this:
//!
//! ```text
//!   Rule engine (external)
//!       │  whole-grid snapshot swap
//!       ▼
//!   Layer::swap_grid ──► Scene::compose() ──► DrawPlan ──► Surface::submit()
//!                            │
//!                            ▼
//!                       Tracer ──► TraceSink (diagnostics)
//! ```
//!
//! **[`placement`]** — [`TilePlacement`](placement::TilePlacement): one tile
//! in one cell, carrying priority, mirroring, and half-cell offset flags.
//!
//! **[`grid`]** — [`CellStack`](grid::CellStack) (front = topmost, an
//! explicit invariant) and the row-major [`TileGrid`](grid::TileGrid).
//!
//! **[`layer`]** — [`Layer`](layer::Layer): one grid bound to one tile
//! source, with snapshot-swap grid replacement.
//!
//! **[`atlas`]** — [`AtlasIndex`](atlas::AtlasIndex): lazy tile-id →
//! rectangle lookup, built only over the ids active rules reference.
//!
//! **[`error`]** — [`ComposeError`](error::ComposeError) and the
//! skip-and-continue propagation policy.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! compose-pass diagnostics, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates deferral
//!   state-machine transition events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod atlas;
pub mod error;
pub mod grid;
pub mod layer;
pub mod placement;
pub mod source;
pub mod trace;
