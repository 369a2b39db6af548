// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-plan definitions, layer compositor, and scene assembly for strata.
//!
//! This crate turns `strata_core`'s data model into an ordered sequence of
//! draw commands. It defines:
//!
//! - [`DrawCommand`] / [`DrawPlan`] — the back-to-front command sequence
//!   handed to rendering surfaces
//! - [`compose_layer`] — per-layer draw-order resolution, including the
//!   cross-cell deferral state machine for right-offset tiles
//! - [`Scene`] — layer sequencing, the atlas table, and whole-frame
//!   composition
//! - [`Surface`] — the contract rendering integrations implement
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` / `trace-rich` (disabled by default): Forwarded to
//!   `strata_core`'s tracing features.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

mod compositor;
mod plan;
mod scene;
mod surface;

pub use compositor::{LayerStats, compose_layer};
pub use plan::{DrawCommand, DrawPlan};
pub use scene::Scene;
pub use surface::Surface;
