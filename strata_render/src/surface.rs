// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface contract for rendering integrations.
//!
//! Strata keeps pixel work out of the workspace entirely: the compositor
//! produces a [`DrawPlan`] and a *surface* — an SFML window wrapper, a GPU
//! sprite batcher, a software blitter, a test double — turns it into actual
//! drawing. Surfaces receive the finished plan unchanged; no other state
//! crosses the boundary.
//!
//! # Frame loop pseudocode
//!
//! A typical fixed-rate frame callback wires the pieces together like this:
//!
//! ```rust,ignore
//! fn on_frame(frame_index: u64) {
//!     // Regenerate: the rule engine swaps in fresh grids when asked
//!     // (e.g. a randomize keypress), never mid-pass.
//!     if randomize_requested {
//!         scene.swap_grid(layer, rule_engine.run(seed));
//!     }
//!
//!     // Compose: derive the full plan from the current snapshot.
//!     scene.compose_into(frame_index, &mut plan, &mut tracer);
//!
//!     // Present: the surface blits the plan.
//!     surface.submit(&plan);
//! }
//! ```

use crate::plan::DrawPlan;

/// Receives finished draw plans and performs the actual drawing.
pub trait Surface {
    /// Draws every command of `plan` in order.
    ///
    /// Commands arrive back-to-front; a surface that honors the order needs
    /// no depth handling of its own.
    fn submit(&mut self, plan: &DrawPlan);
}
