// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error kinds shared across the compositor and its collaborators.
//!
//! Within a frame, per-cell and per-layer failures are absorbed locally:
//! the offending placement or layer is skipped, a diagnostic goes to the
//! [`TraceSink`](crate::trace::TraceSink), and the rest of the scene still
//! renders. Only [`AssetLoad`](ComposeError::AssetLoad), reported by the
//! loader before the first frame, is fatal — no layer can render without its
//! pixel data. Nothing here is transient, so nothing is retried.

use core::fmt;

use crate::source::{SourceId, TileId};

/// Everything that can go wrong between loading and composing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposeError {
    /// A layer references a tile source absent from the scene's atlas table.
    ///
    /// The layer is skipped and the frame continues.
    TileSourceMissing(SourceId),
    /// A placement references a tile id its source's atlas never indexed.
    ///
    /// The single placement is skipped and the frame continues; the
    /// diagnostic is emitted once per (source, tile) within a pass.
    TileNotIndexed {
        /// The source whose index was consulted.
        source: SourceId,
        /// The unregistered tile id.
        tile: TileId,
    },
    /// A tile source's pixel data failed to load.
    ///
    /// Reported by the loader collaborator before any frame renders; fatal
    /// at startup only.
    AssetLoad(SourceId),
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TileSourceMissing(source) => {
                write!(f, "tile source {source:?} is not in the atlas table")
            }
            Self::TileNotIndexed { source, tile } => {
                write!(f, "{tile:?} was never indexed for {source:?}")
            }
            Self::AssetLoad(source) => {
                write!(f, "pixel data for {source:?} failed to load")
            }
        }
    }
}

impl core::error::Error for ComposeError {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_names_the_source() {
        let err = ComposeError::TileNotIndexed {
            source: SourceId(4),
            tile: TileId(17),
        };
        assert_eq!(
            err.to_string(),
            "TileId(17) was never indexed for SourceId(4)"
        );
    }
}
