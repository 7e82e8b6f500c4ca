// Copyright 2025 the Cloudpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Occupancy store implementations.
//!
//! - `dense`: flat-vector grid over a fixed canvas extent (small, fast,
//!   the usual choice for a widget-sized canvas).
//! - `sparse` (feature `sparse`): hashbrown map keyed by `(col, row)` for
//!   canvases whose extent is not known up front.

pub(crate) mod dense;
#[cfg(feature = "sparse")]
pub(crate) mod sparse;

pub use dense::DenseGrid;
#[cfg(feature = "sparse")]
pub use sparse::SparseGrid;
