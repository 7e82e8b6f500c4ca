// Copyright 2025 the Cloudpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Occupancy trait for shared canvas stores.

use crate::types::WordId;

/// Shared canvas occupancy abstraction.
///
/// The canvas is a 2D grid of cells at the packing resolution, keyed by
/// `(col, row)`. A packing tree reads it during collision trials and writes
/// it when a placement is committed; several trees share one store over the
/// course of a layout pass.
///
/// Implementations differ in how extent is handled: [`DenseGrid`] covers a
/// fixed canvas and treats out-of-range access as a caller bug, while
/// `SparseGrid` (feature `sparse`) accepts any coordinate.
///
/// [`DenseGrid`]: crate::grids::DenseGrid
pub trait Occupancy {
    /// The occupant of the cell at `(col, row)`, if any.
    fn get(&self, col: i32, row: i32) -> Option<WordId>;

    /// Record `id` as the occupant of the cell at `(col, row)`.
    fn set(&mut self, col: i32, row: i32, id: WordId);

    /// Reset every cell to unoccupied.
    fn clear(&mut self);

    /// Whether the cell at `(col, row)` is unoccupied.
    ///
    /// The default implementation delegates to [`get`][Occupancy::get].
    fn is_free(&self, col: i32, row: i32) -> bool {
        self.get(col, row).is_none()
    }
}
