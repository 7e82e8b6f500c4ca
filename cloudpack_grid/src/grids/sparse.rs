// Copyright 2025 the Cloudpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unbounded occupancy store backed by `hashbrown`.

use core::fmt::Debug;

use hashbrown::HashMap;

use crate::occupancy::Occupancy;
use crate::types::WordId;

/// Occupancy store for canvases without a fixed extent.
///
/// Cells are kept in a map keyed by `(col, row)`; only occupied cells take
/// space, and any coordinate, including negative ones, is a valid key. Suits
/// layouts that grow the canvas while packing instead of fixing it up front.
#[derive(Default)]
pub struct SparseGrid {
    cells: HashMap<(i32, i32), WordId>,
}

impl SparseGrid {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.len()
    }
}

impl Occupancy for SparseGrid {
    fn get(&self, col: i32, row: i32) -> Option<WordId> {
        self.cells.get(&(col, row)).copied()
    }

    fn set(&mut self, col: i32, row: i32, id: WordId) {
        self.cells.insert((col, row), id);
    }

    fn clear(&mut self) {
        self.cells.clear();
    }
}

impl Debug for SparseGrid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SparseGrid")
            .field("occupied", &self.cells.len())
            .finish_non_exhaustive()
    }
}
