// Copyright 2025 the Cloudpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=cloudpack_tree --heading-base-level=0

//! Cloudpack Tree: a lazily subdivided quadrant tree for word-cloud packing.
//!
//! Cloudpack Tree is the collision oracle of a word-cloud layout engine. One
//! [`Tree`] holds one shape's occupied cells as a quadrant hierarchy; a
//! shared [`Occupancy`] store holds everything already placed on the canvas.
//! The outer layout loop perturbs an offset, asks the tree whether the shape
//! fits, and commits the first offset that does — thousands of trials per
//! pass, which is what the structure is shaped for.
//!
//! - Build a shape once with [`Tree::insert`], one resolution-sized cell at a
//!   time; adjacent insertions ride an ancestor-hint cache instead of
//!   descending from the root.
//! - Trial offsets with [`Tree::move_to`] + [`Tree::fits`]; commit with
//!   [`Tree::place`].
//! - After committing, [`Tree::release_nodes`] drops the interior hierarchy
//!   and keeps the flattened leaf list, which is all later cycles need.
//! - [`Tree::word_id_at`] answers render-time picking with a small boundary
//!   tolerance, and [`Tree::observed_bounds`] feeds sizing decisions.
//!
//! It is a collision oracle, not an optimizer: choosing *good* offsets is the
//! caller's search strategy. Trees are single-owner and the shared store is
//! the only cross-shape resource; coordinating concurrent access to it is
//! likewise the caller's problem.
//!
//! Two behaviors are deliberate and worth knowing about up front:
//!
//! - [`Tree::fits`] may reorder its internal leaf cache as a side effect (a
//!   failing cell moves to the front, so the next trial fails faster on the
//!   same obstacle). That is why it takes `&mut self` for a logically
//!   read-only question.
//! - Quadrant selection is bottom/right-biased on exact midline coordinates,
//!   and [`Tree::observed_bounds`] stores maximum raw coordinates in its
//!   size fields. Both are part of the structure's contract; see the method
//!   docs.
//!
//! # Example
//!
//! ```rust
//! use cloudpack_grid::{Cell, DenseGrid, Occupancy, WordId};
//! use cloudpack_tree::Tree;
//!
//! let mut canvas = DenseGrid::for_canvas(64, 64, 4);
//!
//! // Rasterize an L-shaped word mask.
//! let mut tree = Tree::new(Cell::new(0, 0, 16, 16), 4);
//! let id = WordId::new(1).unwrap();
//! for (x, y) in [(0, 0), (0, 4), (0, 8), (4, 8)] {
//!     tree.insert(Cell::new(x, y, 4, 4), id);
//! }
//!
//! // First trial offset that fits wins.
//! tree.move_to(8, 8);
//! assert!(tree.fits(&canvas));
//! tree.place(&mut canvas, id);
//! tree.release_nodes();
//!
//! assert_eq!(canvas.get(2, 2), Some(id));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.
//!
//! [`Occupancy`]: cloudpack_grid::Occupancy

#![no_std]

extern crate alloc;

mod tree;
mod types;
mod util;

pub use tree::Tree;
pub use types::Leaf;

#[cfg(test)]
mod tests {
    use super::*;
    use cloudpack_grid::{Cell, DenseGrid, Occupancy, WordId};

    fn id(raw: u16) -> WordId {
        WordId::new(raw).expect("test ids are nonzero")
    }

    /// A miniature layout pass: three shapes, each scanned across candidate
    /// offsets until one fits, then committed.
    #[test]
    fn shapes_pack_without_overlap() {
        let mut canvas = DenseGrid::for_canvas(32, 32, 4);
        let masks: [&[(i32, i32)]; 3] = [
            &[(0, 0), (4, 0), (8, 0)],
            &[(0, 0), (0, 4)],
            &[(0, 0), (4, 0), (0, 4), (4, 4)],
        ];

        let mut placed = 0;
        for (n, mask) in masks.iter().enumerate() {
            let raw = u16::try_from(n).expect("few masks") + 1;
            let mut tree = Tree::new(Cell::new(0, 0, 16, 16), 4);
            for &(x, y) in *mask {
                tree.insert(Cell::new(x, y, 4, 4), id(raw));
            }
            'search: for dy in (0..20).step_by(4) {
                for dx in (0..20).step_by(4) {
                    tree.move_to(dx, dy);
                    if tree.fits(&canvas) {
                        tree.place(&mut canvas, id(raw));
                        tree.release_nodes();
                        placed += 1;
                        break 'search;
                    }
                }
            }
        }
        assert_eq!(placed, 3);

        // Every committed cell carries exactly one id; count per shape.
        let mut counts = [0_usize; 3];
        for col in 0..canvas.cols() {
            for row in 0..canvas.rows() {
                if let Some(w) = canvas.get(col, row) {
                    counts[usize::from(w.get()) - 1] += 1;
                }
            }
        }
        assert_eq!(counts, [3, 2, 4]);
    }
}
