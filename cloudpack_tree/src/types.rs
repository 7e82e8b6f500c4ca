// Copyright 2025 the Cloudpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public and internal types for the packing tree.

use cloudpack_grid::{Cell, WordId};

/// Index of a node in the tree's arena.
///
/// Plain index, no generation: the arena never frees individual nodes. The
/// whole interior is dropped at once by [`Tree::release_nodes`], which also
/// clears every stored `NodeId`.
///
/// [`Tree::release_nodes`]: crate::Tree::release_nodes
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "NodeId uses 32-bit indices by design."
    )]
    pub(crate) const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Fill state of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Fill {
    /// Nothing recorded here.
    Empty,
    /// Internal node whose four children all exist and are non-empty.
    /// Availability checks stop at such a node without recursing.
    Covered,
    /// Leaf-resolution cell occupied by a word. Only ever set on nodes whose
    /// width equals the packing resolution.
    Word(WordId),
}

/// A filled leaf-resolution cell of a packed shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
    /// The covered cell, in shape-local coordinates.
    pub cell: Cell,
    /// The word occupying it.
    pub id: WordId,
}
