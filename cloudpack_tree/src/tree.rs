// Copyright 2025 the Cloudpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: quadrant nodes, insertion, trials, commits.

use alloc::vec::Vec;
use smallvec::SmallVec;

use cloudpack_grid::{Cell, Occupancy, WordId};

use crate::types::{Fill, Leaf, NodeId};
use crate::util::{child_index, quad_cells};

/// Half-width of the probe cell used by [`Tree::word_id_at`]. Point hit
/// testing tolerates misses of up to this many units at cell boundaries.
const POINT_MARGIN: i32 = 2;

/// One shape's packing tree: a quadrant hierarchy over the shape's bounding
/// box, subdivided lazily down to the packing resolution.
///
/// A tree goes through two phases. During *construction* the rasterizer
/// [`insert`]s the shape's covered cells, building a hierarchy whose leaves
/// are resolution-sized cells. During *trials* the layout loop repeatedly
/// [`move_to`]s a candidate offset and asks whether the shape [`fits`] the
/// shared canvas; on success it [`place`]s the shape and calls
/// [`release_nodes`] to drop the interior hierarchy, keeping only the
/// flattened leaf list the later trials and commits run on.
///
/// Inserted cells must lie within the root bounds, must not straddle a
/// quadrant boundary at any subdivision level, and must be at least the
/// packing resolution in both dimensions. Cells exactly at the resolution
/// become leaves. The tree does not check these preconditions; the
/// rasterizer upholds them by construction.
///
/// ## Example
///
/// ```rust
/// use cloudpack_grid::{Cell, DenseGrid, WordId};
/// use cloudpack_tree::Tree;
///
/// // One tree per shape: a 16x16 bounding square packed at 4-unit resolution.
/// let mut tree = Tree::new(Cell::new(0, 0, 16, 16), 4);
/// let id = WordId::new(1).unwrap();
/// tree.insert(Cell::new(0, 0, 4, 4), id);
/// tree.insert(Cell::new(4, 0, 4, 4), id);
///
/// // Trial an offset against the shared canvas, then commit.
/// let mut canvas = DenseGrid::for_canvas(64, 64, 4);
/// tree.move_to(8, 8);
/// assert!(tree.fits(&canvas));
/// tree.place(&mut canvas, id);
/// tree.release_nodes();
/// ```
///
/// [`insert`]: Tree::insert
/// [`move_to`]: Tree::move_to
/// [`fits`]: Tree::fits
/// [`place`]: Tree::place
/// [`release_nodes`]: Tree::release_nodes
pub struct Tree {
    /// Arena; the root lives at slot 0 for the whole lifetime of the tree.
    nodes: Vec<Node>,
    root: NodeId,
    min_resolution: i32,
    offset_x: i32,
    offset_y: i32,
    /// Running min/max over inserted leaf cells; see [`Tree::observed_bounds`].
    observed: Cell,
    /// Memoized flattened leaves, in pre-order at first computation.
    leaves: Option<Vec<Leaf>>,
    /// Nodes visited by the most recent insertion descents, deepest last.
    hints: SmallVec<[NodeId; 16]>,
    hint_cache: bool,
}

struct Node {
    bounds: Cell,
    /// The four quadrant sub-cells, precomputed at construction for nodes
    /// wider than the packing resolution; `None` on leaf-resolution nodes.
    quads: Option<[Cell; 4]>,
    children: [Option<NodeId>; 4],
    fill: Fill,
}

impl Node {
    fn new(bounds: Cell, min_resolution: i32) -> Self {
        let quads = if bounds.width > min_resolution {
            Some(quad_cells(&bounds))
        } else {
            None
        };
        Self {
            bounds,
            quads,
            children: [None; 4],
            fill: Fill::Empty,
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    fn quads(&self) -> &[Cell; 4] {
        self.quads
            .as_ref()
            .expect("tree invariant violated: interior node without quadrant cells")
    }
}

impl Tree {
    /// Create a tree for one shape.
    ///
    /// `bounds` is the shape's bounding box; `min_resolution` is the
    /// subdivision floor shared with the canvas grid. Widths reachable by
    /// repeated halving of `bounds.width` must pass through `min_resolution`
    /// exactly for the leaf layer to form.
    pub fn new(bounds: Cell, min_resolution: i32) -> Self {
        debug_assert!(
            min_resolution > 0,
            "min_resolution must be strictly positive"
        );
        let mut nodes = Vec::new();
        nodes.push(Node::new(bounds, min_resolution));
        Self {
            nodes,
            root: NodeId::new(0),
            min_resolution,
            offset_x: 0,
            offset_y: 0,
            observed: Cell::new(i32::MAX, i32::MAX, i32::MIN, i32::MIN),
            leaves: None,
            hints: SmallVec::new(),
            hint_cache: true,
        }
    }

    /// The subdivision floor this tree packs at.
    pub const fn min_resolution(&self) -> i32 {
        self.min_resolution
    }

    /// The current trial offset.
    pub const fn offset(&self) -> (i32, i32) {
        (self.offset_x, self.offset_y)
    }

    /// Set the trial offset applied to every leaf by [`Tree::fits`] and
    /// [`Tree::place`].
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.offset_x = x;
        self.offset_y = y;
    }

    /// Running bounds of all inserted leaf cells.
    ///
    /// This is a min/max accumulator over raw leaf coordinates, not a
    /// geometric rectangle: `x`/`y` hold the smallest leaf `x`/`y` seen and
    /// `width`/`height` hold the *largest* leaf `x`/`y` seen. Before the
    /// first insertion the fields sit at their fold identities
    /// (`i32::MAX`/`i32::MIN`). Consumers sizing or centering the shape read
    /// all four fields as coordinates.
    pub const fn observed_bounds(&self) -> Cell {
        self.observed
    }

    /// Enable or disable the ancestor-hint cache.
    ///
    /// The cache is purely a descent shortcut for spatially adjacent
    /// insertions and never changes results; disabling it makes every
    /// insertion descend from the root.
    pub fn set_hint_cache(&mut self, enabled: bool) {
        self.hint_cache = enabled;
        if !enabled {
            self.hints.clear();
        }
    }

    /// Insert an occupied cell during shape construction.
    ///
    /// `cell` must satisfy the preconditions listed on [`Tree`]; `id` is the
    /// shape's word identifier. Insertion starts from the deepest recently
    /// visited node that intersects `cell` (when the hint cache is enabled)
    /// and falls back to the root. Inserting after [`Tree::release_nodes`]
    /// is not meaningful: the memoized leaf list no longer changes.
    pub fn insert(&mut self, cell: Cell, id: WordId) {
        while let Some(hint) = self.hints.pop() {
            if self.node(hint).bounds.intersects(&cell) {
                self.insert_at(hint, cell, id);
                return;
            }
        }
        self.insert_at(self.root, cell, id);
    }

    fn insert_at(&mut self, node: NodeId, r: Cell, id: WordId) {
        if self.node(node).bounds.width == self.min_resolution {
            self.node_mut(node).fill = Fill::Word(id);
            return;
        }
        let i = child_index(self.node(node).quads(), &r);
        if self.hint_cache {
            self.hints.push(node);
        }
        let child = match self.node(node).children[i] {
            Some(c) => c,
            None => {
                let bounds = self.node(node).quads()[i];
                let c = self.alloc(bounds);
                self.node_mut(node).children[i] = Some(c);
                c
            }
        };
        let cb = self.node(child).bounds;
        if cb.width >= self.min_resolution && cb.height >= self.min_resolution {
            self.insert_at(child, r, id);
            if cb.width == self.min_resolution {
                self.node_mut(child).fill = Fill::Word(id);
                self.observed.x = self.observed.x.min(cb.x);
                self.observed.y = self.observed.y.min(cb.y);
                self.observed.width = self.observed.width.max(cb.x);
                self.observed.height = self.observed.height.max(cb.y);
            }
        }
        // A node is covered once all four children exist and none is empty;
        // re-derived bottom-up after every insertion that touches a child.
        let children = self.node(node).children;
        let covered = children.iter().all(|c| match c {
            Some(c) => self.node(*c).fill != Fill::Empty,
            None => false,
        });
        if covered {
            self.node_mut(node).fill = Fill::Covered;
        }
    }

    /// Whether a `cell`-sized region of the shape's own bounds is still free.
    ///
    /// Non-mutating; used by rasterizers that probe before inserting.
    pub fn is_available(&self, cell: &Cell) -> bool {
        self.available_at(self.root, cell)
    }

    fn available_at(&self, node: NodeId, r: &Cell) -> bool {
        let n = self.node(node);
        if n.fill != Fill::Empty {
            return false;
        }
        if n.is_leaf() {
            return true;
        }
        match n.children[child_index(n.quads(), r)] {
            // Never expanded: nothing was placed there.
            None => true,
            Some(child) => self.available_at(child, r),
        }
    }

    /// The word occupying the canvas-local point `(x, y)`, if any.
    ///
    /// The point is tested inflated by two units per side, so UI picking
    /// tolerates sub-pixel and rounding misses at cell boundaries. Quadrants
    /// are scanned in fixed order (top-left, top-right, bottom-left,
    /// bottom-right) and the first intersecting quadrant with an expanded
    /// child wins.
    pub fn word_id_at(&self, x: i32, y: i32) -> Option<WordId> {
        self.word_at(self.root, x, y)
    }

    fn word_at(&self, node: NodeId, x: i32, y: i32) -> Option<WordId> {
        let n = self.node(node);
        // A node carrying a word id is always a leaf by construction.
        if let Fill::Word(id) = n.fill {
            return Some(id);
        }
        if n.is_leaf() {
            return None;
        }
        let probe = Cell::new(
            x - POINT_MARGIN,
            y - POINT_MARGIN,
            2 * POINT_MARGIN,
            2 * POINT_MARGIN,
        );
        for (quad, child) in n.quads().iter().zip(&n.children) {
            if quad.intersects(&probe)
                && let Some(child) = child
            {
                return self.word_at(*child, x, y);
            }
        }
        None
    }

    /// The shape's filled leaf cells, flattened in pre-order.
    ///
    /// Computed lazily on first call and memoized. The order is the
    /// traversal order at computation time, later perturbed only by the
    /// failure-driven reordering in [`Tree::fits`]. Construction is expected
    /// to be over: cells inserted after the first call are not reflected.
    pub fn leaves(&mut self) -> &[Leaf] {
        self.ensure_leaves();
        self.leaves.as_deref().expect("leaf cache was just computed")
    }

    fn ensure_leaves(&mut self) {
        if self.leaves.is_some() {
            return;
        }
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        self.leaves = Some(out);
    }

    fn collect_leaves(&self, node: NodeId, out: &mut Vec<Leaf>) {
        let n = self.node(node);
        if n.is_leaf() {
            if let Fill::Word(id) = n.fill {
                out.push(Leaf {
                    cell: n.bounds,
                    id,
                });
            }
        } else {
            for child in n.children.iter().flatten() {
                self.collect_leaves(*child, out);
            }
        }
    }

    /// Whether the shape, translated by the current offset, lands only on
    /// unoccupied canvas cells.
    ///
    /// Each leaf maps to the grid index `((leaf.x + offset_x) / resolution,
    /// (leaf.y + offset_y) / resolution)` (truncating division); the first
    /// occupied index fails the trial. As a deliberate side effect the
    /// offending leaf is rotated to the front of the leaf list, so the next
    /// trial re-checks the most recently colliding cell first and
    /// short-circuits sooner on repeated near-misses. Trial offsets must
    /// keep every translated index inside the grid.
    pub fn fits<G: Occupancy>(&mut self, grid: &G) -> bool {
        let (dx, dy) = (self.offset_x, self.offset_y);
        let resolution = self.min_resolution;
        self.ensure_leaves();
        let leaves = self
            .leaves
            .as_mut()
            .expect("leaf cache was just computed");
        for i in 0..leaves.len() {
            let cell = leaves[i].cell;
            if grid
                .get((cell.x + dx) / resolution, (cell.y + dy) / resolution)
                .is_some()
            {
                leaves[..=i].rotate_right(1);
                return false;
            }
        }
        true
    }

    /// Commit the shape to the canvas, writing `id` at every leaf's
    /// translated index.
    ///
    /// No re-verification: callers only place after [`Tree::fits`] succeeded
    /// at the identical offset.
    pub fn place<G: Occupancy>(&mut self, grid: &mut G, id: WordId) {
        let (dx, dy) = (self.offset_x, self.offset_y);
        let resolution = self.min_resolution;
        self.ensure_leaves();
        for leaf in self.leaves.as_deref().expect("leaf cache was just computed") {
            grid.set(
                (leaf.cell.x + dx) / resolution,
                (leaf.cell.y + dy) / resolution,
                id,
            );
        }
    }

    /// Drop the interior hierarchy, keeping the flattened leaf list.
    ///
    /// Forces the leaf cache if it was not computed yet, then truncates the
    /// arena to the root shell and clears the hint stack. The tree stays
    /// usable for further offset trials and commits; shape construction is
    /// over.
    pub fn release_nodes(&mut self) {
        self.ensure_leaves();
        self.nodes.truncate(1);
        self.nodes[self.root.idx()].children = [None; 4];
        self.hints.clear();
    }

    fn alloc(&mut self, bounds: Cell) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(bounds, self.min_resolution));
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.idx()]
    }
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("nodes", &self.nodes.len())
            .field("min_resolution", &self.min_resolution)
            .field("offset", &(self.offset_x, self.offset_y))
            .field("leaves_cached", &self.leaves.as_ref().map(Vec::len))
            .finish_non_exhaustive()
    }
}
