// Copyright 2025 the Arborwalk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the resolved tree: vertex values, handles, and resolution contexts.

use alloc::vec::Vec;

/// Identifier for a vertex slot in a [`ResolvedTree`](crate::ResolvedTree)'s arena.
///
/// A `VertexId` compares by identity only: two distinct allocations are never
/// equal, regardless of the vertex values they point at. Rewriting the vertex
/// behind an id does not invalidate other holders of the same id, and ids are
/// never reused within one store.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VertexId(pub(crate) u32);

impl VertexId {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A vertex value: its data plus the ordered hints describing potential children.
///
/// A `Vertex` is immutable per instance. "Rewriting" a vertex installs a new
/// `Vertex` value in the handle's slot; see
/// [`ResolvedTree::rewrite_data`](crate::ResolvedTree::rewrite_data) and
/// [`ResolvedTree::rewrite_hints`](crate::ResolvedTree::rewrite_hints).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vertex<D, H> {
    /// The payload carried by this vertex.
    pub data: D,
    /// Ordered descriptors for potential children, materialized lazily by the
    /// tree source when (and if) a walker reaches them.
    pub child_hints: Vec<H>,
}

impl<D, H> Vertex<D, H> {
    /// Create a vertex with the given data and child hints.
    pub fn new(data: D, child_hints: Vec<H>) -> Self {
        Self { data, child_hints }
    }

    /// Create a vertex with no child hints.
    pub fn leaf(data: D) -> Self {
        Self::new(data, Vec::new())
    }

    /// Whether this vertex carries no child hints.
    pub fn is_leaf(&self) -> bool {
        self.child_hints.is_empty()
    }
}

/// Bookkeeping attached to a vertex the first time it is discovered.
///
/// The context lives on the vertex's arena slot, so it keeps answering parent
/// and depth queries even after the vertex is deleted from the resolved tree
/// (orphans are documented behavior, not cleaned up).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolutionContext {
    /// Distance from the tree root (the root itself is at depth 0).
    pub depth: usize,
    /// The handle this vertex was discovered under. `None` iff the vertex is
    /// the tree root, which carries no resolution context at all.
    pub parent: Option<VertexId>,
    /// Position of the producing hint among its siblings, in hint-traversal
    /// order.
    pub hint_index: usize,
}

impl ResolutionContext {
    /// Context for a vertex discovered as the `hint_index`-th child of `parent`.
    pub const fn child_of(parent: VertexId, depth: usize, hint_index: usize) -> Self {
        Self {
            depth,
            parent: Some(parent),
            hint_index,
        }
    }
}

bitflags::bitflags! {
    /// Per-vertex flags consulted by the walker.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct VertexFlags: u8 {
        /// Treat the vertex as hint-less for the rest of the run: the walker
        /// will not descend into it even though it has child hints.
        const SUBTREE_DISABLED = 0b0000_0001;
    }
}

impl Default for VertexFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Flags controlling which endpoints [`ResolvedTree::path_to`](crate::ResolvedTree::path_to) includes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathConfig {
    /// Include the tree root (when the walk reaches it).
    pub include_root: bool,
    /// Include the queried handle itself.
    pub include_self: bool,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            include_root: true,
            include_self: true,
        }
    }
}
