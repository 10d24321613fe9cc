// Copyright 2025 the Arborwalk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability interface a traversable tree provides to the walker.

use arborwalk_tree::{ResolutionContext, Vertex};

/// A lazily materialized tree.
///
/// The walker treats a tree purely through these two operations: produce a
/// root vertex, and produce a child vertex for a parent-provided hint. `None`
/// is the normal "nothing here" signal in both — an empty tree from
/// [`TreeSource::make_root`], a skipped child position from
/// [`TreeSource::make_vertex`] — and is never an error.
///
/// Hints are cloned onto the walker's work stack when a parent is expanded,
/// so they should be cheap descriptors (indices, keys, small paths).
pub trait TreeSource {
    /// Payload type of produced vertices.
    type Data;
    /// Child descriptor type.
    type Hint: Clone;

    /// Produce the root vertex, or `None` for an empty tree.
    fn make_root(&mut self) -> Option<Vertex<Self::Data, Self::Hint>>;

    /// Materialize the vertex a hint describes, or `None` to skip this child
    /// position. A skipped position still counts toward its parent's sibling
    /// bookkeeping.
    fn make_vertex(
        &mut self,
        hint: Self::Hint,
        ctx: &ResolutionContext,
    ) -> Option<Vertex<Self::Data, Self::Hint>>;
}
