// Copyright 2025 the Arborwalk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutable per-run traversal state.

use alloc::vec::Vec;
use hashbrown::HashMap;

use arborwalk_tree::{ResolutionContext, VertexId};

use crate::visitor::VisitOrder;

/// Lifecycle of a traversal run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Created but not driven yet.
    #[default]
    Initial,
    /// Between suspension points.
    Running,
    /// Suspended by a halt command; driving the walker again resumes it.
    Halted,
    /// All visitation flushed. Terminal: further driving is a no-op.
    Finished,
}

/// A child position waiting on the work stack.
#[derive(Clone, Debug)]
pub(crate) struct PendingHint<H> {
    pub(crate) hint: H,
    pub(crate) ctx: ResolutionContext,
}

/// Per-parent completion bookkeeping. `total` is the denominator for the
/// in-order policy; `left` counts child positions not yet fully visited.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ChildProgress {
    pub(crate) left: usize,
    pub(crate) total: usize,
}

/// Per-order visit bookkeeping.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct OrderBook {
    pub(crate) count: usize,
    pub(crate) previous: Option<VertexId>,
}

/// The walker's continuation: where the state machine picks up on the next
/// drive. Every variant between two visits is representable, which is what
/// makes halting mid-walk and resuming (possibly in a new walker instance)
/// a plain move of this state.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Cursor {
    /// Ask the source for a root vertex.
    Bootstrap,
    /// Start a run at an already-materialized vertex (subtree runs).
    BootstrapAt(VertexId),
    /// Pre-order visit done; descend or start completing the vertex.
    AfterPre(VertexId),
    /// The vertex is a leaf: give it its in-order visit.
    LeafIn(VertexId),
    /// The vertex's subtree is complete: give it its post-order visit.
    EmitPost(VertexId),
    /// Walk upward from a completed vertex.
    AscendFrom(VertexId),
    /// A child position under `parent` completed; consult the in-order
    /// policy before decrementing.
    MaybeParentIn {
        parent: VertexId,
        child_index: usize,
    },
    /// Decrement the parent's progress counter and either resume expansion
    /// or complete the parent.
    Decrement(VertexId),
    /// Pop the next pending hint off the work stack.
    Expand,
}

/// Everything mutable about one traversal run.
#[derive(Debug)]
pub(crate) struct TraversalState<H> {
    pub(crate) stack: Vec<PendingHint<H>>,
    pub(crate) progress: HashMap<VertexId, ChildProgress>,
    pub(crate) books: [OrderBook; 3],
    pub(crate) status: Status,
    pub(crate) traversal_root: Option<VertexId>,
    pub(crate) cursor: Cursor,
}

impl<H> TraversalState<H> {
    pub(crate) fn new() -> Self {
        Self {
            stack: Vec::new(),
            progress: HashMap::new(),
            books: [OrderBook::default(); 3],
            status: Status::Initial,
            traversal_root: None,
            cursor: Cursor::Bootstrap,
        }
    }

    /// State for a run rooted at an already-materialized vertex.
    pub(crate) fn rooted_at(root: VertexId) -> Self {
        Self {
            traversal_root: Some(root),
            cursor: Cursor::BootstrapAt(root),
            ..Self::new()
        }
    }

    pub(crate) fn book(&self, order: VisitOrder) -> OrderBook {
        self.books[order.idx()]
    }

    pub(crate) fn book_mut(&mut self, order: VisitOrder) -> &mut OrderBook {
        &mut self.books[order.idx()]
    }
}
