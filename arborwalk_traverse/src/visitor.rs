// Copyright 2025 the Arborwalk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visitor registration: orders, order masks, and the per-order registry.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use arborwalk_tree::{ResolvedTree, VertexId};

use crate::command::Command;

/// The three depth-first visitation orders.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VisitOrder {
    /// A vertex is visited before any of its descendants.
    Pre,
    /// A vertex is visited between its children's subtrees, as decided by the
    /// configured [`InOrderPolicy`](crate::InOrderPolicy); leaves are visited
    /// in place.
    In,
    /// A vertex is visited after all of its descendants.
    Post,
}

impl VisitOrder {
    /// All orders, in pre/in/post sequence.
    pub const ALL: [Self; 3] = [Self::Pre, Self::In, Self::Post];

    pub(crate) const fn idx(self) -> usize {
        match self {
            Self::Pre => 0,
            Self::In => 1,
            Self::Post => 2,
        }
    }
}

bitflags::bitflags! {
    /// A set of visitation orders, used to toggle visitor invocation and
    /// consumer-facing yields per run.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OrderMask: u8 {
        /// Pre-order visits.
        const PRE = 0b0000_0001;
        /// In-order visits.
        const IN = 0b0000_0010;
        /// Post-order visits.
        const POST = 0b0000_0100;
    }
}

impl OrderMask {
    /// Whether the mask covers the given order.
    pub fn contains_order(self, order: VisitOrder) -> bool {
        self.contains(Self::from(order))
    }
}

impl From<VisitOrder> for OrderMask {
    fn from(order: VisitOrder) -> Self {
        match order {
            VisitOrder::Pre => Self::PRE,
            VisitOrder::In => Self::IN,
            VisitOrder::Post => Self::POST,
        }
    }
}

impl Default for OrderMask {
    fn default() -> Self {
        Self::all()
    }
}

/// Everything a visitor learns about the visit it is invoked for.
///
/// The resolved store is passed alongside as a shared reference; visitors
/// observe it freely and mutate only through the [`Command`]s they return.
pub struct VisitEvent<'a> {
    /// The vertex being visited.
    pub handle: VertexId,
    /// Which order this visit belongs to.
    pub order: VisitOrder,
    /// Running count of visits of this order, starting at 0.
    pub visit_index: usize,
    /// The handle visited before this one in the same order, if any.
    pub previous: Option<VertexId>,
    /// Whether the handle is the root of the current run. For a subtree run
    /// this differs from [`VisitEvent::is_tree_root`].
    pub is_traversal_root: bool,
    /// Whether the handle is the root of the whole resolved tree.
    pub is_tree_root: bool,
    /// Value handed over by the previous sequential visitor in this vertex's
    /// chain, if any. Always `None` for concurrent visitors.
    pub chain_state: Option<&'a dyn Any>,
}

impl core::fmt::Debug for VisitEvent<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VisitEvent")
            .field("handle", &self.handle)
            .field("order", &self.order)
            .field("visit_index", &self.visit_index)
            .field("previous", &self.previous)
            .field("is_traversal_root", &self.is_traversal_root)
            .field("is_tree_root", &self.is_tree_root)
            .field("chain_state", &self.chain_state.is_some())
            .finish()
    }
}

/// Boxed visitor callback.
pub type VisitorFn<D, H> =
    Box<dyn FnMut(&ResolvedTree<D, H>, &VisitEvent<'_>) -> Vec<Command<D, H>>>;

/// How a visitor's effects combine with its neighbors on the same order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ResolutionStyle {
    /// Invoked in turn; sees the effects of earlier sequential visitors,
    /// receives and passes chain state, and a halt stops the rest of the
    /// chain.
    #[default]
    Sequential,
    /// Invoked against the pre-visit state; command batches are collected and
    /// applied together after the chain finishes. No chain state.
    Concurrent,
}

/// A visitor callback plus its scheduling attributes.
///
/// ## Example
///
/// ```rust
/// use arborwalk_traverse::{Command, Visitor};
///
/// let visitor: Visitor<&str, u32> = Visitor::new(|_, event| {
///     if event.visit_index == 2 {
///         vec![Command::Halt]
///     } else {
///         Vec::new()
///     }
/// })
/// .with_priority(10);
/// ```
pub struct Visitor<D, H> {
    pub(crate) priority: i32,
    pub(crate) style: ResolutionStyle,
    pub(crate) callback: VisitorFn<D, H>,
}

impl<D, H> Visitor<D, H> {
    /// Wrap a callback with default priority (0) and sequential style.
    pub fn new(
        callback: impl FnMut(&ResolvedTree<D, H>, &VisitEvent<'_>) -> Vec<Command<D, H>> + 'static,
    ) -> Self {
        Self {
            priority: 0,
            style: ResolutionStyle::Sequential,
            callback: Box::new(callback),
        }
    }

    /// Wrap a command-less callback that only observes visits.
    pub fn observe(
        mut callback: impl FnMut(&ResolvedTree<D, H>, &VisitEvent<'_>) + 'static,
    ) -> Self {
        Self::new(move |tree, event| {
            callback(tree, event);
            Vec::new()
        })
    }

    /// Set the scheduling priority. Higher priorities run first; ties run in
    /// registration order.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Mark the visitor concurrent; see [`ResolutionStyle::Concurrent`].
    pub fn concurrent(mut self) -> Self {
        self.style = ResolutionStyle::Concurrent;
        self
    }
}

impl<D, H> core::fmt::Debug for Visitor<D, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Visitor")
            .field("priority", &self.priority)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

struct Entry<D, H> {
    seq: u64,
    visitor: Visitor<D, H>,
}

/// Per-order registry of visitors, kept in invocation order.
pub struct VisitorSet<D, H> {
    lanes: [Vec<Entry<D, H>>; 3],
    next_seq: u64,
}

impl<D, H> Default for VisitorSet<D, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, H> VisitorSet<D, H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            lanes: [Vec::new(), Vec::new(), Vec::new()],
            next_seq: 0,
        }
    }

    /// Register a visitor for the given order.
    pub fn register(&mut self, order: VisitOrder, visitor: Visitor<D, H>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let lane = &mut self.lanes[order.idx()];
        lane.push(Entry { seq, visitor });
        lane.sort_by(|a, b| {
            b.visitor
                .priority
                .cmp(&a.visitor.priority)
                .then(a.seq.cmp(&b.seq))
        });
    }

    /// Number of visitors registered for an order.
    pub fn len_of(&self, order: VisitOrder) -> usize {
        self.lanes[order.idx()].len()
    }

    /// Whether no visitor is registered at all.
    pub fn is_empty(&self) -> bool {
        self.lanes.iter().all(Vec::is_empty)
    }

    pub(crate) fn style_of(&self, order: VisitOrder, index: usize) -> ResolutionStyle {
        self.lanes[order.idx()][index].visitor.style
    }

    pub(crate) fn callback_mut(&mut self, order: VisitOrder, index: usize) -> &mut VisitorFn<D, H> {
        &mut self.lanes[order.idx()][index].visitor.callback
    }
}

impl<D, H> core::fmt::Debug for VisitorSet<D, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VisitorSet")
            .field("pre", &self.len_of(VisitOrder::Pre))
            .field("in_order", &self.len_of(VisitOrder::In))
            .field("post", &self.len_of(VisitOrder::Post))
            .finish_non_exhaustive()
    }
}
