// Copyright 2025 the Arborwalk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The depth-first walker: an explicit-stack, resumable traversal engine.

use alloc::vec::Vec;

use arborwalk_tree::{ResolutionContext, ResolvedTree, VertexFlags, VertexId};

use crate::command::{ChainState, Command};
use crate::config::{ChildOrder, IterConfig, WalkConfig};
use crate::source::TreeSource;
use crate::state::{ChildProgress, Cursor, PendingHint, Status, TraversalState};
use crate::visitor::{OrderMask, ResolutionStyle, VisitEvent, VisitOrder, VisitorSet};

/// One performed visit, as surfaced to a consumer loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Visit {
    /// The visited vertex.
    pub handle: VertexId,
    /// Which order the visit belongs to.
    pub order: VisitOrder,
    /// Running index of this visit within its order.
    pub index: usize,
}

/// A suspended traversal, captured from one walker and ready to be handed to
/// a new one via [`Walker::resume`].
///
/// Ownership of the store and state transfers atomically: the old walker is
/// consumed, so no two runs can share them. Visitors are not captured; the
/// resuming caller registers its own.
pub struct WalkParts<D, H> {
    store: ResolvedTree<D, H>,
    state: TraversalState<H>,
    config: WalkConfig<H>,
}

impl<D, H> WalkParts<D, H> {
    /// The resolved store as captured.
    pub fn store(&self) -> &ResolvedTree<D, H> {
        &self.store
    }

    /// Discard the suspended run and keep only the store.
    pub fn into_store(self) -> ResolvedTree<D, H> {
        self.store
    }
}

impl<D, H> core::fmt::Debug for WalkParts<D, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WalkParts")
            .field("store", &self.store)
            .field("status", &self.state.status)
            .finish_non_exhaustive()
    }
}

/// Resumable depth-first walker over a lazily materialized tree.
///
/// The walker pulls a root from its [`TreeSource`], then repeatedly pops a
/// pending hint, materializes it, registers it in the [`ResolvedTree`], runs
/// pre-order visitors, and pushes the new vertex's own hints. When a vertex
/// turns out to be a leaf (or its subtree is disabled), the walker climbs
/// back up performing in-order and post-order visitation until it reaches an
/// ancestor with children still pending.
///
/// Every visit is a suspension point. [`Walker::run`] drives to completion,
/// [`Walker::step`] performs work up to the next surfaced visit, and
/// [`Walker::visits`] wraps stepping in an iterator. A [`Command::Halt`]
/// returned by a visitor stops the current drive after its yield; driving the
/// walker again resumes the same suspended traversal, as does handing
/// [`Walker::into_parts`] to [`Walker::resume`] on a fresh instance. Either
/// way the total visitation sequence is the same as an uninterrupted run.
///
/// ## Minimal example
///
/// A two-leaf tree, walked while counting pre-order visits:
///
/// ```rust
/// use arborwalk_traverse::{IterConfig, TreeSource, VisitOrder, Walker};
/// use arborwalk_tree::{ResolutionContext, Vertex};
///
/// struct Pair;
///
/// impl TreeSource for Pair {
///     type Data = u32;
///     type Hint = u32;
///
///     fn make_root(&mut self) -> Option<Vertex<u32, u32>> {
///         Some(Vertex::new(0, vec![1, 2]))
///     }
///
///     fn make_vertex(&mut self, hint: u32, _ctx: &ResolutionContext) -> Option<Vertex<u32, u32>> {
///         Some(Vertex::leaf(hint))
///     }
/// }
///
/// let mut walker = Walker::new(Pair);
/// let visits: Vec<_> = walker.visits(IterConfig::default()).collect();
/// let pre: Vec<u32> = visits
///     .iter()
///     .filter(|v| v.order == VisitOrder::Pre)
///     .map(|v| walker.store().vertex(v.handle).data)
///     .collect();
/// assert_eq!(pre, vec![0, 1, 2]);
/// ```
pub struct Walker<S: TreeSource> {
    source: S,
    store: ResolvedTree<S::Data, S::Hint>,
    state: TraversalState<S::Hint>,
    visitors: VisitorSet<S::Data, S::Hint>,
    config: WalkConfig<S::Hint>,
}

impl<S: TreeSource> core::fmt::Debug for Walker<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Walker")
            .field("store", &self.store)
            .field("status", &self.state.status)
            .field("visitors", &self.visitors)
            .finish_non_exhaustive()
    }
}

impl<S: TreeSource> Walker<S> {
    /// Create a walker with the default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, WalkConfig::default())
    }

    /// Create a walker with the given configuration.
    pub fn with_config(source: S, config: WalkConfig<S::Hint>) -> Self {
        Self {
            source,
            store: ResolvedTree::new(),
            state: TraversalState::new(),
            visitors: VisitorSet::new(),
            config,
        }
    }

    /// Create a walker for a fresh run over the subtree rooted at `root` of
    /// an existing store.
    ///
    /// The run re-derives the subtree from the source: `root`'s children
    /// links are cleared up front and its former descendants become orphans,
    /// like after a [`ResolvedTree::delete`]. Within the run, `root` is the
    /// traversal root; [`VisitEvent::is_tree_root`] keeps reporting against
    /// the store's real root.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not registered in `store`.
    pub fn subtree(
        source: S,
        mut store: ResolvedTree<S::Data, S::Hint>,
        root: VertexId,
        config: WalkConfig<S::Hint>,
    ) -> Self {
        assert!(
            store.is_registered(root),
            "subtree traversal root is not registered"
        );
        store.clear_children(root);
        Self {
            source,
            store,
            state: TraversalState::rooted_at(root),
            visitors: VisitorSet::new(),
            config,
        }
    }

    /// Resume a suspended traversal in a new walker instance.
    ///
    /// Continues from exactly the captured suspension point without repeating
    /// work; driving the result produces the remainder of the original
    /// visitation sequence. Visitors must be registered anew.
    pub fn resume(source: S, parts: WalkParts<S::Data, S::Hint>) -> Self {
        Self {
            source,
            store: parts.store,
            state: parts.state,
            visitors: VisitorSet::new(),
            config: parts.config,
        }
    }

    /// Capture the run's store, state, and configuration for a later
    /// [`Walker::resume`], consuming this walker.
    pub fn into_parts(self) -> WalkParts<S::Data, S::Hint> {
        WalkParts {
            store: self.store,
            state: self.state,
            config: self.config,
        }
    }

    /// Consume the walker, keeping only the resolved store.
    pub fn into_store(self) -> ResolvedTree<S::Data, S::Hint> {
        self.store
    }

    /// The resolved store as discovered so far.
    pub fn store(&self) -> &ResolvedTree<S::Data, S::Hint> {
        &self.store
    }

    /// The run's lifecycle status.
    pub fn status(&self) -> Status {
        self.state.status
    }

    /// The visitor registry.
    pub fn visitors_mut(&mut self) -> &mut VisitorSet<S::Data, S::Hint> {
        &mut self.visitors
    }

    /// Drive the traversal to completion (or to the next halt), invoking
    /// visitors on every order. Returns the resulting status.
    ///
    /// Driving a halted walker resumes it; a finished walker is a no-op.
    pub fn run(&mut self) -> Status {
        let config = IterConfig {
            invoke: OrderMask::all(),
            emit: OrderMask::empty(),
        };
        while self.pump(&config).is_some() {}
        self.state.status
    }

    /// Perform work up to the next visit covered by `config.emit` and return
    /// it, or `None` when the traversal finishes or halts first.
    ///
    /// Like the rest of the driving API, stepping a halted walker resumes it.
    pub fn step(&mut self, config: &IterConfig) -> Option<Visit> {
        self.pump(config)
    }

    /// Iterate the visits covered by `config.emit`.
    ///
    /// The iterator ends after the visit whose visitor halted the traversal;
    /// a later [`Walker::visits`] (or any other driving call) resumes from
    /// the suspension point.
    pub fn visits(&mut self, config: IterConfig) -> Visits<'_, S> {
        Visits {
            walker: self,
            config,
            stopped: false,
        }
    }

    /// Advance the state machine until a visit is emitted, the traversal
    /// finishes, or a halt lands. At most one visit is surfaced per call.
    fn pump(&mut self, config: &IterConfig) -> Option<Visit> {
        match self.state.status {
            Status::Finished => return None,
            Status::Initial | Status::Halted => self.state.status = Status::Running,
            Status::Running => {}
        }
        loop {
            let cursor = self.state.cursor;
            match cursor {
                Cursor::Bootstrap => {
                    let Some(content) = self.source.make_root() else {
                        self.state.status = Status::Finished;
                        return None;
                    };
                    let id = self.store.alloc(content);
                    self.store.set_root(id);
                    self.state.traversal_root = Some(id);
                    self.state.cursor = Cursor::AfterPre(id);
                    if let Some(visit) = self.perform_visit(VisitOrder::Pre, id, config) {
                        return Some(visit);
                    }
                }
                Cursor::BootstrapAt(id) => {
                    self.state.cursor = Cursor::AfterPre(id);
                    if let Some(visit) = self.perform_visit(VisitOrder::Pre, id, config) {
                        return Some(visit);
                    }
                }
                Cursor::AfterPre(id) => {
                    let deleted = !self.store.is_registered(id);
                    let disabled = self
                        .store
                        .flags_of(id)
                        .contains(VertexFlags::SUBTREE_DISABLED);
                    let is_leaf = self.store.vertex(id).is_leaf();
                    if !deleted && !disabled && !is_leaf {
                        self.push_children(id);
                        self.state.cursor = Cursor::Expand;
                    } else if is_leaf {
                        self.state.cursor = Cursor::LeafIn(id);
                    } else {
                        // Disabled or deleted while still carrying hints: no
                        // descent and no leaf-style in-order visit.
                        self.state.cursor = Cursor::EmitPost(id);
                    }
                }
                Cursor::LeafIn(id) => {
                    self.state.cursor = Cursor::EmitPost(id);
                    if let Some(visit) = self.perform_visit(VisitOrder::In, id, config) {
                        return Some(visit);
                    }
                }
                Cursor::EmitPost(id) => {
                    self.state.cursor = Cursor::AscendFrom(id);
                    if let Some(visit) = self.perform_visit(VisitOrder::Post, id, config) {
                        return Some(visit);
                    }
                }
                Cursor::AscendFrom(id) => {
                    if Some(id) == self.state.traversal_root {
                        self.state.cursor = Cursor::Expand;
                    } else {
                        let ctx = self
                            .store
                            .context_of(id)
                            .expect("ascending from a vertex with no resolution context");
                        let parent = ctx.parent.expect("non-root vertex without a parent");
                        let child_index = ctx.hint_index;
                        self.state.cursor = Cursor::MaybeParentIn {
                            parent,
                            child_index,
                        };
                    }
                }
                Cursor::MaybeParentIn {
                    parent,
                    child_index,
                } => {
                    let total = self
                        .state
                        .progress
                        .get(&parent)
                        .expect("no child bookkeeping for parent")
                        .total;
                    self.state.cursor = Cursor::Decrement(parent);
                    if self.config.in_order.should_visit_parent(child_index, total)
                        && let Some(visit) = self.perform_visit(VisitOrder::In, parent, config)
                    {
                        return Some(visit);
                    }
                }
                Cursor::Decrement(parent) => {
                    let progress = self
                        .state
                        .progress
                        .get_mut(&parent)
                        .expect("no child bookkeeping for parent");
                    progress.left -= 1;
                    if progress.left > 0 {
                        self.state.cursor = Cursor::Expand;
                    } else {
                        self.state.cursor = Cursor::EmitPost(parent);
                    }
                }
                Cursor::Expand => {
                    let Some(PendingHint { hint, ctx }) = self.state.stack.pop() else {
                        self.state.status = Status::Finished;
                        return None;
                    };
                    let parent = ctx.parent.expect("pending hint without a parent");
                    match self.source.make_vertex(hint, &ctx) {
                        None => {
                            // The hint yields no vertex. The position still
                            // counts as a completed child so sibling
                            // bookkeeping stays consistent.
                            self.state.cursor = Cursor::MaybeParentIn {
                                parent,
                                child_index: ctx.hint_index,
                            };
                        }
                        Some(content) => {
                            let id = self.store.alloc(content);
                            self.store.register(id, ctx);
                            self.store.append_children(parent, &[id]);
                            self.state.cursor = Cursor::AfterPre(id);
                            if let Some(visit) = self.perform_visit(VisitOrder::Pre, id, config) {
                                return Some(visit);
                            }
                        }
                    }
                }
            }
            if self.state.status != Status::Running {
                return None;
            }
        }
    }

    /// Push `id`'s hints as pending children and set its progress counter.
    fn push_children(&mut self, id: VertexId) {
        let depth = self.store.depth_of(id).unwrap_or(0) + 1;
        let mut hints: Vec<S::Hint> = self.store.vertex(id).child_hints.clone();
        if let Some(compare) = &mut self.config.hint_sort {
            hints.sort_by(|a, b| compare(a, b));
        }
        let total = hints.len();
        self.state
            .progress
            .insert(id, ChildProgress { left: total, total });
        match self.config.child_order {
            ChildOrder::Forward => {
                // Push in reverse so the hint at index 0 pops first.
                for (hint_index, hint) in hints.into_iter().enumerate().rev() {
                    self.state.stack.push(PendingHint {
                        hint,
                        ctx: ResolutionContext::child_of(id, depth, hint_index),
                    });
                }
            }
            ChildOrder::Reversed => {
                for (hint_index, hint) in hints.into_iter().enumerate() {
                    self.state.stack.push(PendingHint {
                        hint,
                        ctx: ResolutionContext::child_of(id, depth, hint_index),
                    });
                }
            }
        }
    }

    /// Run visitors for one visit (if configured), advance the per-order
    /// bookkeeping, and return the visit when `config.emit` covers it.
    fn perform_visit(
        &mut self,
        order: VisitOrder,
        handle: VertexId,
        config: &IterConfig,
    ) -> Option<Visit> {
        let index = self.state.book(order).count;
        let previous = self.state.book(order).previous;
        if config.invoke.contains_order(order) {
            self.invoke_visitors(order, handle, index, previous);
        }
        let book = self.state.book_mut(order);
        book.count = index + 1;
        book.previous = Some(handle);
        let visit = Visit {
            handle,
            order,
            index,
        };
        config.emit.contains_order(order).then_some(visit)
    }

    /// Invoke the order's visitors in priority order. Sequential visitors
    /// apply their commands immediately and hand chain state forward; a halt
    /// stops the rest of the chain. Concurrent visitors all observe the
    /// pre-visit state and their batches apply together at the end.
    fn invoke_visitors(
        &mut self,
        order: VisitOrder,
        handle: VertexId,
        visit_index: usize,
        previous: Option<VertexId>,
    ) {
        let count = self.visitors.len_of(order);
        if count == 0 {
            return;
        }
        let is_traversal_root = self.state.traversal_root == Some(handle);
        let is_tree_root = self.store.root() == Some(handle);
        let mut chain: Option<ChainState> = None;
        let mut batched: Vec<Command<S::Data, S::Hint>> = Vec::new();
        let mut index = 0;
        while index < count {
            let style = self.visitors.style_of(order, index);
            let commands = {
                let event = VisitEvent {
                    handle,
                    order,
                    visit_index,
                    previous,
                    is_traversal_root,
                    is_tree_root,
                    chain_state: match style {
                        ResolutionStyle::Sequential => chain.as_deref(),
                        ResolutionStyle::Concurrent => None,
                    },
                };
                (self.visitors.callback_mut(order, index))(&self.store, &event)
            };
            match style {
                ResolutionStyle::Sequential => {
                    self.apply_batch(handle, order, commands, Some(&mut chain));
                    if self.state.status == Status::Halted {
                        break;
                    }
                }
                ResolutionStyle::Concurrent => batched.extend(commands),
            }
            index += 1;
        }
        if !batched.is_empty() {
            self.apply_batch(handle, order, batched, None);
        }
    }

    /// Apply one command batch against the store and traversal state.
    fn apply_batch(
        &mut self,
        handle: VertexId,
        order: VisitOrder,
        commands: Vec<Command<S::Data, S::Hint>>,
        mut chain: Option<&mut Option<ChainState>>,
    ) {
        for command in commands {
            match command {
                Command::Halt => self.state.status = Status::Halted,
                Command::RewriteData(data) => self.store.rewrite_data(handle, data),
                Command::RewriteHints(hints) => {
                    let disabled = self
                        .store
                        .flags_of(handle)
                        .contains(VertexFlags::SUBTREE_DISABLED);
                    if order == VisitOrder::Pre && !disabled {
                        self.store.rewrite_hints(handle, hints);
                    } else {
                        // The hints-to-stack derivation only happens right
                        // after the pre-order visit; anywhere else the
                        // rewrite could not take effect.
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            ?order,
                            disabled,
                            "ignoring hint rewrite outside pre-order visitation"
                        );
                    }
                }
                Command::Delete => self.store.delete(handle),
                Command::DisableSubtree => {
                    self.store.insert_flags(handle, VertexFlags::SUBTREE_DISABLED);
                }
                Command::SetChainState(value) => {
                    if let Some(chain) = chain.as_deref_mut() {
                        *chain = Some(value);
                    }
                }
            }
        }
    }
}

impl<S: TreeSource> Walker<S>
where
    S::Data: Clone,
    S::Hint: Clone,
{
    /// Create a walker whose store retains pristine shadow copies of every
    /// vertex as first materialized; see [`ResolvedTree::with_pristine`].
    pub fn with_pristine(source: S, config: WalkConfig<S::Hint>) -> Self {
        Self {
            source,
            store: ResolvedTree::with_pristine(),
            state: TraversalState::new(),
            visitors: VisitorSet::new(),
            config,
        }
    }
}

/// Iterator over a walker's surfaced visits; see [`Walker::visits`].
pub struct Visits<'w, S: TreeSource> {
    walker: &'w mut Walker<S>,
    config: IterConfig,
    stopped: bool,
}

impl<S: TreeSource> Iterator for Visits<'_, S> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        if self.stopped {
            return None;
        }
        match self.walker.pump(&self.config) {
            Some(visit) => {
                if self.walker.state.status != Status::Running {
                    self.stopped = true;
                }
                Some(visit)
            }
            None => {
                self.stopped = true;
                None
            }
        }
    }
}

impl<S: TreeSource> core::iter::FusedIterator for Visits<'_, S> {}

impl<S: TreeSource> core::fmt::Debug for Visits<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Visits")
            .field("config", &self.config)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}
