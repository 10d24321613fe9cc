// Copyright 2025 the Arborwalk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The resolved-tree store: arena-backed handles plus discovery bookkeeping.

use alloc::vec::Vec;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::types::{PathConfig, ResolutionContext, Vertex, VertexFlags, VertexId};

/// Children lists are short for most trees; keep small ones inline.
type Children = SmallVec<[VertexId; 4]>;

/// Captured where `D: Clone, H: Clone` is provable so that [`ResolvedTree::alloc`]
/// stays free of `Clone` bounds.
type CloneVertexFn<D, H> = fn(&Vertex<D, H>) -> Vertex<D, H>;

struct Slot<D, H> {
    vertex: Vertex<D, H>,
    ctx: Option<ResolutionContext>,
    flags: VertexFlags,
}

impl<D, H> Slot<D, H> {
    fn new(vertex: Vertex<D, H>) -> Self {
        Self {
            vertex,
            ctx: None,
            flags: VertexFlags::empty(),
        }
    }
}

/// The materialized portion of a lazily-discovered tree.
///
/// The store owns an append-only arena of vertex slots and a registry mapping
/// registered handles to their children lists. Handles ([`VertexId`]) are
/// identity-only and stay dereferenceable for the lifetime of the store, even
/// after [`ResolvedTree::delete`] removes their registry entry — deletion
/// orphans descendants rather than cleaning them up, and callers must not
/// traverse through a deleted handle afterwards.
///
/// Registration order is an invariant: a handle is registered (via
/// [`ResolvedTree::set_root`] or [`ResolvedTree::register`]) before it may
/// appear in any children list.
///
/// ## Example
///
/// ```rust
/// use arborwalk_tree::{ResolutionContext, ResolvedTree, Vertex};
///
/// let mut tree: ResolvedTree<&str, u32> = ResolvedTree::new();
/// let root = tree.alloc(Vertex::new("root", vec![0, 1]));
/// tree.set_root(root);
///
/// let child = tree.alloc(Vertex::leaf("child"));
/// tree.register(child, ResolutionContext::child_of(root, 1, 0));
/// tree.append_children(root, &[child]);
///
/// assert_eq!(tree.children_of(root), Some(&[child][..]));
/// assert_eq!(tree.parent_of(child), Some(root));
/// ```
pub struct ResolvedTree<D, H> {
    slots: Vec<Slot<D, H>>,
    entries: HashMap<VertexId, Children>,
    root: Option<VertexId>,
    pristine: Option<(CloneVertexFn<D, H>, HashMap<VertexId, Vertex<D, H>>)>,
}

impl<D, H> core::fmt::Debug for ResolvedTree<D, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResolvedTree")
            .field("slots", &self.slots.len())
            .field("registered", &self.entries.len())
            .field("root", &self.root)
            .field("pristine", &self.pristine.is_some())
            .finish_non_exhaustive()
    }
}

impl<D, H> Default for ResolvedTree<D, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, H> ResolvedTree<D, H> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            entries: HashMap::new(),
            root: None,
            pristine: None,
        }
    }

    /// Allocate a handle for a vertex that is not yet part of the tree.
    ///
    /// The handle only becomes reachable once registered and appended to its
    /// parent's children list.
    pub fn alloc(&mut self, vertex: Vertex<D, H>) -> VertexId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "VertexId uses 32-bit indices by design."
        )]
        let id = VertexId::new(self.slots.len() as u32);
        if let Some((clone, shadow)) = &mut self.pristine {
            shadow.insert(id, clone(&vertex));
        }
        self.slots.push(Slot::new(vertex));
        id
    }

    /// Register `id` as the tree root. The root carries no resolution context.
    ///
    /// # Panics
    ///
    /// Panics if a root is already registered (reset the store first) or if
    /// `id` was not allocated by this store.
    pub fn set_root(&mut self, id: VertexId) {
        assert!(
            self.root.is_none(),
            "root already registered; reset the store before registering another"
        );
        assert!(id.idx() < self.slots.len(), "dangling VertexId");
        self.entries.insert(id, Children::new());
        self.root = Some(id);
    }

    /// Register a non-root vertex with its resolution context.
    ///
    /// # Panics
    ///
    /// Panics if the context has no parent, if the parent is not registered,
    /// or if `id` is already registered.
    pub fn register(&mut self, id: VertexId, ctx: ResolutionContext) {
        let parent = ctx
            .parent
            .expect("non-root registration requires a parent; use set_root for the root");
        assert!(
            self.entries.contains_key(&parent),
            "registering under an unregistered parent"
        );
        assert!(
            !self.entries.contains_key(&id),
            "vertex is already registered"
        );
        self.slot_mut(id).ctx = Some(ctx);
        self.entries.insert(id, Children::new());
    }

    /// Append handles to a parent's children list.
    ///
    /// # Panics
    ///
    /// Panics if the parent is not registered. This is a programming error,
    /// not a user error: the walker registers every parent before its
    /// children are discovered.
    pub fn append_children(&mut self, parent: VertexId, children: &[VertexId]) {
        self.entries
            .get_mut(&parent)
            .expect("appending children to an unregistered parent")
            .extend_from_slice(children);
    }

    /// The children of a registered handle, or `None` for unregistered or
    /// deleted handles.
    pub fn children_of(&self, id: VertexId) -> Option<&[VertexId]> {
        self.entries.get(&id).map(|c| c.as_slice())
    }

    /// The parent recorded in a handle's resolution context.
    ///
    /// Derived from the arena slot, so this still answers for handles whose
    /// registry entry was deleted (orphans keep their old parent link).
    /// Returns `None` for the root and for ids foreign to this store.
    pub fn parent_of(&self, id: VertexId) -> Option<VertexId> {
        self.slots
            .get(id.idx())
            .and_then(|slot| slot.ctx.as_ref())
            .and_then(|ctx| ctx.parent)
    }

    /// The resolution context a handle was discovered with. `None` for the
    /// root (which has no context) and for unregistered handles.
    pub fn context_of(&self, id: VertexId) -> Option<&ResolutionContext> {
        self.slots.get(id.idx()).and_then(|slot| slot.ctx.as_ref())
    }

    /// Depth of a handle: 0 for the root, the context depth otherwise.
    pub fn depth_of(&self, id: VertexId) -> Option<usize> {
        if self.root == Some(id) {
            return Some(0);
        }
        self.context_of(id).map(|ctx| ctx.depth)
    }

    /// Remove a handle from its parent's children list (no-op for the root)
    /// and from the registry.
    ///
    /// Descendant entries are left in the registry, orphaned. They keep
    /// answering [`ResolvedTree::parent_of`] but must not be traversed
    /// through afterwards.
    pub fn delete(&mut self, id: VertexId) {
        if self.root != Some(id)
            && let Some(parent) = self.parent_of(id)
            && let Some(children) = self.entries.get_mut(&parent)
        {
            children.retain(|c| *c != id);
        }
        self.entries.remove(&id);
    }

    /// Drop all children links of `id`, leaving former descendants orphaned.
    ///
    /// Used when a subtree is re-derived from scratch (for example by a
    /// subtree walk over an already-expanded store).
    pub fn clear_children(&mut self, id: VertexId) {
        if let Some(children) = self.entries.get_mut(&id) {
            children.clear();
        }
    }

    /// The path from the tree root down to `id`, following parent links.
    ///
    /// The result is root-first. `config` controls whether the root and the
    /// queried handle itself are included; when `id` is the root, both flags
    /// must be set for it to appear. For orphaned handles the walk ends at
    /// the topmost ancestor still carrying a context.
    pub fn path_to(&self, id: VertexId, config: PathConfig) -> Vec<VertexId> {
        let mut path = Vec::new();
        path.push(id);
        let mut cursor = self.parent_of(id);
        while let Some(parent) = cursor {
            path.push(parent);
            cursor = self.parent_of(parent);
        }
        path.reverse();
        if !config.include_root && path.first() == self.root.as_ref() {
            path.remove(0);
        }
        if !config.include_self && path.last() == Some(&id) {
            path.pop();
        }
        path
    }

    /// The registered tree root, if any.
    pub fn root(&self) -> Option<VertexId> {
        self.root
    }

    /// Whether `id` currently has a registry entry.
    pub fn is_registered(&self, id: VertexId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no handle is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The vertex behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this store.
    pub fn vertex(&self, id: VertexId) -> &Vertex<D, H> {
        &self.slot(id).vertex
    }

    /// The vertex behind a handle, or `None` for foreign ids.
    pub fn get(&self, id: VertexId) -> Option<&Vertex<D, H>> {
        self.slots.get(id.idx()).map(|slot| &slot.vertex)
    }

    /// Repoint a handle at a new vertex carrying `data` and the same hints.
    ///
    /// Other holders of the handle keep referring to the same tree position;
    /// only the value they observe changes.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this store.
    pub fn rewrite_data(&mut self, id: VertexId, data: D) {
        self.slot_mut(id).vertex.data = data;
    }

    /// Repoint a handle at a new vertex carrying the same data and `hints`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this store.
    pub fn rewrite_hints(&mut self, id: VertexId, hints: Vec<H>) {
        self.slot_mut(id).vertex.child_hints = hints;
    }

    /// Flags of a handle; empty for foreign ids.
    pub fn flags_of(&self, id: VertexId) -> VertexFlags {
        self.slots
            .get(id.idx())
            .map(|slot| slot.flags)
            .unwrap_or_default()
    }

    /// Set the given flags on a handle, keeping flags already present.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this store.
    pub fn insert_flags(&mut self, id: VertexId, flags: VertexFlags) {
        self.slot_mut(id).flags |= flags;
    }

    /// Clear the store so it can be reused: drops all slots, registry entries,
    /// the root, and any pristine copies (pristine retention stays enabled).
    pub fn reset(&mut self) {
        self.slots.clear();
        self.entries.clear();
        self.root = None;
        if let Some((_, shadow)) = &mut self.pristine {
            shadow.clear();
        }
    }

    fn slot(&self, id: VertexId) -> &Slot<D, H> {
        self.slots.get(id.idx()).expect("dangling VertexId")
    }

    fn slot_mut(&mut self, id: VertexId) -> &mut Slot<D, H> {
        self.slots.get_mut(id.idx()).expect("dangling VertexId")
    }
}

impl<D: Clone, H: Clone> ResolvedTree<D, H> {
    /// Create a store that retains a not-mutated shadow copy of every
    /// allocated vertex alongside the live (possibly rewritten) one.
    pub fn with_pristine() -> Self {
        Self {
            pristine: Some((Vertex::clone, HashMap::new())),
            ..Self::new()
        }
    }

    /// The vertex value a handle was allocated with, before any rewrite.
    ///
    /// `None` unless the store was created with
    /// [`ResolvedTree::with_pristine`].
    pub fn pristine(&self, id: VertexId) -> Option<&Vertex<D, H>> {
        self.pristine
            .as_ref()
            .and_then(|(_, shadow)| shadow.get(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn two_level() -> (ResolvedTree<&'static str, u32>, VertexId, VertexId, VertexId) {
        let mut tree = ResolvedTree::new();
        let root = tree.alloc(Vertex::new("root", vec![0, 1]));
        tree.set_root(root);
        let a = tree.alloc(Vertex::leaf("a"));
        let b = tree.alloc(Vertex::leaf("b"));
        tree.register(a, ResolutionContext::child_of(root, 1, 0));
        tree.register(b, ResolutionContext::child_of(root, 1, 1));
        tree.append_children(root, &[a, b]);
        (tree, root, a, b)
    }

    #[test]
    fn register_and_query() {
        let (tree, root, a, b) = two_level();
        assert_eq!(tree.children_of(root), Some(&[a, b][..]));
        assert_eq!(tree.parent_of(a), Some(root));
        assert_eq!(tree.parent_of(root), None);
        assert_eq!(tree.depth_of(root), Some(0));
        assert_eq!(tree.depth_of(b), Some(1));
        assert_eq!(tree.context_of(b).map(|c| c.hint_index), Some(1));
        assert!(tree.context_of(root).is_none());
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn handles_compare_by_identity() {
        let mut tree: ResolvedTree<&str, u32> = ResolvedTree::new();
        let a = tree.alloc(Vertex::leaf("same"));
        let b = tree.alloc(Vertex::leaf("same"));
        assert_ne!(a, b, "equal vertex values must not make handles equal");
    }

    #[test]
    fn delete_unlinks_but_keeps_orphan_parent_link() {
        let (mut tree, root, a, b) = two_level();
        tree.delete(a);
        // The parent's children list no longer mentions the deleted handle.
        assert_eq!(tree.children_of(root), Some(&[b][..]));
        assert!(!tree.is_registered(a));
        assert!(tree.children_of(a).is_none());
        // The orphan still answers parent queries from its slot context.
        assert_eq!(tree.parent_of(a), Some(root));
    }

    #[test]
    fn delete_leaves_descendants_orphaned() {
        let (mut tree, root, a, b) = two_level();
        let grand = tree.alloc(Vertex::leaf("grand"));
        tree.register(grand, ResolutionContext::child_of(a, 2, 0));
        tree.append_children(a, &[grand]);

        tree.delete(a);
        // The grandchild entry is not recursively removed.
        assert!(tree.is_registered(grand));
        assert_eq!(tree.parent_of(grand), Some(a));
        assert_eq!(tree.children_of(root), Some(&[b][..]));
    }

    #[test]
    fn delete_root_is_unlink_noop() {
        let (mut tree, root, a, _b) = two_level();
        tree.delete(root);
        assert!(!tree.is_registered(root));
        // Children of the deleted root become orphans but stay registered.
        assert!(tree.is_registered(a));
        assert_eq!(tree.parent_of(a), Some(root));
    }

    #[test]
    fn path_to_flags() {
        let (mut tree, root, a, _b) = two_level();
        let grand = tree.alloc(Vertex::leaf("grand"));
        tree.register(grand, ResolutionContext::child_of(a, 2, 0));
        tree.append_children(a, &[grand]);

        assert_eq!(tree.path_to(grand, PathConfig::default()), vec![root, a, grand]);
        assert_eq!(
            tree.path_to(
                grand,
                PathConfig {
                    include_root: false,
                    include_self: true,
                }
            ),
            vec![a, grand]
        );
        assert_eq!(
            tree.path_to(
                grand,
                PathConfig {
                    include_root: true,
                    include_self: false,
                }
            ),
            vec![root, a]
        );
        assert_eq!(
            tree.path_to(
                grand,
                PathConfig {
                    include_root: false,
                    include_self: false,
                }
            ),
            vec![a]
        );
    }

    #[test]
    fn path_to_root_itself() {
        let (tree, root, _a, _b) = two_level();
        assert_eq!(tree.path_to(root, PathConfig::default()), vec![root]);
        assert!(
            tree.path_to(
                root,
                PathConfig {
                    include_root: false,
                    include_self: true,
                }
            )
            .is_empty(),
            "the root appears only when both flags are set"
        );
    }

    #[test]
    fn rewrite_data_keeps_position() {
        let (mut tree, root, a, _b) = two_level();
        let before = *tree.context_of(a).expect("child context");
        tree.rewrite_data(a, "rewritten");
        assert_eq!(tree.vertex(a).data, "rewritten");
        assert_eq!(tree.context_of(a), Some(&before));
        assert_eq!(tree.parent_of(a), Some(root));
    }

    #[test]
    fn rewrite_hints_replaces_hint_list() {
        let (mut tree, _root, a, _b) = two_level();
        tree.rewrite_hints(a, vec![7, 8, 9]);
        assert_eq!(tree.vertex(a).child_hints, vec![7, 8, 9]);
        assert_eq!(tree.vertex(a).data, "a", "data survives a hints rewrite");
    }

    #[test]
    fn pristine_retains_pre_rewrite_values() {
        let mut tree: ResolvedTree<&str, u32> = ResolvedTree::with_pristine();
        let root = tree.alloc(Vertex::new("original", vec![1]));
        tree.set_root(root);
        tree.rewrite_data(root, "rewritten");
        tree.rewrite_hints(root, vec![2, 3]);

        assert_eq!(tree.vertex(root).data, "rewritten");
        let shadow = tree.pristine(root).expect("pristine copy");
        assert_eq!(shadow.data, "original");
        assert_eq!(shadow.child_hints, vec![1]);
    }

    #[test]
    fn pristine_disabled_by_default() {
        let (tree, root, _a, _b) = two_level();
        assert!(tree.pristine(root).is_none());
    }

    #[test]
    fn reset_allows_a_new_root() {
        let (mut tree, root, _a, _b) = two_level();
        tree.reset();
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert!(tree.get(root).is_none(), "slots are dropped on reset");
        let fresh = tree.alloc(Vertex::leaf("fresh"));
        tree.set_root(fresh);
        assert_eq!(tree.root(), Some(fresh));
    }

    #[test]
    fn flags_accumulate() {
        let (mut tree, root, _a, _b) = two_level();
        assert!(tree.flags_of(root).is_empty());
        tree.insert_flags(root, VertexFlags::SUBTREE_DISABLED);
        assert!(tree.flags_of(root).contains(VertexFlags::SUBTREE_DISABLED));
    }

    #[test]
    fn clear_children_orphans_in_place() {
        let (mut tree, root, a, b) = two_level();
        tree.clear_children(root);
        assert_eq!(tree.children_of(root), Some(&[][..]));
        assert!(tree.is_registered(a));
        assert_eq!(tree.parent_of(b), Some(root));
    }

    #[test]
    #[should_panic(expected = "root already registered")]
    fn double_root_registration_panics() {
        let mut tree: ResolvedTree<&str, u32> = ResolvedTree::new();
        let first = tree.alloc(Vertex::leaf("first"));
        let second = tree.alloc(Vertex::leaf("second"));
        tree.set_root(first);
        tree.set_root(second);
    }

    #[test]
    #[should_panic(expected = "registering under an unregistered parent")]
    fn register_under_unregistered_parent_panics() {
        let mut tree: ResolvedTree<&str, u32> = ResolvedTree::new();
        let root = tree.alloc(Vertex::leaf("root"));
        let child = tree.alloc(Vertex::leaf("child"));
        // The root was never registered.
        tree.register(child, ResolutionContext::child_of(root, 1, 0));
    }

    #[test]
    #[should_panic(expected = "appending children to an unregistered parent")]
    fn append_to_unregistered_parent_panics() {
        let mut tree: ResolvedTree<&str, u32> = ResolvedTree::new();
        let root = tree.alloc(Vertex::leaf("root"));
        let child = tree.alloc(Vertex::leaf("child"));
        tree.append_children(root, &[child]);
    }
}
