// Copyright 2025 the Arborwalk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arborwalk Tree: the resolved-tree store for lazily materialized trees.
//!
//! A lazily-materialized tree produces vertices on demand: a parent vertex
//! carries lightweight "hints" describing potential children, and a tree
//! source turns a hint into an actual vertex only when a walker reaches it.
//! This crate stores the portion of such a tree that has been discovered so
//! far:
//!
//! - [`Vertex`]: a vertex value — data plus ordered child hints.
//! - [`VertexId`]: an identity-only handle backed by an append-only arena.
//!   Rewriting the vertex behind a handle does not invalidate other holders
//!   of the same handle.
//! - [`ResolutionContext`]: discovery bookkeeping (depth, parent, sibling
//!   position), attached to a handle once and kept on its arena slot.
//! - [`ResolvedTree`]: the store itself — root tracking, registration,
//!   children lists, deletion (which orphans rather than cleans up
//!   descendants), path-to-root queries, and optional pristine shadow copies
//!   of every vertex as it was first allocated.
//!
//! The traversal engine consuming this store lives in `arborwalk_traverse`;
//! this crate has no traversal logic of its own.
//!
//! ## Example
//!
//! ```rust
//! use arborwalk_tree::{PathConfig, ResolutionContext, ResolvedTree, Vertex};
//!
//! let mut tree: ResolvedTree<&str, char> = ResolvedTree::new();
//! let root = tree.alloc(Vertex::new("F", vec!['B', 'G']));
//! tree.set_root(root);
//!
//! let b = tree.alloc(Vertex::leaf("B"));
//! tree.register(b, ResolutionContext::child_of(root, 1, 0));
//! tree.append_children(root, &[b]);
//!
//! assert_eq!(tree.path_to(b, PathConfig::default()), vec![root, b]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod store;
mod types;

pub use store::ResolvedTree;
pub use types::{PathConfig, ResolutionContext, Vertex, VertexFlags, VertexId};
