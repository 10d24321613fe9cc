// Copyright 2025 the Arborwalk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arborwalk Traverse: a resumable depth-first traversal engine for lazily
//! materialized trees.
//!
//! The walker consumes a tree purely through the [`TreeSource`] capability —
//! produce a root vertex, produce a child vertex for a hint — and discovers
//! the tree into an [`arborwalk_tree::ResolvedTree`] as it goes. Registered
//! [`Visitor`]s observe every pre-, in-, and post-order visit and mutate the
//! tree through the small [`Command`] protocol: halt, rewrite data, rewrite
//! hints, delete, disable a subtree, or pass chain state to the next visitor.
//!
//! - **In-order for n-ary trees** is policy-driven: [`InOrderPolicy`] decides
//!   after which child positions a parent is visited, with Python-slice
//!   negative range endpoints. The default reproduces classic binary
//!   left-root-right in-order.
//! - **Resumability**: every visit is a suspension point. Drive a [`Walker`]
//!   to completion with [`Walker::run`], step it with [`Walker::step`], or
//!   iterate it with [`Walker::visits`]. A [`Command::Halt`] suspends the
//!   run; driving again resumes it, and [`Walker::into_parts`] /
//!   [`Walker::resume`] move a suspended run into a fresh walker instance.
//!   The total visitation sequence is the same either way.
//! - **Per-drive masks**: [`IterConfig`] selects which orders invoke
//!   visitors and which are surfaced to the consumer loop.
//!
//! ## Minimal example
//!
//! Walk a two-level tree and collect its post-order:
//!
//! ```rust
//! use arborwalk_traverse::{IterConfig, OrderMask, TreeSource, Walker};
//! use arborwalk_tree::{ResolutionContext, Vertex};
//!
//! struct Nested;
//!
//! impl TreeSource for Nested {
//!     type Data = &'static str;
//!     type Hint = &'static str;
//!
//!     fn make_root(&mut self) -> Option<Vertex<&'static str, &'static str>> {
//!         Some(Vertex::new("root", vec!["left", "right"]))
//!     }
//!
//!     fn make_vertex(
//!         &mut self,
//!         hint: &'static str,
//!         _ctx: &ResolutionContext,
//!     ) -> Option<Vertex<&'static str, &'static str>> {
//!         Some(Vertex::leaf(hint))
//!     }
//! }
//!
//! let mut walker = Walker::new(Nested);
//! let visits: Vec<_> = walker.visits(IterConfig::emitting(OrderMask::POST)).collect();
//! let post: Vec<&str> = visits
//!     .iter()
//!     .map(|visit| walker.store().vertex(visit.handle).data)
//!     .collect();
//! assert_eq!(post, vec!["left", "right", "root"]);
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit a structured warning when a usage-order error is
//!   ignored (a hints rewrite issued outside pre-order visitation).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod command;
mod config;
mod policy;
mod source;
mod state;
mod visitor;
mod walker;

pub use command::{ChainState, Command};
pub use config::{ChildOrder, HintComparator, IterConfig, WalkConfig};
pub use policy::{HintRange, InOrderPolicy};
pub use source::TreeSource;
pub use state::Status;
pub use visitor::{OrderMask, ResolutionStyle, VisitEvent, VisitOrder, Visitor, VisitorFn, VisitorSet};
pub use walker::{Visit, Visits, WalkParts, Walker};
