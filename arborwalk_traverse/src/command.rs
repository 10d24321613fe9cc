// Copyright 2025 the Arborwalk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Commands a visitor may return to the walker.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

/// Opaque value handed from one sequential visitor to the next one invoked
/// for the same vertex and order.
pub type ChainState = Box<dyn Any>;

/// A mutation or control request returned by a visitor.
///
/// Commands in one batch apply in order. See the walker documentation for
/// where each command is valid; the only order-sensitive one is
/// [`Command::RewriteHints`], which is honored during pre-order visitation
/// only (the vertex's children are derived from its hints right after the
/// pre-order visit returns).
pub enum Command<D, H> {
    /// Stop the traversal after the current visit. The rest of the batch
    /// still applies; no further vertex is visited until the walker is
    /// driven again.
    Halt,
    /// Repoint the visited handle at a new vertex carrying this data and the
    /// same child hints.
    RewriteData(D),
    /// Replace the visited vertex's child hints. Pre-order only; ignored
    /// (with a warning when the `tracing` feature is on) anywhere else, and
    /// ignored for a vertex whose subtree traversal is disabled.
    RewriteHints(Vec<H>),
    /// Remove the visited handle from the resolved tree. At pre-order this
    /// also suppresses descent into the vertex's hints: its children could
    /// no longer be registered under it.
    Delete,
    /// Treat the visited handle as hint-less for the rest of the run.
    DisableSubtree,
    /// Hand a value to the next sequential visitor for this vertex and
    /// order. Dropped when returned by a concurrent visitor.
    SetChainState(ChainState),
}

impl<D, H> Command<D, H> {
    /// Convenience constructor boxing a chain-state value.
    pub fn chain_state<T: Any>(value: T) -> Self {
        Self::SetChainState(Box::new(value))
    }
}

impl<D, H> core::fmt::Debug for Command<D, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Halt => f.write_str("Halt"),
            Self::RewriteData(_) => f.write_str("RewriteData(..)"),
            Self::RewriteHints(hints) => write!(f, "RewriteHints(len={})", hints.len()),
            Self::Delete => f.write_str("Delete"),
            Self::DisableSubtree => f.write_str("DisableSubtree"),
            Self::SetChainState(_) => f.write_str("SetChainState(..)"),
        }
    }
}
