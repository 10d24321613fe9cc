// Copyright 2025 the Arborwalk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walker configuration: child visitation order, in-order policy, sibling
//! sorting, and per-drive order masks.

use alloc::boxed::Box;
use core::cmp::Ordering;

use crate::policy::InOrderPolicy;
use crate::visitor::OrderMask;

/// Which end of the hint list the walker descends into first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ChildOrder {
    /// Hint index 0 is expanded first.
    #[default]
    Forward,
    /// The last hint is expanded first.
    Reversed,
}

/// Comparator applied to sibling hints before they are indexed and pushed.
pub type HintComparator<H> = Box<dyn FnMut(&H, &H) -> Ordering>;

/// Per-run walker configuration.
///
/// Pristine shadow retention is the one configuration axis not carried here:
/// it changes the store's type bounds (`D: Clone, H: Clone`), so it is chosen
/// by the [`Walker::with_pristine`](crate::Walker::with_pristine)
/// constructor instead.
pub struct WalkConfig<H> {
    /// Which end of the hint list is expanded first.
    pub child_order: ChildOrder,
    /// When parents receive their in-order visits.
    pub in_order: InOrderPolicy,
    /// Optional sort applied to sibling hints before pushing; hint indices
    /// (and therefore in-order positions) follow the sorted order.
    pub hint_sort: Option<HintComparator<H>>,
}

impl<H> Default for WalkConfig<H> {
    fn default() -> Self {
        Self {
            child_order: ChildOrder::default(),
            in_order: InOrderPolicy::default(),
            hint_sort: None,
        }
    }
}

impl<H> core::fmt::Debug for WalkConfig<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WalkConfig")
            .field("child_order", &self.child_order)
            .field("in_order", &self.in_order)
            .field("hint_sort", &self.hint_sort.is_some())
            .finish_non_exhaustive()
    }
}

/// Per-drive toggles: which orders invoke visitor callbacks, and which are
/// surfaced to the consumer loop as yielded visits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IterConfig {
    /// Orders whose visits run registered visitors.
    pub invoke: OrderMask,
    /// Orders whose visits are yielded to the driving loop.
    pub emit: OrderMask,
}

impl Default for IterConfig {
    fn default() -> Self {
        Self {
            invoke: OrderMask::all(),
            emit: OrderMask::all(),
        }
    }
}

impl IterConfig {
    /// Invoke visitors on every order but yield only the given ones.
    pub fn emitting(emit: OrderMask) -> Self {
        Self {
            invoke: OrderMask::all(),
            emit,
        }
    }

    /// Yield every order but invoke visitors only on the given ones.
    pub fn invoking(invoke: OrderMask) -> Self {
        Self {
            invoke,
            emit: OrderMask::all(),
        }
    }
}
