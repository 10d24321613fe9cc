// Copyright 2025 the Arborwalk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-order visitation policy for n-ary trees.
//!
//! In-order traversal is only well-defined for binary trees: visit the left
//! subtree, the vertex, then the right subtree. For n-ary trees the policy is
//! parameterized instead: configured index ranges decide after which child
//! positions the parent is visited. The default configuration reproduces
//! classic binary in-order and degrades gracefully for wider vertices.

use alloc::vec;
use alloc::vec::Vec;

/// An inclusive range of child indices, with Python-slice negative endpoints.
///
/// `-1` means the last sibling, `-2` the second to last, and so on. Ranges are
/// normalized against the actual sibling count before use; see
/// [`InOrderPolicy::should_visit_parent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HintRange {
    /// First child index covered (inclusive).
    pub start: i64,
    /// Last child index covered (inclusive).
    pub end: i64,
}

impl HintRange {
    /// A range covering `start..=end`.
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// A range covering a single index.
    pub const fn at(index: i64) -> Self {
        Self::new(index, index)
    }

    /// Resolve negative endpoints against `sibling_count` and clamp to the
    /// valid index span. Returns `None` when the range is empty after
    /// clamping (including whenever `sibling_count` is zero).
    fn normalize(self, sibling_count: usize) -> Option<(usize, usize)> {
        if sibling_count == 0 {
            return None;
        }
        let count = sibling_count as i64;
        let resolve = |endpoint: i64| {
            if endpoint < 0 {
                count + endpoint
            } else {
                endpoint
            }
        };
        let start = resolve(self.start).max(0);
        let end = resolve(self.end).min(count - 1);
        if start > end {
            return None;
        }
        #[allow(
            clippy::cast_sign_loss,
            reason = "both bounds are clamped to 0..count above"
        )]
        let bounds = (start as usize, end as usize);
        Some(bounds)
    }
}

/// Decides when a parent receives its in-order visit.
///
/// After the child at index `i` (0-based, in hint-traversal order) among `N`
/// siblings completes its subtree, the parent is visited if:
///
/// - the single-child case applies ([`Self::visit_single_child_parents`] set,
///   `N == 1`), or
/// - `i` falls in any normalized primary range, or
/// - every primary range normalized empty and `i` falls in a fallback range.
///
/// The default — primary `[0, -2]`, fallback `-2`, single-child on — visits
/// the parent after every child except the last, which for a binary vertex is
/// exactly classic left-root-right in-order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InOrderPolicy {
    /// Ranges consulted first.
    pub primary: Vec<HintRange>,
    /// Ranges consulted only when every primary range normalizes empty.
    pub fallback: Vec<HintRange>,
    /// Visit the parent of an only child once that child completes, even when
    /// no range covers index 0.
    pub visit_single_child_parents: bool,
}

impl Default for InOrderPolicy {
    fn default() -> Self {
        Self {
            primary: vec![HintRange::new(0, -2)],
            fallback: vec![HintRange::at(-2)],
            visit_single_child_parents: true,
        }
    }
}

impl InOrderPolicy {
    /// A policy that never triggers parent visits (pre/post-order only).
    pub fn never() -> Self {
        Self {
            primary: Vec::new(),
            fallback: Vec::new(),
            visit_single_child_parents: false,
        }
    }

    /// A policy with the given primary ranges, no fallback, and the
    /// single-child case off.
    pub fn ranges(primary: Vec<HintRange>) -> Self {
        Self {
            primary,
            fallback: Vec::new(),
            visit_single_child_parents: false,
        }
    }

    /// Whether the parent should be visited now, given that the child at
    /// `just_visited` among `sibling_count` hints has completed its subtree.
    pub fn should_visit_parent(&self, just_visited: usize, sibling_count: usize) -> bool {
        if self.visit_single_child_parents && sibling_count == 1 && just_visited == 0 {
            return true;
        }
        let mut primary_live = false;
        for range in &self.primary {
            if let Some((start, end)) = range.normalize(sibling_count) {
                primary_live = true;
                if (start..=end).contains(&just_visited) {
                    return true;
                }
            }
        }
        if primary_live {
            return false;
        }
        self.fallback.iter().any(|range| {
            range
                .normalize(sibling_count)
                .is_some_and(|(start, end)| (start..=end).contains(&just_visited))
        })
    }
}
