// Copyright 2025 the Arborwalk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walks the classic BST-traversal diagram and prints all three orders.
//!
//! The tree is the textbook nine-vertex figure; empty labels stand for the
//! diagram's missing children, which is what places `G` before its only
//! (right-hand) subtree in the in-order output.

use arborwalk_traverse::{IterConfig, OrderMask, TreeSource, Walker};
use arborwalk_tree::{ResolutionContext, Vertex};

struct Diagram;

fn content(label: &'static str) -> Vertex<&'static str, &'static str> {
    let hints: &[&str] = match label {
        "F" => &["B", "G"],
        "B" => &["A", "D"],
        "D" => &["C", "E"],
        "G" => &["", "I"],
        "I" => &["H", ""],
        _ => &[],
    };
    Vertex::new(label, hints.to_vec())
}

impl TreeSource for Diagram {
    type Data = &'static str;
    type Hint = &'static str;

    fn make_root(&mut self) -> Option<Vertex<&'static str, &'static str>> {
        Some(content("F"))
    }

    fn make_vertex(
        &mut self,
        hint: &'static str,
        _ctx: &ResolutionContext,
    ) -> Option<Vertex<&'static str, &'static str>> {
        (!hint.is_empty()).then(|| content(hint))
    }
}

fn main() {
    for (name, mask) in [
        ("pre", OrderMask::PRE),
        ("in", OrderMask::IN),
        ("post", OrderMask::POST),
    ] {
        let mut walker = Walker::new(Diagram);
        let visits: Vec<_> = walker.visits(IterConfig::emitting(mask)).collect();
        let labels: Vec<&str> = visits
            .iter()
            .map(|visit| walker.store().vertex(visit.handle).data)
            .collect();
        println!("{name:>4}-order: {}", labels.join(", "));
    }
}
