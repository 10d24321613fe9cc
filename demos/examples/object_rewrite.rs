// Copyright 2025 the Arborwalk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walks a JSON-like object tree, uppercasing every string value in place.
//!
//! The tree source materializes vertices lazily from `(key, value)` hints; a
//! null value is a skipped child position. A pre-order visitor rewrites
//! string scalars through the command protocol, and because the walker keeps
//! pristine shadow copies, the original values stay available for the final
//! report.

use arborwalk_traverse::{Command, TreeSource, VisitOrder, Visitor, WalkConfig, Walker};
use arborwalk_tree::{ResolutionContext, ResolvedTree, Vertex, VertexId};

#[derive(Clone, Debug)]
enum Value {
    Null,
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
}

/// What a materialized vertex carries: its key and, for scalars, a rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Node {
    key: String,
    scalar: Option<String>,
}

struct ObjSource {
    root: Value,
}

fn vertex_for(key: String, value: Value) -> Option<Vertex<Node, (String, Value)>> {
    match value {
        Value::Null => None,
        Value::Int(number) => Some(Vertex::leaf(Node {
            key,
            scalar: Some(number.to_string()),
        })),
        Value::Str(text) => Some(Vertex::leaf(Node {
            key,
            scalar: Some(text),
        })),
        Value::List(items) => Some(Vertex::new(
            Node { key, scalar: None },
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (format!("[{index}]"), item))
                .collect(),
        )),
        Value::Map(entries) => Some(Vertex::new(Node { key, scalar: None }, entries)),
    }
}

impl TreeSource for ObjSource {
    type Data = Node;
    type Hint = (String, Value);

    fn make_root(&mut self) -> Option<Vertex<Node, (String, Value)>> {
        vertex_for("$".to_string(), self.root.clone())
    }

    fn make_vertex(
        &mut self,
        hint: (String, Value),
        _ctx: &ResolutionContext,
    ) -> Option<Vertex<Node, (String, Value)>> {
        vertex_for(hint.0, hint.1)
    }
}

fn sample_object() -> Value {
    Value::Map(vec![(
        "F".into(),
        Value::Map(vec![
            (
                "B".into(),
                Value::Map(vec![
                    ("A".into(), Value::Int(1)),
                    (
                        "D".into(),
                        Value::List(vec![Value::Str("c".into()), Value::Str("e".into())]),
                    ),
                ]),
            ),
            (
                "G".into(),
                Value::Map(vec![
                    ("_".into(), Value::Null),
                    ("I".into(), Value::Map(vec![("H".into(), Value::Int(1))])),
                ]),
            ),
        ]),
    )])
}

fn print_subtree(store: &ResolvedTree<Node, (String, Value)>, id: VertexId) {
    let depth = store.depth_of(id).unwrap_or(0);
    let node = store.vertex(id);
    let indent = "  ".repeat(depth);
    match (&node.data.scalar, store.pristine(id).and_then(|v| v.data.scalar.as_ref())) {
        (Some(live), Some(original)) if live != original => {
            println!("{indent}{}: {live}  (was {original})", node.data.key);
        }
        (Some(live), _) => println!("{indent}{}: {live}", node.data.key),
        (None, _) => println!("{indent}{}", node.data.key),
    }
    for child in store.children_of(id).unwrap_or(&[]) {
        print_subtree(store, *child);
    }
}

fn main() {
    let mut walker = Walker::with_pristine(
        ObjSource {
            root: sample_object(),
        },
        WalkConfig::default(),
    );
    walker.visitors_mut().register(
        VisitOrder::Pre,
        Visitor::new(|tree: &ResolvedTree<Node, (String, Value)>, event| {
            let node = tree.vertex(event.handle);
            match &node.data.scalar {
                Some(text) if text.chars().any(|c| c.is_ascii_lowercase()) => {
                    vec![Command::RewriteData(Node {
                        key: node.data.key.clone(),
                        scalar: Some(text.to_uppercase()),
                    })]
                }
                _ => Vec::new(),
            }
        }),
    );
    walker.run();

    let store = walker.into_store();
    let root = store.root().expect("the object tree is not empty");
    print_subtree(&store, root);
}
