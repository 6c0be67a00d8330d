//! First-mount metadata extraction.
//!
//! When a tree is mounted for the first time there is nothing to diff
//! against; the client receives the rendered markup through another channel
//! and only needs the behavioural metadata the markup cannot carry. This
//! pass walks a single tree and emits, per element, `setHandlers`,
//! `setRef`, `setRouter` and `setUpload` (in that order, only when present).

use render_tree::{Node, NodeId, Tree};
use tracing::debug;

use crate::patch::{Op, Patch, Path, RawPatch};
use crate::sequence::sequence;

/// Extract metadata patches from a freshly built tree.
///
/// Paths use the same child-index rules as [`crate::diff`]; fragments and
/// components are ordinary path steps. Elements with raw HTML are not
/// descended into.
pub fn extract_metadata(tree: &Tree) -> Vec<Patch> {
    let mut raw = Vec::new();
    let mut stack: Vec<(Path, NodeId)> = Vec::new();
    if let Some(root) = tree.root() {
        stack.push((Vec::new(), root));
    }

    while let Some((path, id)) = stack.pop() {
        let node = tree.node(id);
        if let Node::Element(el) = node {
            if !el.handlers.is_empty() {
                raw.push(RawPatch::new(
                    path.clone(),
                    Op::SetHandlers {
                        value: el.handlers.clone(),
                    },
                ));
            }
            if let Some(r) = el.ref_id() {
                raw.push(RawPatch::new(path.clone(), Op::SetRef { value: r.to_string() }));
            }
            if let Some(v) = el.router() {
                raw.push(RawPatch::new(path.clone(), Op::SetRouter { value: v.clone() }));
            }
            if let Some(v) = el.upload() {
                raw.push(RawPatch::new(path.clone(), Op::SetUpload { value: v.clone() }));
            }
            if el.html().is_some() {
                continue;
            }
        }
        for (i, &child) in node.children().iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(i);
            stack.push((child_path, child));
        }
    }

    debug!(nodes = tree.count(), patches = raw.len(), "extracted mount metadata");
    sequence(raw)
}

// ── Tests ─────────────────────────────────────────────────────────────────
