//! Render tree diff: generate the ordered patch list that turns `prev` into
//! `next`.
//!
//! The walk is depth-first and driven by an explicit work stack. For every
//! node pair the facet patches are emitted first, then the child steps are
//! pushed in reverse so that the first child (and its whole subtree) is
//! processed before its next sibling. The stack keeps memory proportional
//! to tree size no matter how deep the tree is.

pub mod fields;

pub(crate) mod children;

use render_tree::{Element, Node, NodeId, Tree};
use tracing::debug;

use crate::patch::{Op, Patch, Path, RawPatch};
use crate::sequence::sequence;
use children::Step;

// ── Options ───────────────────────────────────────────────────────────────

/// Options for [`diff_with`].
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Reconcile child lists by key when any child carries one. When false
    /// every list is reconciled by position, and a key mismatch at a
    /// position replaces the node.
    pub keyed: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self { keyed: true }
    }
}

// ── Public API ────────────────────────────────────────────────────────────

/// Generate the patch list that transforms `prev` into `next`.
pub fn diff(prev: &Tree, next: &Tree) -> Vec<Patch> {
    diff_with(prev, next, &DiffOptions::default())
}

/// [`diff`] with explicit options.
pub fn diff_with(prev: &Tree, next: &Tree, options: &DiffOptions) -> Vec<Patch> {
    let raw = TreeDiffer::new(prev, next, options).run();
    debug!(
        prev_nodes = prev.count(),
        next_nodes = next.count(),
        patches = raw.len(),
        "diffed render trees"
    );
    sequence(raw)
}

/// Unsequenced diff output, in emission order.
pub fn diff_raw(prev: &Tree, next: &Tree, options: &DiffOptions) -> Vec<RawPatch> {
    TreeDiffer::new(prev, next, options).run()
}

// ── Differ ────────────────────────────────────────────────────────────────

struct TreeDiffer<'a> {
    prev: &'a Tree,
    next: &'a Tree,
    options: &'a DiffOptions,
    out: Vec<RawPatch>,
    stack: Vec<Step>,
}

impl<'a> TreeDiffer<'a> {
    fn new(prev: &'a Tree, next: &'a Tree, options: &'a DiffOptions) -> Self {
        Self {
            prev,
            next,
            options,
            out: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<RawPatch> {
        match (self.prev.root(), self.next.root()) {
            (None, None) => {}
            (Some(_), None) => self.emit(Vec::new(), Op::ReplaceNode { value: Tree::new() }),
            (None, Some(_)) => self.emit(
                Vec::new(),
                Op::ReplaceNode {
                    value: self.next.compact(),
                },
            ),
            (Some(p), Some(n)) => self.stack.push(Step::Diff {
                path: Vec::new(),
                prev: p,
                next: n,
            }),
        }
        while let Some(step) = self.stack.pop() {
            match step {
                Step::Emit(patch) => self.out.push(patch),
                Step::Diff { path, prev, next } => self.diff_node(path, prev, next),
            }
        }
        self.out
    }

    fn emit(&mut self, path: Path, op: Op) {
        self.out.push(RawPatch::new(path, op));
    }

    fn replace(&mut self, path: Path, next: NodeId) {
        let value = self.next.subtree(next);
        self.emit(path, Op::ReplaceNode { value });
    }

    fn diff_node(&mut self, path: Path, prev_id: NodeId, next_id: NodeId) {
        let (prev_tree, next_tree) = (self.prev, self.next);
        let (prev, next) = (prev_tree.node(prev_id), next_tree.node(next_id));
        if prev.kind() != next.kind() || prev.key() != next.key() {
            return self.replace(path, next_id);
        }
        match (prev, next) {
            (Node::Text(a), Node::Text(b)) => {
                if a != b {
                    self.emit(path, Op::SetText { value: b.clone() });
                }
            }
            (Node::Comment(a), Node::Comment(b)) => {
                if a != b {
                    self.emit(path, Op::SetComment { value: b.clone() });
                }
            }
            (Node::Element(a), Node::Element(b)) => self.diff_element(path, a, b, next_id),
            (Node::Component(a), Node::Component(b)) => {
                if a.id != b.id {
                    self.emit(path.clone(), Op::SetComponent { value: b.id.clone() });
                }
                self.reconcile(&path, &a.children, &b.children);
            }
            (Node::Fragment(a), Node::Fragment(b)) => {
                self.reconcile(&path, &a.children, &b.children);
            }
            _ => self.replace(path, next_id),
        }
    }

    fn diff_element(&mut self, path: Path, a: &Element, b: &Element, next_id: NodeId) {
        if a.tag != b.tag {
            return self.replace(path, next_id);
        }

        let mut ops = Vec::new();
        fields::diff_attrs(&a.attrs, &b.attrs, &mut ops);
        fields::diff_style(&a.style, &b.style, &mut ops);
        if a.is_style() || b.is_style() {
            fields::diff_stylesheet(&a.styles, &b.styles, &mut ops);
        }
        fields::diff_ref(a.ref_id(), b.ref_id(), &mut ops);
        fields::diff_handlers(&a.handlers, &b.handlers, &mut ops);
        fields::diff_router(a.router(), b.router(), &mut ops);
        fields::diff_upload(a.upload(), b.upload(), &mut ops);
        for op in ops {
            self.emit(path.clone(), op);
        }

        if a.html() != b.html() {
            return self.replace(path, next_id);
        }
        if b.html().is_none() {
            self.reconcile(&path, &a.children, &b.children);
        }
    }

    fn reconcile(&mut self, path: &[usize], old: &[NodeId], new: &[NodeId]) {
        let steps = children::reconcile(self.prev, self.next, path, old, new, self.options.keyed);
        self.stack.extend(steps.into_iter().rev());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
