//! Arena storage for render trees.
//!
//! All nodes of a tree live in one `Vec<Node>`; parents refer to children by
//! [`NodeId`]. Every traversal here uses an explicit stack, so depth is
//! bounded by heap, not by the call stack.
//!
//! Nodes that become unreachable (for example after a child is removed by a
//! patch) stay in the arena until [`Tree::compact`] is called.

use crate::types::{Component, Element, Fragment, Kind, Node, NodeId};

/// A render tree. An empty tree (no root) stands for "nothing rendered".
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Adds a node to the arena and returns its handle. The node is not
    /// attached anywhere until it is listed as a child or made the root.
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn text(&mut self, value: impl Into<String>) -> NodeId {
        self.push(Node::Text(value.into()))
    }

    pub fn comment(&mut self, value: impl Into<String>) -> NodeId {
        self.push(Node::Comment(value.into()))
    }

    pub fn element(&mut self, element: Element) -> NodeId {
        self.push(Node::Element(element))
    }

    pub fn component(&mut self, component: Component) -> NodeId {
        self.push(Node::Component(component))
    }

    pub fn fragment(&mut self, fragment: Fragment) -> NodeId {
        self.push(Node::Fragment(fragment))
    }

    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    /// Builds a single-rooted tree in one go.
    pub fn build(f: impl FnOnce(&mut Tree) -> NodeId) -> Tree {
        let mut tree = Tree::new();
        let root = f(&mut tree);
        tree.root = Some(root);
        tree
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of arena slots, reachable or not.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes reachable from the root.
    pub fn count(&self) -> usize {
        self.root.map_or(0, |root| self.preorder(root).len())
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn kind(&self, id: NodeId) -> Kind {
        self.node(id).kind()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    pub fn key(&self, id: NodeId) -> Option<&str> {
        self.node(id).key()
    }

    /// Follows a root-relative chain of child indices.
    pub fn resolve(&self, path: &[usize]) -> Option<NodeId> {
        let mut id = self.root?;
        for &step in path {
            id = *self.get(id)?.children().get(step)?;
        }
        Some(id)
    }

    /// Node ids reachable from `from`, parents before children, siblings in
    /// order.
    pub fn preorder(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    // ── Copying ───────────────────────────────────────────────────────────

    /// Copies the subtree rooted at `from` in `src` into this arena and
    /// returns the handle of the copied root. The copy is not attached.
    pub fn graft(&mut self, src: &Tree, from: NodeId) -> NodeId {
        let order = src.preorder(from);
        let base = self.nodes.len() as u32;
        let mut remap = vec![NodeId::default(); src.nodes.len()];
        for (ordinal, id) in order.iter().enumerate() {
            remap[id.index()] = NodeId(base + ordinal as u32);
        }
        self.nodes.reserve(order.len());
        for id in order {
            let mut node = src.node(id).clone();
            if let Some(children) = node.children_mut() {
                for child in children.iter_mut() {
                    *child = remap[child.index()];
                }
            }
            self.nodes.push(node);
        }
        NodeId(base)
    }

    /// Copies the subtree rooted at `id` into a fresh, compact tree.
    pub fn subtree(&self, id: NodeId) -> Tree {
        let mut out = Tree::new();
        let root = out.graft(self, id);
        out.root = Some(root);
        out
    }

    /// Drops unreachable arena slots.
    pub fn compact(&self) -> Tree {
        self.root.map_or_else(Tree::new, |root| self.subtree(root))
    }

    // ── Equality ──────────────────────────────────────────────────────────

    /// Structural equality: same shape and same normalized facets,
    /// regardless of arena layout.
    pub fn structurally_eq(&self, other: &Tree) -> bool {
        let (a, b) = match (self.root, other.root) {
            (None, None) => return true,
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };
        let mut stack = vec![(a, b)];
        while let Some((a, b)) = stack.pop() {
            let (na, nb) = (self.node(a), other.node(b));
            if !na.same_shallow(nb) {
                return false;
            }
            stack.extend(na.children().iter().copied().zip(nb.children().iter().copied()));
        }
        true
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_eq(other)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
