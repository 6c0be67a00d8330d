//! Core types for render patches.

use render_tree::{Attributes, Handler, StyleMap, Tree, TreeError};
use serde_json::Value;
use thiserror::Error;

/// Root-relative chain of child indices.
pub type Path = Vec<usize>;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum PatchError {
    #[error("NOT_FOUND")]
    NotFound,
    #[error("INVALID_INDEX")]
    InvalidIndex,
    #[error("INVALID_TARGET")]
    InvalidTarget,
    #[error("UNKNOWN_KEY: {0}")]
    UnknownKey(String),
    #[error("OUT_OF_ORDER")]
    OutOfOrder,
    #[error("INVALID_OP: {0}")]
    InvalidOp(String),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

// ── Op enum ───────────────────────────────────────────────────────────────

/// A single mutation instruction.
///
/// Node-level ops address the node at the patch path. Child-level ops
/// (`AddChild`, `DelChild`, `MoveChild`) address the parent at the patch
/// path and carry the child position in `index`.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    SetText {
        value: String,
    },
    SetComment {
        value: String,
    },
    /// Changed and added attributes only.
    SetAttr {
        value: Attributes,
    },
    DelAttr {
        name: String,
    },
    /// Changed and added inline style properties only.
    SetStyle {
        value: StyleMap,
    },
    DelStyle {
        name: String,
    },
    SetStyleDecl {
        selector: String,
        name: String,
        value: String,
    },
    DelStyleDecl {
        selector: String,
        name: String,
    },
    /// The full new handler list; an empty list clears all handlers.
    SetHandlers {
        value: Vec<Handler>,
    },
    SetRef {
        value: String,
    },
    DelRef,
    SetRouter {
        value: Value,
    },
    DelRouter,
    SetUpload {
        value: Value,
    },
    DelUpload,
    SetComponent {
        value: String,
    },
    /// Replaces the node with `value`; an empty tree only at the root.
    ReplaceNode {
        value: Tree,
    },
    AddChild {
        index: usize,
        value: Tree,
    },
    /// `key` is diagnostic; deletion is by index.
    DelChild {
        index: usize,
        key: Option<String>,
    },
    /// Moves the resident child owning `key` to `index`.
    MoveChild {
        index: usize,
        key: String,
    },
}

impl Op {
    /// Wire name of the operation.
    pub fn op_name(&self) -> &'static str {
        match self {
            Op::SetText { .. } => "setText",
            Op::SetComment { .. } => "setComment",
            Op::SetAttr { .. } => "setAttr",
            Op::DelAttr { .. } => "delAttr",
            Op::SetStyle { .. } => "setStyle",
            Op::DelStyle { .. } => "delStyle",
            Op::SetStyleDecl { .. } => "setStyleDecl",
            Op::DelStyleDecl { .. } => "delStyleDecl",
            Op::SetHandlers { .. } => "setHandlers",
            Op::SetRef { .. } => "setRef",
            Op::DelRef => "delRef",
            Op::SetRouter { .. } => "setRouter",
            Op::DelRouter => "delRouter",
            Op::SetUpload { .. } => "setUpload",
            Op::DelUpload => "delUpload",
            Op::SetComponent { .. } => "setComponent",
            Op::ReplaceNode { .. } => "replaceNode",
            Op::AddChild { .. } => "addChild",
            Op::DelChild { .. } => "delChild",
            Op::MoveChild { .. } => "moveChild",
        }
    }

    /// Returns true for ops whose path addresses the parent.
    pub fn is_child_op(&self) -> bool {
        matches!(
            self,
            Op::AddChild { .. } | Op::DelChild { .. } | Op::MoveChild { .. }
        )
    }

    /// Child position for child-level ops.
    pub fn index(&self) -> Option<usize> {
        match self {
            Op::AddChild { index, .. } | Op::DelChild { index, .. } | Op::MoveChild { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}

// ── Patches ───────────────────────────────────────────────────────────────

/// A patch as emitted by the differ, before sequencing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPatch {
    pub path: Path,
    pub op: Op,
}

impl RawPatch {
    pub fn new(path: Path, op: Op) -> Self {
        Self { path, op }
    }
}

/// A sequenced patch. `seq` is the application order.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub seq: usize,
    pub path: Path,
    pub op: Op,
}

impl Patch {
    pub fn op_name(&self) -> &'static str {
        self.op.op_name()
    }
}

/// Options for [`crate::patch::apply::apply_patch`].
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Drop unreachable arena slots once all patches are applied.
    pub compact: bool,
}
