//! Reference patch applier.
//!
//! Applies patches to a [`Tree`] with the semantics a client applier is
//! expected to implement: ops run in `seq` order, paths are resolved against
//! the tree as it is at that moment, and `MoveChild` is resolved by key (the
//! last child carrying the key wins).

use render_tree::{Node, NodeId, Tree};

use super::types::{ApplyOptions, Op, Patch, PatchError};

// ── Navigation ────────────────────────────────────────────────────────────

fn node_mut<'a>(tree: &'a mut Tree, path: &[usize]) -> Result<&'a mut Node, PatchError> {
    let id = tree.resolve(path).ok_or(PatchError::NotFound)?;
    tree.get_mut(id).ok_or(PatchError::NotFound)
}

fn element_mut<'a>(
    tree: &'a mut Tree,
    path: &[usize],
) -> Result<&'a mut render_tree::Element, PatchError> {
    node_mut(tree, path)?
        .as_element_mut()
        .ok_or(PatchError::InvalidTarget)
}

fn children_mut<'a>(tree: &'a mut Tree, path: &[usize]) -> Result<&'a mut Vec<NodeId>, PatchError> {
    node_mut(tree, path)?
        .children_mut()
        .ok_or(PatchError::InvalidTarget)
}

fn graft_value(tree: &mut Tree, value: &Tree) -> Result<NodeId, PatchError> {
    let root = value
        .root()
        .ok_or_else(|| PatchError::InvalidOp("empty subtree".into()))?;
    Ok(tree.graft(value, root))
}

// ── Structural operations ─────────────────────────────────────────────────

fn apply_replace(tree: &mut Tree, path: &[usize], value: &Tree) -> Result<(), PatchError> {
    let Some((&index, parent)) = path.split_last() else {
        *tree = value.compact();
        return Ok(());
    };
    tree.resolve(path).ok_or(PatchError::NotFound)?;
    let id = graft_value(tree, value)?;
    let children = children_mut(tree, parent)?;
    children[index] = id;
    Ok(())
}

fn apply_add(tree: &mut Tree, path: &[usize], index: usize, value: &Tree) -> Result<(), PatchError> {
    if children_mut(tree, path)?.len() < index {
        return Err(PatchError::InvalidIndex);
    }
    let id = graft_value(tree, value)?;
    children_mut(tree, path)?.insert(index, id);
    Ok(())
}

fn apply_del(tree: &mut Tree, path: &[usize], index: usize) -> Result<(), PatchError> {
    let children = children_mut(tree, path)?;
    if index >= children.len() {
        return Err(PatchError::InvalidIndex);
    }
    children.remove(index);
    Ok(())
}

fn apply_move(tree: &mut Tree, path: &[usize], index: usize, key: &str) -> Result<(), PatchError> {
    let parent = tree.resolve(path).ok_or(PatchError::NotFound)?;
    let from = tree
        .children(parent)
        .iter()
        .rposition(|&c| tree.key(c) == Some(key))
        .ok_or_else(|| PatchError::UnknownKey(key.to_string()))?;
    let children = children_mut(tree, path)?;
    let id = children.remove(from);
    if index > children.len() {
        return Err(PatchError::InvalidIndex);
    }
    children.insert(index, id);
    Ok(())
}

// ── Public API ────────────────────────────────────────────────────────────

/// Applies a single patch in place.
pub fn apply_op(tree: &mut Tree, patch: &Patch) -> Result<(), PatchError> {
    let path = patch.path.as_slice();
    match &patch.op {
        Op::SetText { value } => match node_mut(tree, path)? {
            Node::Text(s) => *s = value.clone(),
            _ => return Err(PatchError::InvalidTarget),
        },
        Op::SetComment { value } => match node_mut(tree, path)? {
            Node::Comment(s) => *s = value.clone(),
            _ => return Err(PatchError::InvalidTarget),
        },
        Op::SetComponent { value } => match node_mut(tree, path)? {
            Node::Component(c) => c.id = value.clone(),
            _ => return Err(PatchError::InvalidTarget),
        },
        Op::SetAttr { value } => {
            let el = element_mut(tree, path)?;
            el.attrs
                .extend(value.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Op::DelAttr { name } => {
            element_mut(tree, path)?.attrs.remove(name);
        }
        Op::SetStyle { value } => {
            let el = element_mut(tree, path)?;
            el.style
                .extend(value.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Op::DelStyle { name } => {
            element_mut(tree, path)?.style.remove(name);
        }
        Op::SetStyleDecl {
            selector,
            name,
            value,
        } => {
            element_mut(tree, path)?
                .styles
                .entry(selector.clone())
                .or_default()
                .insert(name.clone(), value.clone());
        }
        Op::DelStyleDecl { selector, name } => {
            let el = element_mut(tree, path)?;
            if let Some(block) = el.styles.get_mut(selector) {
                block.remove(name);
                if block.is_empty() {
                    el.styles.remove(selector);
                }
            }
        }
        Op::SetHandlers { value } => element_mut(tree, path)?.handlers = value.clone(),
        Op::SetRef { value } => element_mut(tree, path)?.ref_id = Some(value.clone()),
        Op::DelRef => element_mut(tree, path)?.ref_id = None,
        Op::SetRouter { value } => element_mut(tree, path)?.router = Some(value.clone()),
        Op::DelRouter => element_mut(tree, path)?.router = None,
        Op::SetUpload { value } => element_mut(tree, path)?.upload = Some(value.clone()),
        Op::DelUpload => element_mut(tree, path)?.upload = None,
        Op::ReplaceNode { value } => apply_replace(tree, path, value)?,
        Op::AddChild { index, value } => apply_add(tree, path, *index, value)?,
        Op::DelChild { index, .. } => apply_del(tree, path, *index)?,
        Op::MoveChild { index, key } => apply_move(tree, path, *index, key)?,
    }
    Ok(())
}

/// Applies patches in `seq` order and returns the resulting tree.
///
/// Fails with [`PatchError::OutOfOrder`] if two patches share a `seq`.
pub fn apply_patch(
    tree: Tree,
    patches: &[Patch],
    options: &ApplyOptions,
) -> Result<Tree, PatchError> {
    let mut ordered: Vec<&Patch> = patches.iter().collect();
    ordered.sort_by_key(|p| p.seq);
    if ordered.windows(2).any(|w| w[0].seq == w[1].seq) {
        return Err(PatchError::OutOfOrder);
    }
    let mut working = tree;
    for patch in ordered {
        apply_op(&mut working, patch)?;
    }
    Ok(if options.compact {
        working.compact()
    } else {
        working
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────
