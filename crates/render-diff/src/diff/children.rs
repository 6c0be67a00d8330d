//! Child list reconciliation.
//!
//! Produces an ordered list of [`Step`]s for one parent: patches to emit and
//! child pairs to diff. Child pairs are not diffed here; the caller pushes
//! the steps onto its work stack so that each pair is fully expanded before
//! the next sibling step runs.
//!
//! Two strategies:
//!
//! - **indexed**: positional. Deletions carry a running offset so each index
//!   is valid after the previous deletions were applied.
//! - **keyed**: identity by `key`, in three phases (deletions, intermediate
//!   state, moves/additions) plus a trailing cleanup for unkeyed survivors
//!   that no position claimed.

use indexmap::IndexMap;
use render_tree::{NodeId, Tree};
use tracing::trace;

use crate::patch::{Op, Path, RawPatch};

/// One unit of reconciliation output.
#[derive(Debug)]
pub(crate) enum Step {
    Emit(RawPatch),
    Diff {
        path: Path,
        prev: NodeId,
        next: NodeId,
    },
}

fn child_path(parent: &[usize], index: usize) -> Path {
    let mut path = Vec::with_capacity(parent.len() + 1);
    path.extend_from_slice(parent);
    path.push(index);
    path
}

/// True when any direct child on either side carries a key.
pub(crate) fn has_keys(prev: &Tree, old: &[NodeId], next: &Tree, new: &[NodeId]) -> bool {
    old.iter().any(|&id| prev.key(id).is_some()) || new.iter().any(|&id| next.key(id).is_some())
}

/// Reconciles `old` (children in `prev`) against `new` (children in `next`)
/// under the parent at `path`.
pub(crate) fn reconcile(
    prev: &Tree,
    next: &Tree,
    path: &[usize],
    old: &[NodeId],
    new: &[NodeId],
    keyed: bool,
) -> Vec<Step> {
    if old.is_empty() && new.is_empty() {
        return Vec::new();
    }
    if keyed && has_keys(prev, old, next, new) {
        reconcile_keyed(prev, next, path, old, new)
    } else {
        reconcile_indexed(next, path, old, new)
    }
}

// ── Indexed ───────────────────────────────────────────────────────────────

pub(crate) fn reconcile_indexed(
    next: &Tree,
    path: &[usize],
    old: &[NodeId],
    new: &[NodeId],
) -> Vec<Step> {
    let mut steps = Vec::with_capacity(old.len().max(new.len()));
    let mut deleted = 0;
    for i in 0..old.len().max(new.len()) {
        match (old.get(i), new.get(i)) {
            (Some(&p), Some(&n)) => steps.push(Step::Diff {
                path: child_path(path, i),
                prev: p,
                next: n,
            }),
            (None, Some(&n)) => steps.push(Step::Emit(RawPatch::new(
                path.to_vec(),
                Op::AddChild {
                    index: i,
                    value: next.subtree(n),
                },
            ))),
            (Some(_), None) => {
                steps.push(Step::Emit(RawPatch::new(
                    path.to_vec(),
                    Op::DelChild {
                        index: i - deleted,
                        key: None,
                    },
                )));
                deleted += 1;
            }
            (None, None) => {}
        }
    }
    steps
}

// ── Keyed ─────────────────────────────────────────────────────────────────

/// Maps each key to the index of its last occurrence. With duplicate keys
/// the last occurrence owns the key.
fn key_owners<'a>(tree: &'a Tree, ids: &[NodeId]) -> IndexMap<&'a str, usize> {
    let mut owners = IndexMap::with_capacity(ids.len());
    for (i, &id) in ids.iter().enumerate() {
        if let Some(key) = tree.key(id) {
            owners.insert(key, i);
        }
    }
    owners
}

/// A child currently sitting in the client's list while phase 3 runs.
#[derive(Debug, Clone, Copy)]
struct Resident<'a> {
    /// Index in the old list; `None` for children added during this pass.
    old: Option<usize>,
    /// Owned key, if this is a surviving keyed child.
    key: Option<&'a str>,
}

pub(crate) fn reconcile_keyed(
    prev: &Tree,
    next: &Tree,
    path: &[usize],
    old: &[NodeId],
    new: &[NodeId],
) -> Vec<Step> {
    let old_owners = key_owners(prev, old);
    let new_owners = key_owners(next, new);
    let mut steps = Vec::new();

    // Phase 1: deletions, highest index first.
    let doomed: Vec<bool> = old
        .iter()
        .enumerate()
        .map(|(i, &id)| match prev.key(id) {
            None => new.get(i).map_or(true, |&n| next.key(n).is_some()),
            Some(k) => !new_owners.contains_key(k) || old_owners.get(k) != Some(&i),
        })
        .collect();
    let mut deletions = 0;
    for i in (0..old.len()).rev().filter(|&i| doomed[i]) {
        steps.push(Step::Emit(RawPatch::new(
            path.to_vec(),
            Op::DelChild {
                index: i,
                key: prev.key(old[i]).map(str::to_string),
            },
        )));
        deletions += 1;
    }

    // Phase 2: intermediate state, the survivors in their old relative order.
    let mut resident: Vec<Resident<'_>> = old
        .iter()
        .enumerate()
        .filter(|(i, _)| !doomed[*i])
        .map(|(i, &id)| Resident {
            old: Some(i),
            key: prev.key(id),
        })
        .collect();

    // Phase 3: walk the new list in order. `resident` tracks the client's
    // list as the emitted additions and moves are applied, so positions
    // [0, i) always hold the final children.
    let (mut moves, mut additions) = (0, 0);
    for (i, &n) in new.iter().enumerate() {
        let owned_key = next
            .key(n)
            .filter(|k| new_owners.get(k) == Some(&i));
        let found = match (next.key(n), owned_key) {
            (_, Some(k)) if old_owners.contains_key(k) => resident[i..]
                .iter()
                .position(|r| r.key == Some(k))
                .map(|offset| (i + offset, Some(k))),
            (None, _) => match resident.get(i) {
                Some(r) if r.key.is_none() && r.old.is_some() => Some((i, None)),
                _ => None,
            },
            _ => None,
        };

        let Some((at, key)) = found else {
            steps.push(Step::Emit(RawPatch::new(
                path.to_vec(),
                Op::AddChild {
                    index: i,
                    value: next.subtree(n),
                },
            )));
            resident.insert(i, Resident { old: None, key: None });
            additions += 1;
            continue;
        };

        if at != i {
            let r = resident.remove(at);
            resident.insert(i, r);
            if let Some(k) = key {
                steps.push(Step::Emit(RawPatch::new(
                    path.to_vec(),
                    Op::MoveChild {
                        index: i,
                        key: k.to_string(),
                    },
                )));
                moves += 1;
            }
        }
        if let Some(o) = resident[i].old {
            steps.push(Step::Diff {
                path: child_path(path, i),
                prev: old[o],
                next: n,
            });
        }
    }

    // Phase 4: unkeyed survivors left past the end of the new list.
    let mut leftovers = 0;
    for index in (new.len()..resident.len()).rev() {
        steps.push(Step::Emit(RawPatch::new(
            path.to_vec(),
            Op::DelChild {
                index,
                key: resident[index].key.map(str::to_string),
            },
        )));
        leftovers += 1;
    }

    trace!(
        ?path,
        deletions,
        moves,
        additions,
        leftovers,
        "keyed reconciliation"
    );
    steps
}

// ── Tests ─────────────────────────────────────────────────────────────────
