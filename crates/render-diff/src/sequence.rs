//! Sequencing: stamps raw patches with their application order.

use crate::patch::{Patch, RawPatch};

/// Assigns `seq = 0, 1, 2, ...` in emission order.
pub fn sequence(raw: Vec<RawPatch>) -> Vec<Patch> {
    raw.into_iter()
        .enumerate()
        .map(|(seq, RawPatch { path, op })| Patch { seq, path, op })
        .collect()
}

/// True when `patches[i].seq == i` for every `i`.
pub fn is_sequenced(patches: &[Patch]) -> bool {
    patches.iter().enumerate().all(|(i, p)| p.seq == i)
}
