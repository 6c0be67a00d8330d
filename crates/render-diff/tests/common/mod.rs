#![allow(dead_code)]

use render_diff::patch::{apply_patch, ApplyOptions};
use render_diff::{diff_with, DiffOptions, Patch};
use render_tree::codec::json::from_json;
use render_tree::Tree;
use serde_json::{json, Value};

pub fn tree(v: Value) -> Tree {
    from_json(&v).unwrap_or_else(|e| panic!("bad fixture {v}: {e}"))
}

/// Keyed `<li>` with its key as text content.
pub fn li(key: &str) -> Value {
    json!({"tag": "li", "key": key, "children": [{"text": key}]})
}

pub fn ul(keys: &[&str]) -> Tree {
    let items: Vec<Value> = keys.iter().map(|k| li(k)).collect();
    tree(json!({"tag": "ul", "children": items}))
}

pub fn names(patches: &[Patch]) -> Vec<&'static str> {
    patches.iter().map(|p| p.op_name()).collect()
}

pub fn apply(prev: &Tree, patches: &[Patch]) -> Tree {
    apply_patch(prev.clone(), patches, &ApplyOptions::default())
        .unwrap_or_else(|e| panic!("apply failed: {e}\npatches: {patches:#?}"))
}

/// Diffs, replays and checks that the replay reproduces `next`.
pub fn assert_round_trip(prev: &Tree, next: &Tree, options: &DiffOptions) -> Vec<Patch> {
    let patches = diff_with(prev, next, options);
    let out = apply(prev, &patches);
    assert_eq!(&out, next, "patches: {patches:#?}");
    patches
}
