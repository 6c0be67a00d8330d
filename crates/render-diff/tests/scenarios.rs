mod common;

use common::{apply, assert_round_trip, li, names, tree, ul};
use render_diff::patch::{from_json_patch, to_json_patch};
use render_diff::{diff, diff_with, extract_metadata, is_sequenced, DiffOptions, Op, Patch};
use render_tree::{Element, Fragment, Tree};
use serde_json::json;

#[test]
fn text_node_changes_value() {
    let patches = diff(&tree(json!({"text": "hello"})), &tree(json!({"text": "world"})));
    assert_eq!(
        to_json_patch(&patches),
        json!([{"seq": 0, "path": [], "op": "setText", "value": "world"}])
    );
}

#[test]
fn attributes_change_in_one_set() {
    let prev = tree(json!({"tag": "div", "attrs": {"class": ["foo"]}}));
    let next = tree(json!({"tag": "div", "attrs": {"class": ["foo", "bar"], "id": ["x"]}}));
    let patches = diff(&prev, &next);
    let sets: Vec<&Patch> = patches
        .iter()
        .filter(|p| p.op_name() == "setAttr")
        .collect();
    assert_eq!(sets.len(), 1);
    assert_eq!(
        to_json_patch(&patches)[0]["value"],
        json!({"class": ["foo", "bar"], "id": ["x"]})
    );
}

#[test]
fn keyed_rotation_moves_without_replacing() {
    let prev = ul(&["a", "b", "c"]);
    let next = ul(&["c", "a", "b"]);
    let patches = assert_round_trip(&prev, &next, &DiffOptions::default());
    let ops = names(&patches);
    assert!(ops.contains(&"moveChild"));
    assert!(!ops.contains(&"replaceNode"));
    assert_eq!(
        to_json_patch(&patches),
        json!([{
            "seq": 0,
            "path": [],
            "op": "moveChild",
            "index": 0,
            "value": {"key": "c", "newIdx": 0}
        }])
    );
}

#[test]
fn child_added_to_empty_element() {
    let prev = tree(json!({"tag": "div"}));
    let next = tree(json!({"tag": "div", "children": [{"text": "hi"}]}));
    let patches = diff(&prev, &next);
    assert_eq!(
        patches[0].op,
        Op::AddChild {
            index: 0,
            value: tree(json!({"text": "hi"}))
        }
    );
    assert_eq!(patches.len(), 1);
    assert_eq!(apply(&prev, &patches), next);
}

#[test]
fn stylesheet_gains_selector() {
    let prev = tree(json!({"tag": "style"}));
    let next = tree(json!({"tag": "style", "styles": {"card": {"color": "blue"}}}));
    assert_eq!(
        to_json_patch(&diff(&prev, &next)),
        json!([{
            "seq": 0,
            "path": [],
            "op": "setStyleDecl",
            "selector": "card",
            "name": "color",
            "value": "blue"
        }])
    );
}

#[test]
fn raw_html_change_is_one_replacement() {
    let prev = tree(json!({"tag": "div", "html": "<b>x</b>", "children": [{"text": "a"}]}));
    let next = tree(json!({"tag": "div", "html": "<b>y</b>", "children": [{"text": "b"}, {"text": "c"}]}));
    let patches = diff(&prev, &next);
    assert_eq!(names(&patches), vec!["replaceNode"]);
    assert_eq!(patches[0].path, Vec::<usize>::new());
    assert_eq!(apply(&prev, &patches), next);
}

#[test]
fn keyed_lists_keep_content_through_reorders() {
    let cases: &[(&[&str], &[&str])] = &[
        (&["a", "b", "c", "d"], &["d", "c", "b", "a"]),
        (&["a", "b", "c", "d", "e"], &["b", "d", "a", "e", "c"]),
        (&["a", "b"], &["b", "a"]),
        (&["a", "b", "c"], &["a", "c", "b"]),
    ];
    for (from, to) in cases {
        let patches = assert_round_trip(&ul(from), &ul(to), &DiffOptions::default());
        assert!(
            patches.iter().all(|p| p.op_name() == "moveChild"),
            "{from:?} -> {to:?}: {:?}",
            names(&patches)
        );
    }
}

#[test]
fn keyed_deletions_descend_and_carry_keys() {
    let prev = ul(&["a", "b", "c", "d", "e"]);
    let next = ul(&["b", "d"]);
    let patches = assert_round_trip(&prev, &next, &DiffOptions::default());
    let deletions: Vec<(usize, Option<String>)> = patches
        .iter()
        .filter_map(|p| match &p.op {
            Op::DelChild { index, key } => Some((*index, key.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        deletions,
        vec![
            (4, Some("e".to_string())),
            (2, Some("c".to_string())),
            (0, Some("a".to_string())),
        ]
    );
}

#[test]
fn keyed_list_with_insertions_and_edits() {
    let prev = tree(json!({"tag": "ul", "children": [
        li("a"),
        {"tag": "li", "key": "b", "attrs": {"class": ["old"]}},
        li("c"),
    ]}));
    let next = tree(json!({"tag": "ul", "children": [
        li("new"),
        {"tag": "li", "key": "b", "attrs": {"class": ["new"]}},
        li("a"),
    ]}));
    let patches = assert_round_trip(&prev, &next, &DiffOptions::default());
    assert!(!names(&patches).contains(&"replaceNode"));
    assert!(names(&patches).contains(&"addChild"));
}

#[test]
fn mixed_keyed_and_unkeyed_children() {
    let prev = tree(json!({"tag": "div", "children": [
        {"text": "head"},
        li("a"),
        {"comment": "gap"},
        li("b"),
        {"text": "tail"},
    ]}));
    let next = tree(json!({"tag": "div", "children": [
        {"text": "HEAD"},
        li("b"),
        li("a"),
        {"text": "tail"},
    ]}));
    assert_round_trip(&prev, &next, &DiffOptions::default());
}

#[test]
fn duplicate_keys_round_trip_with_last_owner() {
    let prev = ul(&["a", "b", "a"]);
    let next = ul(&["b", "a", "a", "c"]);
    assert_round_trip(&prev, &next, &DiffOptions::default());
}

#[test]
fn positional_mode_replaces_on_key_mismatch() {
    let prev = ul(&["a", "b", "c"]);
    let next = ul(&["c", "a"]);
    let patches = assert_round_trip(&prev, &next, &DiffOptions { keyed: false });
    assert_eq!(names(&patches), vec!["replaceNode", "replaceNode", "delChild"]);
}

#[test]
fn nested_lists_reconcile_independently() {
    let group = |k: &str, items: &[&str]| {
        let children: Vec<_> = items.iter().map(|i| li(i)).collect();
        json!({"tag": "section", "key": k, "children": children})
    };
    let prev = tree(json!({"fragment": true, "children": [
        group("x", &["1", "2", "3"]),
        group("y", &["4", "5"]),
    ]}));
    let next = tree(json!({"fragment": true, "children": [
        group("y", &["5", "4", "6"]),
        group("x", &["3", "1"]),
    ]}));
    let patches = assert_round_trip(&prev, &next, &DiffOptions::default());
    assert!(!names(&patches).contains(&"replaceNode"));
    assert!(is_sequenced(&patches));
}

#[test]
fn patches_survive_the_wire() {
    let prev = tree(json!({"tag": "form", "ref": "f", "children": [li("a"), li("b")]}));
    let next = tree(json!({
        "tag": "form",
        "router": {"path": "/x"},
        "upload": {"accept": "*"},
        "handlers": [{"event": "submit", "id": "h", "listen": ["input"], "props": ["value"]}],
        "children": [li("b"), li("c")]
    }));
    let patches = diff(&prev, &next);
    let wire = to_json_patch(&patches);
    let decoded = from_json_patch(&wire).unwrap();
    assert_eq!(decoded, patches);
    assert_eq!(apply(&prev, &decoded), next);
}

#[test]
fn very_deep_trees_diff_without_recursion() {
    let depth = 20_000;
    let build = |leaf: &str| {
        let mut t = Tree::new();
        let mut id = t.text(leaf);
        for _ in 0..depth {
            id = t.element(Element::new("div").with_children(vec![id]));
        }
        t.set_root(Some(id));
        t
    };
    let prev = build("a");
    let next = build("b");
    let patches = diff(&prev, &next);
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].path, vec![0; depth]);
    assert_eq!(apply(&prev, &patches), next);

    assert!(diff(&prev, &prev.compact()).is_empty());
}

#[test]
fn mount_metadata_is_sequenced() {
    let mut t = Tree::new();
    let leaf = t.element(Element::new("input").with_ref("in"));
    let frag = t.fragment(Fragment::new(vec![leaf]));
    let root = t.element(Element::new("form").with_ref("f").with_children(vec![frag]));
    t.set_root(Some(root));

    let patches = extract_metadata(&t);
    assert!(is_sequenced(&patches));
    assert_eq!(
        to_json_patch(&patches),
        json!([
            {"seq": 0, "path": [], "op": "setRef", "value": "f"},
            {"seq": 1, "path": [0, 0], "op": "setRef", "value": "in"}
        ])
    );
}

#[test]
fn keyed_diff_matches_forced_keyed_options() {
    let prev = ul(&["a", "b"]);
    let next = ul(&["b", "a"]);
    assert_eq!(diff(&prev, &next), diff_with(&prev, &next, &DiffOptions::default()));
}
