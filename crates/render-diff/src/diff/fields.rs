//! Per-facet comparators for element nodes.
//!
//! Each differ appends zero or more whole ops to `ops`. Keys are visited in
//! lexicographic order (all facet maps are `BTreeMap`s), so the emitted
//! order is stable.

use render_tree::{Attributes, Handler, StyleMap, Stylesheet};
use serde_json::Value;

use crate::patch::Op;

/// One `SetAttr` with every changed or added attribute, then one `DelAttr`
/// per removed attribute. Token lists compare in order.
pub fn diff_attrs(prev: &Attributes, next: &Attributes, ops: &mut Vec<Op>) {
    let changed: Attributes = next
        .iter()
        .filter(|(k, v)| prev.get(*k) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if !changed.is_empty() {
        ops.push(Op::SetAttr { value: changed });
    }
    for name in prev.keys().filter(|k| !next.contains_key(*k)) {
        ops.push(Op::DelAttr { name: name.clone() });
    }
}

/// One `SetStyle` with every changed or added property, then one `DelStyle`
/// per removed property.
pub fn diff_style(prev: &StyleMap, next: &StyleMap, ops: &mut Vec<Op>) {
    let changed: StyleMap = next
        .iter()
        .filter(|(k, v)| prev.get(*k) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if !changed.is_empty() {
        ops.push(Op::SetStyle { value: changed });
    }
    for name in prev.keys().filter(|k| !next.contains_key(*k)) {
        ops.push(Op::DelStyle { name: name.clone() });
    }
}

/// Declaration-level diff of scoped stylesheet rules. Empty selector blocks
/// count as absent.
pub fn diff_stylesheet(prev: &Stylesheet, next: &Stylesheet, ops: &mut Vec<Op>) {
    let empty = StyleMap::new();
    let mut selectors: Vec<&String> = prev.keys().chain(next.keys()).collect();
    selectors.sort();
    selectors.dedup();

    for selector in selectors {
        let old = prev.get(selector).unwrap_or(&empty);
        let new = next.get(selector).unwrap_or(&empty);
        let set = |name: &String, value: &String| Op::SetStyleDecl {
            selector: selector.clone(),
            name: name.clone(),
            value: value.clone(),
        };
        let del = |name: &String| Op::DelStyleDecl {
            selector: selector.clone(),
            name: name.clone(),
        };

        if new.is_empty() {
            ops.extend(old.keys().map(del));
        } else if old.is_empty() {
            ops.extend(new.iter().map(|(n, v)| set(n, v)));
        } else {
            for (name, value) in new {
                if old.get(name) != Some(value) {
                    ops.push(set(name, value));
                }
            }
            ops.extend(old.keys().filter(|n| !new.contains_key(*n)).map(del));
        }
    }
}

/// `SetRef` when the ref is set or changed, `DelRef` when cleared.
pub fn diff_ref(prev: Option<&str>, next: Option<&str>, ops: &mut Vec<Op>) {
    ops.extend(replace_value(
        prev,
        next,
        |v: &str| Op::SetRef {
            value: v.to_string(),
        },
        Op::DelRef,
    ));
}

/// Whole-list compare; any difference resends the full `next` list.
pub fn diff_handlers(prev: &[Handler], next: &[Handler], ops: &mut Vec<Op>) {
    if prev != next {
        ops.push(Op::SetHandlers {
            value: next.to_vec(),
        });
    }
}

pub fn diff_router(prev: Option<&Value>, next: Option<&Value>, ops: &mut Vec<Op>) {
    ops.extend(replace_value(
        prev,
        next,
        |v: &Value| Op::SetRouter { value: v.clone() },
        Op::DelRouter,
    ));
}

pub fn diff_upload(prev: Option<&Value>, next: Option<&Value>, ops: &mut Vec<Op>) {
    ops.extend(replace_value(
        prev,
        next,
        |v: &Value| Op::SetUpload { value: v.clone() },
        Op::DelUpload,
    ));
}

/// Replace-whole-value comparator: `set(next)` when next is present and
/// differs, `del` when next is absent and prev was present.
fn replace_value<T: PartialEq + ?Sized>(
    prev: Option<&T>,
    next: Option<&T>,
    set: impl FnOnce(&T) -> Op,
    del: Op,
) -> Option<Op> {
    match (prev, next) {
        (_, Some(n)) if prev != Some(n) => Some(set(n)),
        (Some(_), None) => Some(del),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(pairs: &[(&str, &[&str])]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    fn style(pairs: &[(&str, &str)]) -> StyleMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn attrs_collects_changes_into_one_set() {
        let mut ops = Vec::new();
        diff_attrs(
            &attrs(&[("class", &["foo"])]),
            &attrs(&[("class", &["foo", "bar"]), ("id", &["x"])]),
            &mut ops,
        );
        assert_eq!(
            ops,
            vec![Op::SetAttr {
                value: attrs(&[("class", &["foo", "bar"]), ("id", &["x"])])
            }]
        );
    }

    #[test]
    fn attrs_token_order_matters() {
        let mut ops = Vec::new();
        diff_attrs(
            &attrs(&[("class", &["a", "b"])]),
            &attrs(&[("class", &["b", "a"])]),
            &mut ops,
        );
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn attrs_removals_are_separate_and_sorted() {
        let mut ops = Vec::new();
        diff_attrs(
            &attrs(&[("b", &["1"]), ("a", &["1"]), ("keep", &["1"])]),
            &attrs(&[("keep", &["1"])]),
            &mut ops,
        );
        assert_eq!(
            ops,
            vec![
                Op::DelAttr { name: "a".into() },
                Op::DelAttr { name: "b".into() }
            ]
        );
    }

    #[test]
    fn attrs_equal_is_silent() {
        let mut ops = Vec::new();
        let a = attrs(&[("x", &["1", "2"])]);
        diff_attrs(&a, &a.clone(), &mut ops);
        assert!(ops.is_empty());
    }

    #[test]
    fn style_set_then_deletes() {
        let mut ops = Vec::new();
        diff_style(
            &style(&[("color", "red"), ("margin", "0")]),
            &style(&[("color", "blue"), ("padding", "1px")]),
            &mut ops,
        );
        assert_eq!(
            ops,
            vec![
                Op::SetStyle {
                    value: style(&[("color", "blue"), ("padding", "1px")])
                },
                Op::DelStyle {
                    name: "margin".into()
                },
            ]
        );
    }

    fn sheet(blocks: &[(&str, &[(&str, &str)])]) -> Stylesheet {
        blocks
            .iter()
            .map(|(sel, props)| (sel.to_string(), style(props)))
            .collect()
    }

    #[test]
    fn stylesheet_new_selector() {
        let mut ops = Vec::new();
        diff_stylesheet(
            &Stylesheet::new(),
            &sheet(&[("card", &[("color", "blue")])]),
            &mut ops,
        );
        assert_eq!(
            ops,
            vec![Op::SetStyleDecl {
                selector: "card".into(),
                name: "color".into(),
                value: "blue".into()
            }]
        );
    }

    #[test]
    fn stylesheet_removed_selector_deletes_each_property() {
        let mut ops = Vec::new();
        diff_stylesheet(
            &sheet(&[("card", &[("color", "blue"), ("margin", "0")])]),
            &sheet(&[("card", &[])]),
            &mut ops,
        );
        assert_eq!(
            ops,
            vec![
                Op::DelStyleDecl {
                    selector: "card".into(),
                    name: "color".into()
                },
                Op::DelStyleDecl {
                    selector: "card".into(),
                    name: "margin".into()
                },
            ]
        );
    }

    #[test]
    fn stylesheet_property_level_changes() {
        let mut ops = Vec::new();
        diff_stylesheet(
            &sheet(&[("a", &[("color", "red"), ("gap", "1")]), ("b", &[("x", "1")])]),
            &sheet(&[("a", &[("color", "blue"), ("top", "0")]), ("b", &[("x", "1")])]),
            &mut ops,
        );
        assert_eq!(
            ops,
            vec![
                Op::SetStyleDecl {
                    selector: "a".into(),
                    name: "color".into(),
                    value: "blue".into()
                },
                Op::SetStyleDecl {
                    selector: "a".into(),
                    name: "top".into(),
                    value: "0".into()
                },
                Op::DelStyleDecl {
                    selector: "a".into(),
                    name: "gap".into()
                },
            ]
        );
    }

    #[test]
    fn ref_set_change_clear() {
        let mut ops = Vec::new();
        diff_ref(None, Some("r1"), &mut ops);
        diff_ref(Some("r1"), Some("r2"), &mut ops);
        diff_ref(Some("r2"), None, &mut ops);
        diff_ref(Some("r2"), Some("r2"), &mut ops);
        diff_ref(None, None, &mut ops);
        assert_eq!(
            ops,
            vec![
                Op::SetRef { value: "r1".into() },
                Op::SetRef { value: "r2".into() },
                Op::DelRef,
            ]
        );
    }

    #[test]
    fn handlers_compare_options_too() {
        let a = vec![Handler::new("click", "h1")];
        let b = vec![Handler::new("click", "h1").with_options(vec!["key".into()], vec![])];
        let mut ops = Vec::new();
        diff_handlers(&a, &a, &mut ops);
        assert!(ops.is_empty());
        diff_handlers(&a, &b, &mut ops);
        assert_eq!(ops, vec![Op::SetHandlers { value: b.clone() }]);
        ops.clear();
        diff_handlers(&b, &[], &mut ops);
        assert_eq!(ops, vec![Op::SetHandlers { value: vec![] }]);
    }

    #[test]
    fn router_and_upload_replace_whole_value() {
        let mut ops = Vec::new();
        let r1 = json!({"path": "/a", "params": {"id": 1}});
        let r2 = json!({"path": "/a", "params": {"id": 2}});
        diff_router(Some(&r1), Some(&r1.clone()), &mut ops);
        diff_router(Some(&r1), Some(&r2), &mut ops);
        diff_upload(Some(&r1), None, &mut ops);
        assert_eq!(ops, vec![Op::SetRouter { value: r2 }, Op::DelUpload]);
    }
}
