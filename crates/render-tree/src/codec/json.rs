//! JSON wire codec for render trees.
//!
//! Node records:
//!
//! ```text
//! {"text": "hi"}
//! {"comment": "note"}
//! {"tag": "li", "key": "a", "attrs": {"class": ["x"]}, "style": {"color": "red"},
//!  "styles": {".card": {"color": "blue"}}, "handlers": [{"event": "click", "id": "h1"}],
//!  "ref": "r1", "router": {...}, "upload": {...}, "html": "<b>x</b>", "children": [...]}
//! {"componentId": "c1", "key": "a", "children": [...]}
//! {"fragment": true, "key": "a", "children": [...]}
//! ```
//!
//! A record is classified by the first field present in the order
//! `componentId`, `tag`, `text`, `comment`, `fragment`. Decoding normalizes
//! empty keys, refs, raw html and metadata to "absent", and drops scoped
//! styles on anything but a `style` element.

use serde_json::{json, Map, Value};

use crate::error::TreeError;
use crate::tree::Tree;
use crate::types::{
    is_empty_meta, Attributes, Component, Element, Fragment, Handler, HandlerOptions, Kind, Node,
    NodeId, StyleMap, Stylesheet,
};

// ── Classification ────────────────────────────────────────────────────────

fn has_str(obj: &Map<String, Value>, name: &str) -> bool {
    obj.get(name).and_then(Value::as_str).is_some_and(|s| !s.is_empty())
}

/// Classifies a wire record with the fixed precedence
/// `componentId > tag > text > comment > fragment`.
///
/// `text` and `comment` count as present even when empty; `componentId` and
/// `tag` must be non-empty; `fragment` must be `true`. Returns `None` when
/// nothing matches.
pub fn classify(obj: &Map<String, Value>) -> Option<Kind> {
    if has_str(obj, "componentId") {
        Some(Kind::Component)
    } else if has_str(obj, "tag") {
        Some(Kind::Element)
    } else if obj.get("text").is_some_and(Value::is_string) {
        Some(Kind::Text)
    } else if obj.get("comment").is_some_and(Value::is_string) {
        Some(Kind::Comment)
    } else if obj.get("fragment").and_then(Value::as_bool) == Some(true) {
        Some(Kind::Fragment)
    } else {
        None
    }
}

// ── Field helpers ─────────────────────────────────────────────────────────

fn invalid(name: &str) -> TreeError {
    TreeError::InvalidField(name.to_string())
}

fn opt_str<'a>(obj: &'a Map<String, Value>, name: &str) -> Result<Option<&'a str>, TreeError> {
    match obj.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(invalid(name)),
    }
}

fn opt_non_empty(obj: &Map<String, Value>, name: &str) -> Result<Option<String>, TreeError> {
    Ok(opt_str(obj, name)?.filter(|s| !s.is_empty()).map(str::to_string))
}

fn decode_key(obj: &Map<String, Value>) -> Result<Option<String>, TreeError> {
    match obj.get("key") {
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        _ => opt_non_empty(obj, "key"),
    }
}

fn decode_meta(obj: &Map<String, Value>, name: &str) -> Option<Value> {
    obj.get(name).filter(|v| !is_empty_meta(v)).cloned()
}

fn string_list(v: &Value, name: &str) -> Result<Vec<String>, TreeError> {
    match v {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid(name)))
            .collect(),
        _ => Err(invalid(name)),
    }
}

/// Decodes an attribute map: `{name: [token, ...]}`. A bare string is read
/// as a one-token list.
pub fn attrs_from_json(v: &Value) -> Result<Attributes, TreeError> {
    let obj = match v {
        Value::Null => return Ok(Attributes::new()),
        Value::Object(obj) => obj,
        _ => return Err(invalid("attrs")),
    };
    obj.iter()
        .map(|(k, v)| Ok((k.clone(), string_list(v, "attrs")?)))
        .collect()
}

pub fn attrs_to_json(attrs: &Attributes) -> Value {
    Value::Object(
        attrs
            .iter()
            .map(|(k, v)| (k.clone(), json!(v)))
            .collect(),
    )
}

/// Decodes a property map: `{name: value}`.
pub fn style_from_json(v: &Value) -> Result<StyleMap, TreeError> {
    let obj = match v {
        Value::Null => return Ok(StyleMap::new()),
        Value::Object(obj) => obj,
        _ => return Err(invalid("style")),
    };
    obj.iter()
        .map(|(k, v)| match v {
            Value::String(s) => Ok((k.clone(), s.clone())),
            Value::Number(n) => Ok((k.clone(), n.to_string())),
            _ => Err(invalid("style")),
        })
        .collect()
}

pub fn style_to_json(style: &StyleMap) -> Value {
    Value::Object(
        style
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

fn stylesheet_from_json(v: &Value) -> Result<Stylesheet, TreeError> {
    let obj = match v {
        Value::Null => return Ok(Stylesheet::new()),
        Value::Object(obj) => obj,
        _ => return Err(invalid("styles")),
    };
    let mut sheet = Stylesheet::new();
    for (selector, block) in obj {
        let block = style_from_json(block).map_err(|_| invalid("styles"))?;
        if !block.is_empty() {
            sheet.insert(selector.clone(), block);
        }
    }
    Ok(sheet)
}

fn stylesheet_to_json<'a>(blocks: impl Iterator<Item = (&'a String, &'a StyleMap)>) -> Value {
    Value::Object(
        blocks
            .map(|(selector, block)| (selector.clone(), style_to_json(block)))
            .collect(),
    )
}

pub fn handler_from_json(v: &Value) -> Result<Handler, TreeError> {
    let obj = v.as_object().ok_or_else(|| invalid("handlers"))?;
    let event = opt_str(obj, "event")?.ok_or_else(|| invalid("handlers.event"))?;
    let id = opt_str(obj, "id")?.ok_or_else(|| invalid("handlers.id"))?;
    let listen = obj
        .get("listen")
        .map(|v| string_list(v, "handlers.listen"))
        .transpose()?
        .unwrap_or_default();
    let props = obj
        .get("props")
        .map(|v| string_list(v, "handlers.props"))
        .transpose()?
        .unwrap_or_default();
    Ok(Handler {
        event: event.to_string(),
        id: id.to_string(),
        options: HandlerOptions { listen, props },
    })
}

pub fn handler_to_json(handler: &Handler) -> Value {
    let mut m = Map::new();
    m.insert("event".into(), json!(handler.event));
    m.insert("id".into(), json!(handler.id));
    if !handler.options.listen.is_empty() {
        m.insert("listen".into(), json!(handler.options.listen));
    }
    if !handler.options.props.is_empty() {
        m.insert("props".into(), json!(handler.options.props));
    }
    Value::Object(m)
}

pub fn handlers_from_json(v: &Value) -> Result<Vec<Handler>, TreeError> {
    match v {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.iter().map(handler_from_json).collect(),
        _ => Err(invalid("handlers")),
    }
}

pub fn handlers_to_json(handlers: &[Handler]) -> Value {
    Value::Array(handlers.iter().map(handler_to_json).collect())
}

// ── Decoding ──────────────────────────────────────────────────────────────

/// A record whose children are still being decoded.
struct Frame<'a> {
    obj: &'a Map<String, Value>,
    kind: Kind,
    items: &'a [Value],
    built: Vec<NodeId>,
}

fn open_frame(v: &Value) -> Result<Frame<'_>, TreeError> {
    let obj = v.as_object().ok_or(TreeError::NotAnObject)?;
    let kind = classify(obj).ok_or(TreeError::Unclassifiable)?;
    let items: &[Value] = match (kind, obj.get("children")) {
        (Kind::Text | Kind::Comment, _) | (_, None | Some(Value::Null)) => &[],
        (_, Some(Value::Array(items))) => items,
        (_, Some(_)) => return Err(invalid("children")),
    };
    Ok(Frame {
        obj,
        kind,
        items,
        built: Vec::with_capacity(items.len()),
    })
}

fn close_frame(frame: Frame<'_>) -> Result<Node, TreeError> {
    let Frame {
        obj, kind, built, ..
    } = frame;
    let node = match kind {
        Kind::Text => Node::Text(opt_str(obj, "text")?.unwrap_or_default().to_string()),
        Kind::Comment => Node::Comment(opt_str(obj, "comment")?.unwrap_or_default().to_string()),
        Kind::Component => Node::Component(Component {
            id: opt_str(obj, "componentId")?.unwrap_or_default().to_string(),
            children: built,
            key: decode_key(obj)?,
        }),
        Kind::Fragment => Node::Fragment(Fragment {
            children: built,
            key: decode_key(obj)?,
        }),
        Kind::Element => {
            let tag = opt_str(obj, "tag")?.unwrap_or_default().to_string();
            let styles = if tag == "style" {
                stylesheet_from_json(obj.get("styles").unwrap_or(&Value::Null))?
            } else {
                Stylesheet::new()
            };
            Node::Element(Element {
                attrs: attrs_from_json(obj.get("attrs").unwrap_or(&Value::Null))?,
                style: style_from_json(obj.get("style").unwrap_or(&Value::Null))?,
                styles,
                handlers: handlers_from_json(obj.get("handlers").unwrap_or(&Value::Null))?,
                ref_id: opt_non_empty(obj, "ref")?,
                router: decode_meta(obj, "router"),
                upload: decode_meta(obj, "upload"),
                html: opt_non_empty(obj, "html")?,
                children: built,
                key: decode_key(obj)?,
                tag,
            })
        }
    };
    Ok(node)
}

/// Decodes one node record (and its descendants) into `tree`'s arena.
/// The returned node is not attached.
pub fn node_from_json(tree: &mut Tree, v: &Value) -> Result<NodeId, TreeError> {
    let mut parents: Vec<Frame<'_>> = Vec::new();
    let mut current = open_frame(v)?;
    loop {
        let items = current.items;
        if let Some(child) = items.get(current.built.len()) {
            let frame = open_frame(child)?;
            parents.push(std::mem::replace(&mut current, frame));
            continue;
        }
        let id = tree.push(close_frame(current)?);
        match parents.pop() {
            Some(mut parent) => {
                parent.built.push(id);
                current = parent;
            }
            None => return Ok(id),
        }
    }
}

/// Decodes a whole tree. `null` decodes to the empty tree.
pub fn from_json(v: &Value) -> Result<Tree, TreeError> {
    let mut tree = Tree::new();
    if !v.is_null() {
        let root = node_from_json(&mut tree, v)?;
        tree.set_root(Some(root));
    }
    Ok(tree)
}

/// Parses and decodes a tree from JSON text.
pub fn from_str(s: &str) -> Result<Tree, TreeError> {
    let v: Value = serde_json::from_str(s).map_err(|e| TreeError::InvalidField(e.to_string()))?;
    from_json(&v)
}

// ── Encoding ──────────────────────────────────────────────────────────────

fn encode_shallow(node: &Node, children: Vec<Value>) -> Value {
    let mut m = Map::new();
    match node {
        Node::Text(s) => {
            m.insert("text".into(), json!(s));
        }
        Node::Comment(s) => {
            m.insert("comment".into(), json!(s));
        }
        Node::Component(c) => {
            m.insert("componentId".into(), json!(c.id));
        }
        Node::Fragment(_) => {
            m.insert("fragment".into(), json!(true));
        }
        Node::Element(e) => {
            m.insert("tag".into(), json!(e.tag));
            if !e.attrs.is_empty() {
                m.insert("attrs".into(), attrs_to_json(&e.attrs));
            }
            if !e.style.is_empty() {
                m.insert("style".into(), style_to_json(&e.style));
            }
            if e.stylesheet().next().is_some() {
                m.insert("styles".into(), stylesheet_to_json(e.stylesheet()));
            }
            if !e.handlers.is_empty() {
                m.insert("handlers".into(), handlers_to_json(&e.handlers));
            }
            if let Some(r) = e.ref_id() {
                m.insert("ref".into(), json!(r));
            }
            if let Some(v) = e.router() {
                m.insert("router".into(), v.clone());
            }
            if let Some(v) = e.upload() {
                m.insert("upload".into(), v.clone());
            }
            if let Some(h) = e.html() {
                m.insert("html".into(), json!(h));
            }
        }
    }
    if let Some(key) = node.key() {
        m.insert("key".into(), json!(key));
    }
    if !children.is_empty() || matches!(node, Node::Fragment(_)) {
        m.insert("children".into(), Value::Array(children));
    }
    Value::Object(m)
}

/// Encodes the subtree rooted at `id`.
pub fn node_to_json(tree: &Tree, id: NodeId) -> Value {
    let order = tree.preorder(id);
    let mut built: Vec<Option<Value>> = vec![None; tree.arena_len()];
    for &nid in order.iter().rev() {
        let node = tree.node(nid);
        let children = node
            .children()
            .iter()
            .map(|c| built[c.index()].take().unwrap_or(Value::Null))
            .collect();
        built[nid.index()] = Some(encode_shallow(node, children));
    }
    built[id.index()].take().unwrap_or(Value::Null)
}

/// Encodes a whole tree. The empty tree encodes as `null`.
pub fn to_json(tree: &Tree) -> Value {
    tree.root()
        .map_or(Value::Null, |root| node_to_json(tree, root))
}

// ── Tests ─────────────────────────────────────────────────────────────────
