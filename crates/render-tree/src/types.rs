//! Node payload types.
//!
//! A render node is one of five closed variants. Children are stored as
//! [`NodeId`] handles into the owning [`crate::Tree`] arena, never as nested
//! boxes, so arbitrarily deep trees can be walked without recursion.

use std::collections::BTreeMap;

use serde_json::Value;

// ── Ids and kinds ─────────────────────────────────────────────────────────

/// Handle of a node inside a [`crate::Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Classification of a node.
///
/// There is no "unknown" kind: wire records that cannot be classified are
/// rejected when decoded (see [`crate::codec::json::classify`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Text,
    Comment,
    Element,
    Component,
    Fragment,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Text => "text",
            Kind::Comment => "comment",
            Kind::Element => "element",
            Kind::Component => "component",
            Kind::Fragment => "fragment",
        }
    }
}

// ── Element facets ────────────────────────────────────────────────────────

/// Attribute name → ordered token list (e.g. class tokens).
pub type Attributes = BTreeMap<String, Vec<String>>;

/// Inline style property → value.
pub type StyleMap = BTreeMap<String, String>;

/// Scoped stylesheet: selector → property block.
pub type Stylesheet = BTreeMap<String, StyleMap>;

/// Listener options attached to an event handler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HandlerOptions {
    /// Event properties the client should listen to.
    pub listen: Vec<String>,
    /// Event properties the client should forward with the event.
    pub props: Vec<String>,
}

/// An event handler binding: `event` fires the server-side handler `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    pub event: String,
    pub id: String,
    pub options: HandlerOptions,
}

impl Handler {
    pub fn new(event: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            id: id.into(),
            options: HandlerOptions::default(),
        }
    }

    pub fn with_options(mut self, listen: Vec<String>, props: Vec<String>) -> Self {
        self.options = HandlerOptions { listen, props };
        self
    }
}

/// Returns true for metadata values that carry nothing (`null`, `{}`, `[]`, `""`).
pub fn is_empty_meta(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Object(m) => m.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

// ── Node variants ─────────────────────────────────────────────────────────

/// An HTML element with all of its diffable facets.
///
/// Fields are public for construction convenience. Readers that need the
/// normalized view (empty strings and empty metadata treated as absent) go
/// through the accessor methods; the differ and structural equality only
/// ever use those.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Attributes,
    pub style: StyleMap,
    /// Only meaningful when `tag == "style"`.
    pub styles: Stylesheet,
    pub handlers: Vec<Handler>,
    pub ref_id: Option<String>,
    pub router: Option<Value>,
    pub upload: Option<Value>,
    /// Raw HTML override. When present the children are opaque.
    pub html: Option<String>,
    pub children: Vec<NodeId>,
    pub key: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn is_style(&self) -> bool {
        self.tag == "style"
    }

    pub fn ref_id(&self) -> Option<&str> {
        non_empty(&self.ref_id)
    }

    pub fn html(&self) -> Option<&str> {
        non_empty(&self.html)
    }

    pub fn key(&self) -> Option<&str> {
        non_empty(&self.key)
    }

    pub fn router(&self) -> Option<&Value> {
        self.router.as_ref().filter(|v| !is_empty_meta(v))
    }

    pub fn upload(&self) -> Option<&Value> {
        self.upload.as_ref().filter(|v| !is_empty_meta(v))
    }

    /// Non-empty selector blocks of the scoped stylesheet; nothing unless
    /// this is a `style` element.
    pub fn stylesheet(&self) -> impl Iterator<Item = (&String, &StyleMap)> {
        let active = self.is_style();
        self.styles
            .iter()
            .filter(move |(_, block)| active && !block.is_empty())
    }

    // Builder helpers, used heavily by tests and embedders.

    pub fn attr<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn css(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    pub fn decl(
        mut self,
        selector: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.styles
            .entry(selector.into())
            .or_default()
            .insert(property.into(), value.into());
        self
    }

    pub fn on(mut self, handler: Handler) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn with_ref(mut self, id: impl Into<String>) -> Self {
        self.ref_id = Some(id.into());
        self
    }

    pub fn with_router(mut self, meta: Value) -> Self {
        self.router = Some(meta);
        self
    }

    pub fn with_upload(mut self, meta: Value) -> Self {
        self.upload = Some(meta);
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_children(mut self, children: Vec<NodeId>) -> Self {
        self.children = children;
        self
    }

    /// Compares every facet except child identities, using the normalized
    /// accessors.
    pub fn same_facets(&self, other: &Element) -> bool {
        self.tag == other.tag
            && self.attrs == other.attrs
            && self.style == other.style
            && self.stylesheet().eq(other.stylesheet())
            && self.handlers == other.handlers
            && self.ref_id() == other.ref_id()
            && self.router() == other.router()
            && self.upload() == other.upload()
            && self.html() == other.html()
            && self.key() == other.key()
    }
}

/// A component boundary. It renders its children and carries no facets of
/// its own beyond its id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Component {
    pub id: String,
    pub children: Vec<NodeId>,
    pub key: Option<String>,
}

impl Component {
    pub fn new(id: impl Into<String>, children: Vec<NodeId>) -> Self {
        Self {
            id: id.into(),
            children,
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    pub children: Vec<NodeId>,
    pub key: Option<String>,
}

impl Fragment {
    pub fn new(children: Vec<NodeId>) -> Self {
        Self {
            children,
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// A render node. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Comment(String),
    Element(Element),
    Component(Component),
    Fragment(Fragment),
}

impl Node {
    pub fn kind(&self) -> Kind {
        match self {
            Node::Text(_) => Kind::Text,
            Node::Comment(_) => Kind::Comment,
            Node::Element(_) => Kind::Element,
            Node::Component(_) => Kind::Component,
            Node::Fragment(_) => Kind::Fragment,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Element(e) => &e.children,
            Node::Component(c) => &c.children,
            Node::Fragment(f) => &f.children,
            Node::Text(_) | Node::Comment(_) => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            Node::Element(e) => Some(&mut e.children),
            Node::Component(c) => Some(&mut c.children),
            Node::Fragment(f) => Some(&mut f.children),
            Node::Text(_) | Node::Comment(_) => None,
        }
    }

    /// Sibling identity key. Empty keys count as no key.
    pub fn key(&self) -> Option<&str> {
        match self {
            Node::Element(e) => e.key(),
            Node::Component(c) => non_empty(&c.key),
            Node::Fragment(f) => non_empty(&f.key),
            Node::Text(_) | Node::Comment(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Shallow structural equality: same variant, same facets, same number
    /// of children. Child contents are not compared.
    pub fn same_shallow(&self, other: &Node) -> bool {
        let facets = match (self, other) {
            (Node::Text(a), Node::Text(b)) => a == b,
            (Node::Comment(a), Node::Comment(b)) => a == b,
            (Node::Element(a), Node::Element(b)) => a.same_facets(b),
            (Node::Component(a), Node::Component(b)) => a.id == b.id && self.key() == other.key(),
            (Node::Fragment(_), Node::Fragment(_)) => self.key() == other.key(),
            _ => false,
        };
        facets && self.children().len() == other.children().len()
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl From<Component> for Node {
    fn from(c: Component) -> Self {
        Node::Component(c)
    }
}

impl From<Fragment> for Node {
    fn from(f: Fragment) -> Self {
        Node::Fragment(f)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_strings_read_as_absent() {
        let el = Element::new("div").with_ref("").with_html("").with_key("");
        assert_eq!(el.ref_id(), None);
        assert_eq!(el.html(), None);
        assert_eq!(el.key(), None);
    }

    #[test]
    fn empty_metadata_reads_as_absent() {
        let el = Element::new("a")
            .with_router(json!({}))
            .with_upload(json!(null));
        assert_eq!(el.router(), None);
        assert_eq!(el.upload(), None);

        let el = Element::new("a").with_router(json!({"path": "/x"}));
        assert_eq!(el.router(), Some(&json!({"path": "/x"})));
    }

    #[test]
    fn stylesheet_only_on_style_elements() {
        let div = Element::new("div").decl("card", "color", "red");
        assert_eq!(div.stylesheet().count(), 0);
        let style = Element::new("style").decl("card", "color", "red");
        assert_eq!(style.stylesheet().count(), 1);
    }

    #[test]
    fn stylesheet_skips_empty_blocks() {
        let mut style = Element::new("style").decl("a", "color", "red");
        style.styles.insert("b".into(), StyleMap::new());
        let selectors: Vec<_> = style.stylesheet().map(|(s, _)| s.as_str()).collect();
        assert_eq!(selectors, vec!["a"]);
    }

    #[test]
    fn same_facets_ignores_children_ids() {
        let a = Element::new("p").with_children(vec![NodeId(1)]);
        let b = Element::new("p").with_children(vec![NodeId(7)]);
        assert!(a.same_facets(&b));
        assert!(Node::from(a).same_shallow(&Node::from(b)));
    }

    #[test]
    fn same_shallow_checks_child_count() {
        let a = Node::from(Fragment::new(vec![NodeId(0)]));
        let b = Node::from(Fragment::new(vec![]));
        assert!(!a.same_shallow(&b));
    }

    #[test]
    fn text_has_no_children_or_key() {
        let n = Node::Text("x".into());
        assert!(n.children().is_empty());
        assert_eq!(n.key(), None);
        assert_eq!(n.kind(), Kind::Text);
    }
}
