//! Render trees for server-driven UIs.
//!
//! A [`Tree`] is an arena of [`Node`]s: text, comments, elements (with
//! attributes, inline style, scoped stylesheet rules, event handlers, ref,
//! router/upload metadata and a raw-HTML override), component boundaries and
//! fragments. Trees are produced by a component runtime, diffed by
//! `render-diff`, and shipped to clients in the JSON wire form implemented by
//! [`codec::json`].
//!
//! # Example
//!
//! ```
//! use render_tree::{Element, Tree};
//! use render_tree::codec::json::{from_json, to_json};
//! use serde_json::json;
//!
//! let tree = Tree::build(|t| {
//!     let label = t.text("Save");
//!     t.element(Element::new("button").attr("class", ["btn"]).with_children(vec![label]))
//! });
//!
//! let wire = to_json(&tree);
//! assert_eq!(wire, json!({
//!     "tag": "button",
//!     "attrs": {"class": ["btn"]},
//!     "children": [{"text": "Save"}]
//! }));
//! assert_eq!(from_json(&wire).unwrap(), tree);
//! ```

pub mod codec;
pub mod error;
pub mod tree;
pub mod types;

pub use error::TreeError;
pub use tree::Tree;
pub use types::{
    is_empty_meta, Attributes, Component, Element, Fragment, Handler, HandlerOptions, Kind, Node,
    NodeId, StyleMap, Stylesheet,
};
