//! Render tree reconciliation.
//!
//! [`diff`] compares two [`render_tree::Tree`]s and produces an ordered list
//! of [`Patch`]es which, replayed in `seq` order by a client, turn the first
//! tree into the second. [`extract_metadata`] produces the handler, ref,
//! router and upload patches for a first mount. [`patch::apply_patch`] is a
//! reference applier used to check that patch lists replay correctly.
//!
//! # Example
//!
//! ```
//! use render_diff::{diff, patch::{apply_patch, ApplyOptions}};
//! use render_tree::codec::json::from_json;
//! use serde_json::json;
//!
//! let prev = from_json(&json!({"tag": "ul", "children": [
//!     {"tag": "li", "key": "a"}, {"tag": "li", "key": "b"}
//! ]})).unwrap();
//! let next = from_json(&json!({"tag": "ul", "children": [
//!     {"tag": "li", "key": "b"}, {"tag": "li", "key": "a"}
//! ]})).unwrap();
//!
//! let patches = diff(&prev, &next);
//! assert_eq!(patches.len(), 1);
//! assert_eq!(patches[0].op_name(), "moveChild");
//!
//! let out = apply_patch(prev, &patches, &ApplyOptions::default()).unwrap();
//! assert_eq!(out, next);
//! ```

pub mod cli;
pub mod diff;
pub mod metadata;
pub mod patch;
pub mod sequence;

pub use diff::{diff, diff_raw, diff_with, DiffOptions};
pub use metadata::extract_metadata;
pub use patch::{Op, Patch, PatchError, Path, RawPatch};
pub use sequence::{is_sequenced, sequence};
