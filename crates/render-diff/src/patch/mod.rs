//! Render patches: the instruction vocabulary shipped to clients.
//!
//! # Operations
//!
//! Node facets: `setText`, `setComment`, `setAttr`, `delAttr`, `setStyle`,
//! `delStyle`, `setStyleDecl`, `delStyleDecl`, `setHandlers`, `setRef`,
//! `delRef`, `setRouter`, `delRouter`, `setUpload`, `delUpload`,
//! `setComponent`.
//!
//! Structure: `replaceNode`, `addChild`, `delChild`, `moveChild`.

pub mod apply;
pub mod codec;
pub mod types;

pub use apply::{apply_op, apply_patch};
pub use codec::json::{from_json, from_json_patch, to_json, to_json_patch};
pub use types::{ApplyOptions, Op, Patch, PatchError, Path, RawPatch};
