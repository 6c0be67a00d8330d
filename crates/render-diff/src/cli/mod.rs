//! `render-diff` command-line tool.
//!
//! Provides the core logic used by the binary entry point:
//! - `diff`: patch list between two wire trees
//! - `mount`: first-mount metadata patches for one wire tree
//! - `apply`: apply a wire patch list to a wire tree

use std::io::Read;

use render_tree::codec::json as tree_json;
use render_tree::TreeError;
use serde_json::Value;
use thiserror::Error;

use crate::diff::{diff_with, DiffOptions};
use crate::metadata::extract_metadata;
use crate::patch::codec::json::{from_json_patch, to_json_patch};
use crate::patch::{apply_patch, ApplyOptions, PatchError};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tree: {0}")]
    Tree(#[from] TreeError),
    #[error("invalid patch: {0}")]
    Patch(#[from] PatchError),
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Read a whole input file; `-` reads standard input.
pub fn read_input(path: &str) -> Result<String, CliError> {
    let io = |source| CliError::Io {
        path: path.to_string(),
        source,
    };
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(io)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).map_err(io)
    }
}

// ── Commands ──────────────────────────────────────────────────────────────

/// Diff two wire trees and return the wire patch list.
pub fn diff_json(prev: &str, next: &str, options: &DiffOptions) -> Result<Value, CliError> {
    let prev = tree_json::from_json(&serde_json::from_str(prev)?)?;
    let next = tree_json::from_json(&serde_json::from_str(next)?)?;
    Ok(to_json_patch(&diff_with(&prev, &next, options)))
}

/// Extract the first-mount metadata patches of a wire tree.
pub fn mount_json(tree: &str) -> Result<Value, CliError> {
    let tree = tree_json::from_json(&serde_json::from_str(tree)?)?;
    Ok(to_json_patch(&extract_metadata(&tree)))
}

/// Apply a wire patch list to a wire tree and return the resulting tree.
pub fn apply_json(tree: &str, patches: &str) -> Result<Value, CliError> {
    let tree = tree_json::from_json(&serde_json::from_str(tree)?)?;
    let patches = from_json_patch(&serde_json::from_str(patches)?)?;
    let out = apply_patch(tree, &patches, &ApplyOptions { compact: true })?;
    Ok(tree_json::to_json(&out))
}

/// Render a JSON value for output.
pub fn render(value: &Value, pretty: bool) -> Result<String, CliError> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────
