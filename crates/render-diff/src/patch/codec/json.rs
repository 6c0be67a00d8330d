//! JSON codec for render patches.
//!
//! Wire shape: `{"seq": 0, "path": [0, 2], "op": "setAttr", ...payload}` with
//! payload keys `value`, `name`, `selector` and `index`. Keyed child ops
//! carry their key inside `value`: `{"key": k}` for `delChild`,
//! `{"key": k, "newIdx": i}` for `moveChild`.

use render_tree::codec::json as tree_json;
use serde_json::{json, Map, Value};

use crate::patch::types::{Op, Patch, PatchError};

// ── Helpers ───────────────────────────────────────────────────────────────

fn invalid(msg: &str) -> PatchError {
    PatchError::InvalidOp(msg.to_string())
}

fn field<'a>(obj: &'a Map<String, Value>, name: &str) -> Result<&'a Value, PatchError> {
    obj.get(name)
        .ok_or_else(|| PatchError::InvalidOp(format!("missing {name}")))
}

fn str_field(obj: &Map<String, Value>, name: &str) -> Result<String, PatchError> {
    field(obj, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PatchError::InvalidOp(format!("{name} must be a string")))
}

fn index_field(obj: &Map<String, Value>) -> Result<usize, PatchError> {
    field(obj, "index")?
        .as_u64()
        .map(|i| i as usize)
        .ok_or_else(|| invalid("index must be a non-negative integer"))
}

fn decode_path(v: &Value) -> Result<Vec<usize>, PatchError> {
    v.as_array()
        .ok_or_else(|| invalid("path must be an array"))?
        .iter()
        .map(|step| {
            step.as_u64()
                .map(|i| i as usize)
                .ok_or_else(|| invalid("path steps must be non-negative integers"))
        })
        .collect()
}

fn value_key(obj: &Map<String, Value>) -> Option<String> {
    obj.get("value")
        .and_then(|v| v.get("key"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize a `Patch` to its wire form.
pub fn to_json(patch: &Patch) -> Value {
    let mut m = Map::new();
    m.insert("seq".into(), json!(patch.seq));
    m.insert("path".into(), json!(patch.path));
    m.insert("op".into(), json!(patch.op.op_name()));
    match &patch.op {
        Op::SetText { value } | Op::SetComment { value } | Op::SetRef { value } => {
            m.insert("value".into(), json!(value));
        }
        Op::SetComponent { value } => {
            m.insert("value".into(), json!(value));
        }
        Op::SetAttr { value } => {
            m.insert("value".into(), tree_json::attrs_to_json(value));
        }
        Op::SetStyle { value } => {
            m.insert("value".into(), tree_json::style_to_json(value));
        }
        Op::DelAttr { name } | Op::DelStyle { name } => {
            m.insert("name".into(), json!(name));
        }
        Op::SetStyleDecl {
            selector,
            name,
            value,
        } => {
            m.insert("selector".into(), json!(selector));
            m.insert("name".into(), json!(name));
            m.insert("value".into(), json!(value));
        }
        Op::DelStyleDecl { selector, name } => {
            m.insert("selector".into(), json!(selector));
            m.insert("name".into(), json!(name));
        }
        Op::SetHandlers { value } => {
            m.insert("value".into(), tree_json::handlers_to_json(value));
        }
        Op::SetRouter { value } | Op::SetUpload { value } => {
            m.insert("value".into(), value.clone());
        }
        Op::DelRef | Op::DelRouter | Op::DelUpload => {}
        Op::ReplaceNode { value } => {
            m.insert("value".into(), tree_json::to_json(value));
        }
        Op::AddChild { index, value } => {
            m.insert("index".into(), json!(index));
            m.insert("value".into(), tree_json::to_json(value));
        }
        Op::DelChild { index, key } => {
            m.insert("index".into(), json!(index));
            if let Some(k) = key {
                m.insert("value".into(), json!({ "key": k }));
            }
        }
        Op::MoveChild { index, key } => {
            m.insert("index".into(), json!(index));
            m.insert("value".into(), json!({ "key": key, "newIdx": index }));
        }
    }
    Value::Object(m)
}

/// Serialize a patch list to a JSON array.
pub fn to_json_patch(patches: &[Patch]) -> Value {
    Value::Array(patches.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize a `Patch` from its wire form.
pub fn from_json(v: &Value) -> Result<Patch, PatchError> {
    let obj = v
        .as_object()
        .ok_or_else(|| invalid("patch must be an object"))?;
    let seq = field(obj, "seq")?
        .as_u64()
        .ok_or_else(|| invalid("seq must be a non-negative integer"))? as usize;
    let path = decode_path(field(obj, "path")?)?;
    let name = str_field(obj, "op")?;

    let op = match name.as_str() {
        "setText" => Op::SetText { value: str_field(obj, "value")? },
        "setComment" => Op::SetComment { value: str_field(obj, "value")? },
        "setRef" => Op::SetRef { value: str_field(obj, "value")? },
        "setComponent" => Op::SetComponent { value: str_field(obj, "value")? },
        "setAttr" => Op::SetAttr { value: tree_json::attrs_from_json(field(obj, "value")?)? },
        "setStyle" => Op::SetStyle { value: tree_json::style_from_json(field(obj, "value")?)? },
        "delAttr" => Op::DelAttr { name: str_field(obj, "name")? },
        "delStyle" => Op::DelStyle { name: str_field(obj, "name")? },
        "setStyleDecl" => Op::SetStyleDecl {
            selector: str_field(obj, "selector")?,
            name: str_field(obj, "name")?,
            value: str_field(obj, "value")?,
        },
        "delStyleDecl" => Op::DelStyleDecl {
            selector: str_field(obj, "selector")?,
            name: str_field(obj, "name")?,
        },
        "setHandlers" => Op::SetHandlers {
            value: tree_json::handlers_from_json(field(obj, "value")?)?,
        },
        "setRouter" => Op::SetRouter { value: field(obj, "value")?.clone() },
        "setUpload" => Op::SetUpload { value: field(obj, "value")?.clone() },
        "delRef" => Op::DelRef,
        "delRouter" => Op::DelRouter,
        "delUpload" => Op::DelUpload,
        "replaceNode" => Op::ReplaceNode {
            value: tree_json::from_json(obj.get("value").unwrap_or(&Value::Null))?,
        },
        "addChild" => Op::AddChild {
            index: index_field(obj)?,
            value: tree_json::from_json(field(obj, "value")?)?,
        },
        "delChild" => Op::DelChild {
            index: index_field(obj)?,
            key: value_key(obj),
        },
        "moveChild" => Op::MoveChild {
            index: index_field(obj)?,
            key: value_key(obj).ok_or_else(|| invalid("moveChild requires value.key"))?,
        },
        other => return Err(PatchError::InvalidOp(format!("unknown op: {other}"))),
    };
    Ok(Patch { seq, path, op })
}

/// Deserialize a JSON array of patches.
pub fn from_json_patch(v: &Value) -> Result<Vec<Patch>, PatchError> {
    v.as_array()
        .ok_or_else(|| invalid("patch list must be an array"))?
        .iter()
        .map(from_json)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────
