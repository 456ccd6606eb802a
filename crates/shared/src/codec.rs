//! Layout codec: live state ⇄ persisted `LayoutRecord`.
//!
//! `encode` is a plain copy and never fails. `decode` works on loosely typed
//! JSON so that records written by older builds (which used `size` and a full
//! `rotation` object) and records with extra fields still load.

use serde::Deserialize;
use serde_json::Value;

use crate::{DeskParams, LayoutRecord, ObjectSpec, Point3, Rgb, Size3, MAX_COLOR, MAX_DESK_EDGE};

/// The record could not be interpreted as a layout
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("malformed layout record: {0}")]
pub struct MalformedRecord(pub String);

/// Build the persisted form of a desk and its objects.
pub fn encode(desk: DeskParams, objects: &[ObjectSpec]) -> LayoutRecord {
    LayoutRecord {
        desk,
        objects: objects.to_vec(),
    }
}

/// Parse a JSON document and decode it.
pub fn decode_str(json: &str) -> Result<(DeskParams, Vec<ObjectSpec>), MalformedRecord> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| MalformedRecord(format!("invalid JSON: {e}")))?;
    decode(&value)
}

/// Split a layout document into desk parameters and object specs.
pub fn decode(value: &Value) -> Result<(DeskParams, Vec<ObjectSpec>), MalformedRecord> {
    let root = value
        .as_object()
        .ok_or_else(|| MalformedRecord("expected a JSON object".into()))?;

    let desk = root
        .get("desk")
        .and_then(Value::as_object)
        .ok_or_else(|| MalformedRecord("missing desk".into()))?;
    let width = desk_dimension(desk, "width")?;
    let depth = desk_dimension(desk, "depth")?;

    let entries = root
        .get("objects")
        .and_then(Value::as_array)
        .ok_or_else(|| MalformedRecord("objects must be a sequence".into()))?;

    let objects = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| decode_object(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((DeskParams { width, depth }, objects))
}

/// Decode a typed record (already trusted to have the right shape) by way of
/// its JSON value, so the same validation applies.
pub fn decode_record(record: &LayoutRecord) -> Result<(DeskParams, Vec<ObjectSpec>), MalformedRecord> {
    let value = serde_json::to_value(record).map_err(|e| MalformedRecord(e.to_string()))?;
    decode(&value)
}

fn desk_dimension(desk: &serde_json::Map<String, Value>, key: &str) -> Result<f64, MalformedRecord> {
    let value = desk
        .get(key)
        .ok_or_else(|| MalformedRecord(format!("missing desk.{key}")))?
        .as_f64()
        .ok_or_else(|| MalformedRecord(format!("desk.{key} is not a number")))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(MalformedRecord(format!("desk.{key} must be positive, got {value}")));
    }
    if value > MAX_DESK_EDGE {
        return Err(MalformedRecord(format!(
            "desk.{key} must be at most {MAX_DESK_EDGE} m, got {value}"
        )));
    }
    Ok(value)
}

/// Legacy `rotation: {x, y, z}`; only yaw is meaningful on a desk.
#[derive(Deserialize)]
struct LegacyRotation {
    #[serde(default)]
    y: f64,
}

#[derive(Deserialize)]
struct ObjectEntry {
    position: Point3,
    #[serde(rename = "rotationY", default)]
    rotation_y: Option<f64>,
    #[serde(default)]
    rotation: Option<LegacyRotation>,
    #[serde(default = "unit_scale")]
    scale: Point3,
    #[serde(rename = "baseSize", alias = "size", default)]
    base_size: Size3,
    #[serde(default)]
    color: Rgb,
}

fn unit_scale() -> Point3 {
    Point3::ONE
}

fn decode_object(index: usize, entry: &Value) -> Result<ObjectSpec, MalformedRecord> {
    let entry = ObjectEntry::deserialize(entry)
        .map_err(|e| MalformedRecord(format!("objects[{index}]: {e}")))?;

    if !entry.base_size.is_valid() {
        return Err(MalformedRecord(format!(
            "objects[{index}]: base size must be positive"
        )));
    }
    let scale_ok = [entry.scale.x, entry.scale.y, entry.scale.z]
        .iter()
        .all(|s| s.is_finite() && *s > 0.0);
    if !scale_ok {
        return Err(MalformedRecord(format!(
            "objects[{index}]: scale must be positive"
        )));
    }

    if entry.color.0 > MAX_COLOR {
        return Err(MalformedRecord(format!(
            "objects[{index}]: color {:#x} is not a 24-bit RGB value",
            entry.color.0
        )));
    }

    let rotation_y = entry
        .rotation_y
        .or_else(|| entry.rotation.map(|r| r.y))
        .unwrap_or(0.0);

    Ok(ObjectSpec {
        position: entry.position,
        rotation_y,
        scale: entry.scale,
        base_size: entry.base_size,
        color: entry.color,
    })
}
