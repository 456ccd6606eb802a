//! Placement engine: the live set of objects on the desk
//!
//! This module owns every placed object, the selection, and the active pointer
//! gesture. Operations are split by concern:
//! - `object_ops`: create, delete, clear, layout import/export
//! - `drag_ops`: picking and pointer gestures (drag, rotate)
//! - `transform_ops`: discrete rotate and rescale

mod drag_ops;
mod object_ops;
mod transform_ops;

pub use drag_ops::PickHit;

use std::fmt;

use glam::DVec3;
use shared::{ObjectSpec, Rgb, Size3};

use crate::selection::SelectionState;
use crate::viewport::picking::{yawed_half_extents, Aabb, Plane};

/// Opaque handle to a placed object. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Rebuild a handle received from a host (e.g. JavaScript). Unknown handles
    /// are harmless: every operation on them is a no-op.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj-{}", self.0)
    }
}

/// An object instance on the desk
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub id: ObjectId,
    pub position: DVec3,
    /// Yaw in radians; unbounded
    pub rotation_y: f64,
    pub scale: DVec3,
    /// Unscaled box size the object was created with
    pub base_size: Size3,
    pub color: Rgb,
}

impl PlacedObject {
    fn from_spec(id: ObjectId, spec: &ObjectSpec) -> Self {
        Self {
            id,
            position: spec.position.into(),
            rotation_y: spec.rotation_y,
            scale: spec.scale.into(),
            base_size: spec.base_size,
            color: spec.color,
        }
    }

    /// Value snapshot for persistence
    pub fn spec(&self) -> ObjectSpec {
        ObjectSpec {
            position: self.position.into(),
            rotation_y: self.rotation_y,
            scale: self.scale.into(),
            base_size: self.base_size,
            color: self.color,
        }
    }

    /// Scaled size along the object's own axes
    pub fn size(&self) -> DVec3 {
        self.base_size.as_dvec3() * self.scale
    }

    /// Half extents along the object's own axes
    pub fn local_half_extents(&self) -> DVec3 {
        self.size() * 0.5
    }

    /// Half extents of the world axis-aligned box around the rotated, scaled object
    pub fn world_half_extents(&self) -> DVec3 {
        yawed_half_extents(self.local_half_extents(), self.rotation_y)
    }

    pub fn world_aabb(&self) -> Aabb {
        Aabb::from_center_half(self.position, self.world_half_extents())
    }

    /// The eight box corners in world space (bottom four first)
    pub fn corners(&self) -> [DVec3; 8] {
        let h = self.local_half_extents();
        let (sin, cos) = self.rotation_y.sin_cos();
        let mut out = [DVec3::ZERO; 8];
        for (i, corner) in out.iter_mut().enumerate() {
            let local = DVec3::new(
                if i & 1 == 0 { -h.x } else { h.x },
                if i < 4 { -h.y } else { h.y },
                if i & 2 == 0 { -h.z } else { h.z },
            );
            let rotated = DVec3::new(
                cos * local.x + sin * local.z,
                local.y,
                -sin * local.x + cos * local.z,
            );
            *corner = self.position + rotated;
        }
        out
    }
}

/// The pointer gesture in progress. Only one can be active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Moving an object in the horizontal plane through the grab point
    Dragging { id: ObjectId, plane: Plane },
    /// Turning an object by horizontal pointer motion
    Rotating { id: ObjectId, last_x: f64 },
}

impl Gesture {
    pub fn target(&self) -> Option<ObjectId> {
        match self {
            Gesture::Idle => None,
            Gesture::Dragging { id, .. } | Gesture::Rotating { id, .. } => Some(*id),
        }
    }
}

/// Owner of the placed objects, the selection and the active gesture
#[derive(Debug, Default)]
pub struct PlacementEngine {
    objects: Vec<PlacedObject>,
    selection: SelectionState,
    gesture: Gesture,
    next_id: u64,
    /// Monotonically increasing version counter, bumped on every mutation
    version: u64,
}

impl PlacementEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Objects in creation order
    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: ObjectId) -> Option<&mut PlacedObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    // ── Selection ─────────────────────────────────────────────

    pub fn selected_id(&self) -> Option<ObjectId> {
        self.selection.primary()
    }

    pub fn selected(&self) -> Option<&PlacedObject> {
        self.get(self.selection.primary()?)
    }

    pub fn selection_version(&self) -> u64 {
        self.selection.version()
    }

    /// Select a live object. Returns false (and changes nothing) for stale handles.
    pub fn select(&mut self, id: ObjectId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selection.select(id);
        true
    }

    pub fn deselect(&mut self) {
        self.selection.clear();
    }

    // ── Gesture state ─────────────────────────────────────────

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    fn allocate_id(&mut self) -> ObjectId {
        self.next_id += 1;
        ObjectId(self.next_id)
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Point3;

    #[test]
    fn test_spec_round_trip() {
        let spec = ObjectSpec {
            position: Point3::new(0.1, 0.8, -0.2),
            rotation_y: 0.3,
            scale: Point3::new(2.0, 1.0, 3.0),
            base_size: Size3::new(0.1, 0.2, 0.3),
            color: Rgb(0x123456),
        };
        let obj = PlacedObject::from_spec(ObjectId(1), &spec);
        assert_eq!(obj.spec(), spec);
    }

    #[test]
    fn test_world_half_extents_respect_scale_and_yaw() {
        let spec = ObjectSpec {
            position: Point3::default(),
            rotation_y: std::f64::consts::FRAC_PI_2,
            scale: Point3::new(2.0, 1.0, 1.0),
            base_size: Size3::new(0.1, 0.1, 0.04),
            color: Rgb(0),
        };
        let obj = PlacedObject::from_spec(ObjectId(1), &spec);
        let e = obj.world_half_extents();
        assert!((e.x - 0.02).abs() < 1e-12);
        assert!((e.z - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_corners_span_aabb() {
        let spec = ObjectSpec {
            position: Point3::new(0.0, 1.0, 0.0),
            rotation_y: 0.4,
            scale: Point3::ONE,
            base_size: Size3::new(0.3, 0.1, 0.2),
            color: Rgb(0),
        };
        let obj = PlacedObject::from_spec(ObjectId(1), &spec);
        let aabb = obj.world_aabb();
        let max_x = obj.corners().iter().map(|c| c.x).fold(f64::MIN, f64::max);
        assert!((max_x - aabb.max.x).abs() < 1e-12);
    }

    #[test]
    fn test_object_id_display() {
        assert_eq!(ObjectId(12).to_string(), "obj-12");
        assert_eq!(ObjectId::from_raw(3).raw(), 3);
    }
}
