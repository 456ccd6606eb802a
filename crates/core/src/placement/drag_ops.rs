//! Picking and pointer gestures

use glam::DVec3;

use super::{Gesture, ObjectId, PlacementEngine};
use crate::surface::SurfaceModel;
use crate::viewport::picking::{ray_plane, ray_yawed_box, Plane, Ray};

/// Result of a pick: the nearest object under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub id: ObjectId,
    /// World-space point where the ray enters the object
    pub point: DVec3,
    pub distance: f64,
}

impl PlacementEngine {
    /// Nearest object whose box the ray hits
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        let mut best: Option<PickHit> = None;

        for obj in &self.objects {
            let hit = ray_yawed_box(ray, obj.position, obj.local_half_extents(), obj.rotation_y);
            if let Some(dist) = hit {
                if best.as_ref().map_or(true, |b| dist < b.distance) {
                    best = Some(PickHit {
                        id: obj.id,
                        point: ray.at(dist),
                        distance: dist,
                    });
                }
            }
        }

        best
    }

    /// Start dragging `id` in the horizontal plane through `grab_point`.
    /// Returns false if another gesture is active or the object is gone.
    pub fn begin_drag(&mut self, id: ObjectId, grab_point: DVec3) -> bool {
        if self.is_gesture_active() || !self.contains(id) {
            return false;
        }
        self.gesture = Gesture::Dragging {
            id,
            plane: Plane::horizontal_through(grab_point),
        };
        tracing::debug!("Drag started on {id} at y={:.3}", grab_point.y);
        true
    }

    /// Move the dragged object to where `ray` meets the drag plane, clamped to
    /// the desk. The object's height never changes. Returns the moved object.
    pub fn update_drag(&mut self, ray: &Ray, surface: &SurfaceModel, margin: f64) -> Option<ObjectId> {
        let Gesture::Dragging { id, plane } = self.gesture else {
            return None;
        };
        let target = ray_plane(ray, &plane)?;
        let obj = self.get_mut(id)?;

        let half = obj.world_half_extents();
        let (x, z) = match surface.bounds(half.x, half.z, margin) {
            Some(bounds) => bounds.clamp(target.x, target.z),
            None => (target.x, target.z),
        };
        obj.position.x = x;
        obj.position.z = z;
        self.bump();
        Some(id)
    }

    /// Start turning `id`; `pointer_x` is the horizontal pointer position.
    pub fn begin_rotate(&mut self, id: ObjectId, pointer_x: f64) -> bool {
        if self.is_gesture_active() || !self.contains(id) {
            return false;
        }
        self.gesture = Gesture::Rotating {
            id,
            last_x: pointer_x,
        };
        true
    }

    /// Turn the object by the horizontal pointer motion since the last update
    pub fn update_rotate(&mut self, pointer_x: f64, speed: f64) -> Option<ObjectId> {
        let Gesture::Rotating { id, last_x } = self.gesture else {
            return None;
        };
        self.gesture = Gesture::Rotating {
            id,
            last_x: pointer_x,
        };
        self.rotate(id, (pointer_x - last_x) * speed).then_some(id)
    }

    /// End whatever gesture is active. Returns true if one was.
    pub fn end_gesture(&mut self) -> bool {
        let was_active = self.is_gesture_active();
        self.gesture = Gesture::Idle;
        was_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ObjectSpec, Point3, Rgb, Size3};

    fn desk() -> SurfaceModel {
        let mut s = SurfaceModel::new(0.7);
        s.create(1.2, 0.6).unwrap();
        s
    }

    fn cube_at(e: &mut PlacementEngine, x: f64, y: f64, z: f64) -> ObjectId {
        e.create_object(&ObjectSpec::new(Point3::new(x, y, z), Size3::default_cube(), Rgb(0)))
    }

    fn down_at(x: f64, z: f64) -> Ray {
        Ray::new(DVec3::new(x, 3.0, z), DVec3::NEG_Y)
    }

    /// Ray from above that meets the plane y=0.735 at (x, z)
    fn slanted_to(x: f64, z: f64) -> Ray {
        let target = DVec3::new(x, 0.735, z);
        let origin = target + DVec3::new(0.3, 1.0, 0.2);
        Ray::new(origin, target - origin)
    }

    #[test]
    fn test_pick_nearest_of_stacked() {
        let mut e = PlacementEngine::new();
        let low = cube_at(&mut e, 0.0, 0.735, 0.0);
        let high = cube_at(&mut e, 0.0, 0.9, 0.0);
        let hit = e.pick(&down_at(0.0, 0.0)).unwrap();
        assert_eq!(hit.id, high);
        assert!((hit.point.y - 0.925).abs() < 1e-9);
        let hit = e.pick(&Ray::new(DVec3::new(0.0, -3.0, 0.0), DVec3::Y)).unwrap();
        assert_eq!(hit.id, low);
    }

    #[test]
    fn test_pick_miss() {
        let mut e = PlacementEngine::new();
        cube_at(&mut e, 0.0, 0.735, 0.0);
        assert!(e.pick(&down_at(0.2, 0.0)).is_none());
    }

    #[test]
    fn test_drag_inside_bounds_is_identity() {
        let surface = desk();
        let mut e = PlacementEngine::new();
        let id = cube_at(&mut e, 0.0, 0.735, 0.0);
        assert!(e.begin_drag(id, DVec3::new(0.0, 0.735, 0.0)));
        e.update_drag(&slanted_to(0.1, -0.05), &surface, 0.05).unwrap();
        let p = e.get(id).unwrap().position;
        assert!((p.x - 0.1).abs() < 1e-9);
        assert!((p.z + 0.05).abs() < 1e-9);
        assert_eq!(p.y, 0.735);
    }

    #[test]
    fn test_drag_outside_lands_on_boundary() {
        let surface = desk();
        let mut e = PlacementEngine::new();
        let id = cube_at(&mut e, 0.0, 0.735, 0.0);
        e.begin_drag(id, DVec3::new(0.0, 0.735, 0.0));

        e.update_drag(&slanted_to(5.0, 5.0), &surface, 0.05);
        let p = e.get(id).unwrap().position;
        assert!((p.x - (0.6 + 0.05 - 0.025)).abs() < 1e-12);
        assert!((p.z - (0.3 + 0.05 - 0.025)).abs() < 1e-12);

        e.update_drag(&slanted_to(-5.0, -5.0), &surface, 0.05);
        let p = e.get(id).unwrap().position;
        assert!((p.x - (-0.6 + 0.05 + 0.025 - 0.1)).abs() < 1e-12);
        assert!((p.z - (-0.3 + 0.05 + 0.025 - 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_drag_uses_rotated_extents() {
        let surface = desk();
        let mut e = PlacementEngine::new();
        let id = e.create_object(&ObjectSpec {
            position: Point3::new(0.0, 0.885, 0.0),
            rotation_y: std::f64::consts::FRAC_PI_2,
            scale: Point3::ONE,
            base_size: Size3::new(0.6, 0.35, 0.05),
            color: Rgb(0),
        });
        e.begin_drag(id, DVec3::new(0.0, 0.885, 0.0));
        let far = Ray::new(DVec3::new(5.0, 1.885, 5.0), DVec3::new(0.0, -1.0, 0.0));
        e.update_drag(&far, &surface, 0.05);
        let p = e.get(id).unwrap().position;
        // Rotated a quarter turn: half width 0.025, half depth 0.3
        assert!((p.x - (0.6 + 0.05 - 0.025)).abs() < 1e-9);
        assert!((p.z - (0.3 + 0.05 - 0.3)).abs() < 1e-9);
    }

    #[test]
    fn test_drag_without_surface_is_unclamped() {
        let mut e = PlacementEngine::new();
        let id = cube_at(&mut e, 0.0, 0.735, 0.0);
        e.begin_drag(id, DVec3::new(0.0, 0.735, 0.0));
        e.update_drag(&slanted_to(5.0, 5.0), &SurfaceModel::new(0.7), 0.05);
        assert!((e.get(id).unwrap().position.x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_gestures_are_exclusive() {
        let mut e = PlacementEngine::new();
        let a = cube_at(&mut e, 0.0, 0.735, 0.0);
        let b = cube_at(&mut e, 0.2, 0.735, 0.0);
        assert!(e.begin_drag(a, DVec3::ZERO));
        assert!(!e.begin_drag(b, DVec3::ZERO));
        assert!(!e.begin_rotate(b, 0.0));
        assert_eq!(e.gesture().target(), Some(a));
        assert!(e.end_gesture());
        assert!(!e.end_gesture());
        assert!(e.begin_rotate(b, 10.0));
    }

    #[test]
    fn test_update_without_gesture_is_noop() {
        let surface = desk();
        let mut e = PlacementEngine::new();
        let id = cube_at(&mut e, 0.0, 0.735, 0.0);
        assert!(e.update_drag(&slanted_to(0.1, 0.1), &surface, 0.05).is_none());
        assert!(e.update_rotate(40.0, 0.01).is_none());
        assert_eq!(e.get(id).unwrap().position.x, 0.0);
    }

    #[test]
    fn test_rotate_gesture() {
        let mut e = PlacementEngine::new();
        let id = cube_at(&mut e, 0.0, 0.735, 0.0);
        e.begin_rotate(id, 100.0);
        e.update_rotate(150.0, 0.01);
        e.update_rotate(130.0, 0.01);
        assert!((e.get(id).unwrap().rotation_y - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_delete_during_drag_ends_gesture() {
        let mut e = PlacementEngine::new();
        let id = cube_at(&mut e, 0.0, 0.735, 0.0);
        e.begin_drag(id, DVec3::ZERO);
        e.delete(id);
        assert!(!e.is_gesture_active());
    }
}
