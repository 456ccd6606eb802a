//! Object lifecycle: create, delete, clear, layout import/export

use shared::{ObjectSpec, Point3};

use super::{Gesture, ObjectId, PlacedObject, PlacementEngine};
use crate::catalog::CatalogTemplate;
use crate::error::EditorError;
use crate::surface::SurfaceModel;

impl PlacementEngine {
    /// Place a new object from the selected catalog template at the desk centre,
    /// resting on the desk top.
    pub fn add_from_template(
        &mut self,
        surface: &SurfaceModel,
        template: Option<&CatalogTemplate>,
    ) -> Result<ObjectId, EditorError> {
        let top_y = surface.top_y().ok_or(EditorError::NoSurface)?;
        let template = template.ok_or(EditorError::NoSelection)?;

        let position = Point3::new(0.0, top_y + template.size.h / 2.0, 0.0);
        let id = self.create_object(&ObjectSpec::new(position, template.size, template.color));
        tracing::debug!("Placed '{}' as {id}", template.id);
        Ok(id)
    }

    /// Add an object exactly as described; no validation against the desk
    pub fn create_object(&mut self, spec: &ObjectSpec) -> ObjectId {
        let id = self.allocate_id();
        self.objects.push(PlacedObject::from_spec(id, spec));
        self.bump();
        id
    }

    /// Replace every object with the given specs
    pub fn apply_layout(&mut self, specs: &[ObjectSpec]) -> Vec<ObjectId> {
        self.clear_all();
        let ids = specs.iter().map(|spec| self.create_object(spec)).collect();
        tracing::info!("Applied layout with {} objects", specs.len());
        ids
    }

    /// Remove an object. Clears the selection first if it was selected and
    /// abandons any gesture on it. Returns false for stale handles.
    pub fn delete(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.objects.iter().position(|o| o.id == id) else {
            return false;
        };
        if self.selection.is_selected(id) {
            self.selection.clear();
        }
        if self.gesture.target() == Some(id) {
            self.gesture = Gesture::Idle;
        }
        self.objects.remove(index);
        self.bump();
        tracing::debug!("Deleted {id}");
        true
    }

    /// Remove every object and clear the selection
    pub fn clear_all(&mut self) {
        self.selection.clear();
        self.gesture = Gesture::Idle;
        if !self.objects.is_empty() {
            self.objects.clear();
            self.bump();
        }
    }

    /// Value snapshots of every object, in creation order
    pub fn export_state(&self) -> Vec<ObjectSpec> {
        self.objects.iter().map(PlacedObject::spec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use shared::Size3;

    fn desk() -> SurfaceModel {
        let mut s = SurfaceModel::new(0.7);
        s.create(1.2, 0.6).unwrap();
        s
    }

    #[test]
    fn test_add_default_cube_height() {
        let catalog = Catalog::builtin();
        let mut e = PlacementEngine::new();
        let id = e
            .add_from_template(&desk(), catalog.get("default-cube"))
            .unwrap();
        let obj = e.get(id).unwrap();
        assert!((obj.position.y - 0.735).abs() < 1e-12);
        assert_eq!(obj.position.x, 0.0);
        assert_eq!(obj.position.z, 0.0);
        assert_eq!(obj.rotation_y, 0.0);
        assert_eq!(obj.scale, glam::DVec3::ONE);
    }

    #[test]
    fn test_add_without_surface() {
        let catalog = Catalog::builtin();
        let mut e = PlacementEngine::new();
        let err = e
            .add_from_template(&SurfaceModel::new(0.7), catalog.get("default-cube"))
            .unwrap_err();
        assert_eq!(err, EditorError::NoSurface);
        assert!(e.is_empty());
    }

    #[test]
    fn test_add_without_selection() {
        let mut e = PlacementEngine::new();
        assert_eq!(e.add_from_template(&desk(), None), Err(EditorError::NoSelection));
        assert!(e.is_empty());
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut e = PlacementEngine::new();
        let a = e.create_object(&ObjectSpec::new(Point3::default(), Size3::default_cube(), Default::default()));
        let b = e.create_object(&ObjectSpec::new(Point3::default(), Size3::default_cube(), Default::default()));
        e.select(a);
        assert!(e.delete(b));
        assert_eq!(e.selected_id(), Some(a));
        assert!(e.delete(a));
        assert_eq!(e.selected_id(), None);
        assert!(!e.delete(a));
    }

    #[test]
    fn test_clear_all() {
        let mut e = PlacementEngine::new();
        let a = e.create_object(&ObjectSpec::new(Point3::default(), Size3::default_cube(), Default::default()));
        e.select(a);
        e.clear_all();
        assert!(e.is_empty());
        assert!(e.selected().is_none());
    }

    #[test]
    fn test_apply_layout_replaces_and_preserves_values() {
        let mut e = PlacementEngine::new();
        e.create_object(&ObjectSpec::new(Point3::default(), Size3::default_cube(), Default::default()));
        let specs = vec![ObjectSpec {
            position: Point3::new(5.0, -1.0, 9.0),
            rotation_y: 12.0,
            scale: Point3::new(0.5, 2.0, 1.5),
            base_size: Size3::new(0.6, 0.35, 0.05),
            color: shared::Rgb(0x222222),
        }];
        let ids = e.apply_layout(&specs);
        assert_eq!(ids.len(), 1);
        assert_eq!(e.len(), 1);
        assert_eq!(e.export_state(), specs);
    }

    #[test]
    fn test_ids_not_reused() {
        let mut e = PlacementEngine::new();
        let a = e.create_object(&ObjectSpec::new(Point3::default(), Size3::default_cube(), Default::default()));
        e.delete(a);
        let b = e.create_object(&ObjectSpec::new(Point3::default(), Size3::default_cube(), Default::default()));
        assert_ne!(a, b);
    }
}
