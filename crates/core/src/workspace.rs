//! Application wiring: owns every component and turns shell input into
//! placement operations.

use glam::DVec3;
use shared::codec::decode_record;
use shared::{encode, DeskParams, LayoutRecord, ObjectSpec};

use crate::catalog::{Catalog, CatalogTemplate};
use crate::error::EditorError;
use crate::placement::{Gesture, ObjectId, PlacementEngine};
use crate::settings::PlacementSettings;
use crate::shell::PresentationShell;
use crate::surface::SurfaceModel;
use crate::viewport::camera::{OrbitCamera, ScreenPoint, ViewportRect};

/// Keyboard actions the shell maps its own key bindings onto
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyCommand {
    DeleteSelected,
    /// Turn the selected object by this many radians
    RotateSelected(f64),
    Deselect,
}

/// The editor: catalog, desk, objects, camera, and the shell notified of changes
pub struct Workspace<S: PresentationShell> {
    settings: PlacementSettings,
    catalog: Catalog,
    surface: SurfaceModel,
    engine: PlacementEngine,
    pub camera: OrbitCamera,
    pub shell: S,
}

impl<S: PresentationShell> Workspace<S> {
    /// Build the editor with the default desk and the starter object on it
    pub fn start(settings: PlacementSettings, catalog: Catalog, shell: S) -> Self {
        let mut ws = Self::empty(settings, catalog, shell);
        let (w, d) = (ws.settings.default_desk_width, ws.settings.default_desk_depth);
        if let Err(e) = ws.surface.create(w, d) {
            tracing::warn!("Default desk not created: {e}");
            return ws;
        }
        ws.place_starter();
        ws
    }

    /// Build the editor with no desk and no objects
    pub fn empty(settings: PlacementSettings, catalog: Catalog, shell: S) -> Self {
        Self {
            surface: SurfaceModel::new(settings.desk_origin_y).with_max_size(settings.max_desk_size),
            engine: PlacementEngine::new(),
            camera: OrbitCamera::for_desk(settings.desk_origin_y),
            settings,
            catalog,
            shell,
        }
    }

    pub fn settings(&self) -> &PlacementSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn surface(&self) -> &SurfaceModel {
        &self.surface
    }

    pub fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    // ── Pointer and keyboard input ────────────────────────────

    /// Pick under the pointer. A hit selects the object and starts dragging
    /// it; a miss clears the selection. Ignored while a gesture is active.
    pub fn on_pointer_down(&mut self, screen: ScreenPoint, viewport: ViewportRect) -> Option<ObjectId> {
        if self.engine.is_gesture_active() {
            return None;
        }
        let ray = self.camera.screen_ray(screen, viewport);
        let Some(hit) = self.engine.pick(&ray) else {
            self.engine.deselect();
            self.shell.notify_selection_changed(None);
            return None;
        };

        if self.engine.selected_id().is_some_and(|prev| prev != hit.id) {
            self.engine.deselect();
            self.shell.notify_selection_changed(None);
        }
        self.engine.select(hit.id);
        if self.engine.begin_drag(hit.id, hit.point) {
            self.set_orbit(false);
        }
        self.shell.notify_selection_changed(self.engine.get(hit.id));
        Some(hit.id)
    }

    /// Start turning the selected object from its rotate handle
    pub fn on_rotate_handle_down(&mut self, screen: ScreenPoint) -> bool {
        let Some(id) = self.engine.selected_id() else {
            return false;
        };
        if !self.engine.begin_rotate(id, screen.x) {
            return false;
        }
        self.set_orbit(false);
        true
    }

    /// Advance the active gesture. Returns the object that changed.
    pub fn on_pointer_move(&mut self, screen: ScreenPoint, viewport: ViewportRect) -> Option<ObjectId> {
        let changed = match self.engine.gesture() {
            Gesture::Idle => None,
            Gesture::Dragging { .. } => {
                let ray = self.camera.screen_ray(screen, viewport);
                self.engine
                    .update_drag(&ray, &self.surface, self.settings.margin)
            }
            Gesture::Rotating { .. } => self
                .engine
                .update_rotate(screen.x, self.settings.rotate_speed),
        }?;
        self.notify_transform(changed);
        Some(changed)
    }

    /// Pointer released: end any gesture and give the camera back
    pub fn on_pointer_up(&mut self) {
        if self.engine.end_gesture() {
            tracing::debug!("Gesture ended");
        }
        self.set_orbit(true);
    }

    /// Pointer lost (left the window, capture revoked); same as release
    pub fn on_pointer_cancel(&mut self) {
        self.on_pointer_up();
    }

    pub fn on_key(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::DeleteSelected => {
                self.delete_selected();
            }
            KeyCommand::RotateSelected(delta) => {
                self.rotate_selected(delta);
            }
            KeyCommand::Deselect => self.deselect(),
        }
    }

    // ── Commands ──────────────────────────────────────────────

    /// Pick a catalog item for the next `add_object`. Unknown ids clear the pick.
    pub fn select_template(&mut self, id: &str) -> Option<&CatalogTemplate> {
        self.catalog.set_selected(id);
        self.catalog.selected()
    }

    /// Place the selected catalog item at the desk centre
    pub fn add_object(&mut self) -> Result<ObjectId, EditorError> {
        self.engine
            .add_from_template(&self.surface, self.catalog.selected())
    }

    pub fn rotate_selected(&mut self, delta: f64) -> bool {
        let Some(id) = self.engine.selected_id() else {
            return false;
        };
        if !self.engine.rotate(id, delta) {
            return false;
        }
        self.notify_transform(id);
        true
    }

    /// Resize the selected object. `Ok(false)` when nothing is selected.
    pub fn rescale_selected(&mut self, width: f64, height: f64, depth: f64) -> Result<bool, EditorError> {
        let Some(id) = self.engine.selected_id() else {
            return Ok(false);
        };
        let changed = self
            .engine
            .rescale(id, width, height, depth, &self.surface)?;
        if changed {
            self.notify_transform(id);
        }
        Ok(changed)
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.engine.selected_id() else {
            return false;
        };
        let deleted = self.engine.delete(id);
        if deleted {
            self.shell.notify_selection_changed(None);
            self.end_orphaned_gesture();
        }
        deleted
    }

    pub fn deselect(&mut self) {
        if self.engine.selected_id().is_some() {
            self.engine.deselect();
            self.shell.notify_selection_changed(None);
        }
    }

    /// Remove every object from the desk
    pub fn clear_objects(&mut self) {
        let had_selection = self.engine.selected_id().is_some();
        self.engine.clear_all();
        if had_selection {
            self.shell.notify_selection_changed(None);
        }
        self.end_orphaned_gesture();
        tracing::info!("Cleared all objects");
    }

    /// Replace the desk. Objects keep their positions.
    pub fn create_surface(&mut self, width: f64, depth: f64) -> Result<(), EditorError> {
        self.surface.create(width, depth)?;
        Ok(())
    }

    /// Start over: empty the desk, resize it, and put the starter object on it
    pub fn new_desk(&mut self, width: f64, depth: f64) -> Result<(), EditorError> {
        self.surface.validate(width, depth)?;
        self.clear_objects();
        self.surface.create(width, depth)?;
        self.place_starter();
        Ok(())
    }

    /// Remove the objects and the desk
    pub fn clear_scene(&mut self) {
        self.clear_objects();
        self.surface.clear();
    }

    pub fn toggle_grid(&mut self) {
        self.surface.toggle_grid_visibility();
    }

    /// Snapshot for saving. Without a desk there is nothing to save.
    pub fn export_layout(&self) -> Result<LayoutRecord, EditorError> {
        let desk = self
            .surface
            .current()
            .ok_or(EditorError::NoSurface)?
            .params();
        Ok(encode(desk, &self.engine.export_state()))
    }

    /// Rebuild the desk and objects from a saved record. Nothing changes if the
    /// record is malformed.
    pub fn apply_layout_record(&mut self, record: &LayoutRecord) -> Result<(), EditorError> {
        let (desk, objects) = decode_record(record)?;
        self.apply_layout(desk, &objects)
    }

    /// Same as [`Self::apply_layout_record`] for JSON text
    pub fn apply_layout_json(&mut self, json: &str) -> Result<(), EditorError> {
        let (desk, objects) = shared::decode_str(json)?;
        self.apply_layout(desk, &objects)
    }

    fn apply_layout(&mut self, desk: DeskParams, objects: &[ObjectSpec]) -> Result<(), EditorError> {
        let had_selection = self.engine.selected_id().is_some();
        self.surface.create(desk.width, desk.depth)?;
        self.engine.apply_layout(objects);
        if had_selection {
            self.shell.notify_selection_changed(None);
        }
        self.end_orphaned_gesture();
        Ok(())
    }

    /// Screen position for handles: the centre of the selected object's top face
    pub fn selection_anchor(&self, viewport: ViewportRect) -> Option<ScreenPoint> {
        let obj = self.engine.selected()?;
        let top = obj.position + DVec3::new(0.0, obj.local_half_extents().y, 0.0);
        self.camera.project(top, viewport)
    }

    // ── Internals ─────────────────────────────────────────────

    fn place_starter(&mut self) {
        let Some(id) = self.settings.starter_template.as_deref() else {
            return;
        };
        match self.engine.add_from_template(&self.surface, self.catalog.get(id)) {
            Ok(obj) => tracing::debug!("Starter object {obj} placed"),
            Err(e) => tracing::warn!("Starter object '{id}' not placed: {e}"),
        }
    }

    fn set_orbit(&mut self, enabled: bool) {
        self.camera.orbit_enabled = enabled;
        self.shell.set_orbit_enabled(enabled);
    }

    fn notify_transform(&mut self, id: ObjectId) {
        if let Some(obj) = self.engine.get(id) {
            self.shell.notify_transform_changed(obj);
        }
    }

    /// Deleting the dragged object ends its gesture; hand orbit back
    fn end_orphaned_gesture(&mut self) {
        if !self.engine.is_gesture_active() && !self.camera.orbit_enabled {
            self.set_orbit(true);
        }
    }
}
