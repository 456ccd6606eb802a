//! Headless test harness for driving a workspace the way a shell would.
//!
//! Pointer helpers work in screen space against a fixed viewport, so tests go
//! through the same camera and picking path as real input.

use shared::LayoutRecord;

use crate::catalog::Catalog;
use crate::error::EditorError;
use crate::placement::{ObjectId, PlacedObject};
use crate::settings::PlacementSettings;
use crate::shell::{RecordingShell, ShellEvent};
use crate::viewport::camera::{ScreenPoint, ViewportRect};
use crate::workspace::{KeyCommand, Workspace};

/// Headless workspace with a recording shell and an 800x600 viewport
pub struct TestHarness {
    pub workspace: Workspace<RecordingShell>,
    pub viewport: ViewportRect,
}

impl TestHarness {
    /// Started workspace: default desk with the starter cube
    pub fn new() -> Self {
        Self::with_settings(PlacementSettings::default())
    }

    pub fn with_settings(settings: PlacementSettings) -> Self {
        Self {
            workspace: Workspace::start(settings, Catalog::builtin(), RecordingShell::new()),
            viewport: ViewportRect::sized(800.0, 600.0),
        }
    }

    /// No desk, no objects
    pub fn empty() -> Self {
        Self {
            workspace: Workspace::empty(
                PlacementSettings::default(),
                Catalog::builtin(),
                RecordingShell::new(),
            ),
            viewport: ViewportRect::sized(800.0, 600.0),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn object_count(&self) -> usize {
        self.workspace.engine().len()
    }

    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.workspace.engine().objects().iter().map(|o| o.id).collect()
    }

    pub fn object(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.workspace.engine().get(id)
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.workspace.engine().selected_id()
    }

    /// Where the object's centre appears on screen
    pub fn screen_of(&self, id: ObjectId) -> Option<ScreenPoint> {
        let obj = self.object(id)?;
        self.workspace.camera.project(obj.position, self.viewport)
    }

    /// Shell notifications since the last call
    pub fn take_events(&mut self) -> Vec<ShellEvent> {
        self.workspace.shell.drain()
    }

    // ── Input ─────────────────────────────────────────────────

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<ObjectId> {
        self.workspace
            .on_pointer_down(ScreenPoint::new(x, y), self.viewport)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<ObjectId> {
        self.workspace
            .on_pointer_move(ScreenPoint::new(x, y), self.viewport)
    }

    pub fn pointer_up(&mut self) {
        self.workspace.on_pointer_up();
    }

    /// Press and release on the object, leaving it selected
    pub fn click_object(&mut self, id: ObjectId) -> Option<ObjectId> {
        let at = self.screen_of(id)?;
        let hit = self.pointer_down(at.x, at.y);
        self.pointer_up();
        hit
    }

    /// Grab the object at its centre and drag it through `path` (screen pixels
    /// relative to the grab point), then release
    pub fn drag_object(&mut self, id: ObjectId, path: &[(f64, f64)]) -> bool {
        let Some(at) = self.screen_of(id) else {
            return false;
        };
        if self.pointer_down(at.x, at.y) != Some(id) {
            self.pointer_up();
            return false;
        }
        for (dx, dy) in path {
            self.pointer_move(at.x + dx, at.y + dy);
        }
        self.pointer_up();
        true
    }

    pub fn key(&mut self, command: KeyCommand) {
        self.workspace.on_key(command);
    }

    // ── Commands ──────────────────────────────────────────────

    /// Select a catalog item and place it
    pub fn add(&mut self, template_id: &str) -> Result<ObjectId, EditorError> {
        self.workspace.select_template(template_id);
        self.workspace.add_object()
    }

    pub fn export(&self) -> Result<LayoutRecord, EditorError> {
        self.workspace.export_layout()
    }

    pub fn export_json(&self) -> Result<String, EditorError> {
        Ok(self.export()?.to_json_pretty())
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), EditorError> {
        self.workspace.apply_layout_json(json)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
