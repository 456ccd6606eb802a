use serde::Serialize;
use wasm_bindgen::prelude::*;

use desk_core::{
    Catalog, EditorError, KeyCommand, ObjectId, PlacedObject, PlacementSettings, RecordingShell,
    ScreenPoint, ShellEvent, ViewportRect, Workspace,
};

fn js_error(e: EditorError) -> JsError {
    JsError::new(&e.to_string())
}

/// Object as handed to the page for drawing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ObjectView {
    id: u64,
    position: [f64; 3],
    rotation_y: f64,
    size: [f64; 3],
    color: u32,
    selected: bool,
}

impl ObjectView {
    fn new(obj: &PlacedObject, selected: Option<ObjectId>) -> Self {
        let size = obj.size();
        Self {
            id: obj.id.raw(),
            position: obj.position.to_array(),
            rotation_y: obj.rotation_y,
            size: size.to_array(),
            color: obj.color.0,
            selected: selected == Some(obj.id),
        }
    }
}

/// Shell notification in the form the page consumes
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum EventView {
    SelectionChanged { id: Option<u64> },
    TransformChanged { id: u64 },
    OrbitEnabled { enabled: bool },
}

impl From<ShellEvent> for EventView {
    fn from(event: ShellEvent) -> Self {
        match event {
            ShellEvent::SelectionChanged(id) => EventView::SelectionChanged { id: id.map(ObjectId::raw) },
            ShellEvent::TransformChanged(id) => EventView::TransformChanged { id: id.raw() },
            ShellEvent::OrbitEnabled(enabled) => EventView::OrbitEnabled { enabled },
        }
    }
}

/// `KeyboardEvent.key` to a workspace command
fn key_command(key: &str, rotate_step: f64) -> Option<KeyCommand> {
    match key {
        "Delete" | "Backspace" => Some(KeyCommand::DeleteSelected),
        "Escape" => Some(KeyCommand::Deselect),
        "q" | "Q" => Some(KeyCommand::RotateSelected(rotate_step)),
        "e" | "E" => Some(KeyCommand::RotateSelected(-rotate_step)),
        _ => None,
    }
}

/// Desk editor driven from JavaScript.
///
/// The page forwards pointer and key events, draws from `objects_json` and
/// reacts to `drain_events` for handles and orbit controls.
#[wasm_bindgen]
pub struct DeskEditor {
    workspace: Workspace<RecordingShell>,
    viewport: ViewportRect,
}

#[wasm_bindgen]
impl DeskEditor {
    /// Editor with the default desk and the built-in catalog
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> DeskEditor {
        Self {
            workspace: Workspace::start(PlacementSettings::default(), Catalog::builtin(), RecordingShell::new()),
            viewport: ViewportRect::sized(width, height),
        }
    }

    /// Editor with settings and catalog given as JSON
    pub fn with_config(width: f64, height: f64, settings_json: &str, catalog_json: &str) -> Result<DeskEditor, JsError> {
        let settings: PlacementSettings =
            serde_json::from_str(settings_json).map_err(|e| JsError::new(&e.to_string()))?;
        let catalog = Catalog::from_json(catalog_json).map_err(js_error)?;
        Ok(Self {
            workspace: Workspace::start(settings, catalog, RecordingShell::new()),
            viewport: ViewportRect::sized(width, height),
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = ViewportRect::sized(width, height);
    }

    // ── Pointer and keys ─────────────────────────────────────

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<u64> {
        self.workspace
            .on_pointer_down(ScreenPoint::new(x, y), self.viewport)
            .map(ObjectId::raw)
    }

    pub fn rotate_handle_down(&mut self, x: f64) -> bool {
        self.workspace.on_rotate_handle_down(ScreenPoint::new(x, 0.0))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<u64> {
        self.workspace
            .on_pointer_move(ScreenPoint::new(x, y), self.viewport)
            .map(ObjectId::raw)
    }

    pub fn pointer_up(&mut self) {
        self.workspace.on_pointer_up();
    }

    pub fn pointer_cancel(&mut self) {
        self.workspace.on_pointer_cancel();
    }

    /// Returns whether the key mapped to a command
    pub fn key_down(&mut self, key: &str) -> bool {
        match key_command(key, self.workspace.settings().rotate_step) {
            Some(command) => {
                self.workspace.on_key(command);
                true
            }
            None => false,
        }
    }

    /// Orbit the camera by a pointer delta; ignored while a gesture holds the orbit
    pub fn orbit(&mut self, dx: f64, dy: f64) {
        self.workspace.camera.rotate(dx, dy);
    }

    pub fn zoom(&mut self, delta: f64) {
        self.workspace.camera.zoom(delta);
    }

    // ── Commands ─────────────────────────────────────────────

    pub fn select_template(&mut self, id: &str) -> bool {
        self.workspace.select_template(id).is_some()
    }

    pub fn add_object(&mut self) -> Result<u64, JsError> {
        self.workspace.add_object().map(ObjectId::raw).map_err(js_error)
    }

    pub fn rotate_selected(&mut self, delta: f64) -> bool {
        self.workspace.rotate_selected(delta)
    }

    pub fn rescale_selected(&mut self, width: f64, height: f64, depth: f64) -> Result<bool, JsError> {
        self.workspace.rescale_selected(width, height, depth).map_err(js_error)
    }

    pub fn delete_selected(&mut self) -> bool {
        self.workspace.delete_selected()
    }

    pub fn deselect(&mut self) {
        self.workspace.deselect();
    }

    pub fn new_desk(&mut self, width: f64, depth: f64) -> Result<(), JsError> {
        self.workspace.new_desk(width, depth).map_err(js_error)
    }

    pub fn clear_objects(&mut self) {
        self.workspace.clear_objects();
    }

    pub fn toggle_grid(&mut self) {
        self.workspace.toggle_grid();
    }

    // ── Layouts ──────────────────────────────────────────────

    pub fn export_layout(&self) -> Result<String, JsError> {
        let record = self.workspace.export_layout().map_err(js_error)?;
        Ok(record.to_json_pretty())
    }

    /// Replace the desk and objects; on failure the scene is unchanged
    pub fn load_layout(&mut self, json: &str) -> Result<(), JsError> {
        self.workspace.apply_layout_json(json).map_err(|e| {
            web_sys::console::warn_1(&format!("Layout not loaded: {e}").into());
            js_error(e)
        })
    }

    // ── Queries ──────────────────────────────────────────────

    pub fn objects_json(&self) -> String {
        let selected = self.workspace.engine().selected_id();
        let objects: Vec<ObjectView> = self
            .workspace
            .engine()
            .objects()
            .iter()
            .map(|o| ObjectView::new(o, selected))
            .collect();
        serde_json::to_string(&objects).unwrap_or_default()
    }

    pub fn catalog_json(&self) -> String {
        serde_json::to_string(self.workspace.catalog().templates()).unwrap_or_default()
    }

    /// Desk as `{width, depth, topY, gridVisible}`, or `null` without a desk
    pub fn desk_json(&self) -> String {
        let desk = self.workspace.surface().current().map(|s| {
            serde_json::json!({
                "width": s.width,
                "depth": s.depth,
                "topY": s.top_y(),
                "gridVisible": s.grid_visible,
            })
        });
        serde_json::to_string(&desk).unwrap_or_default()
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.workspace.engine().selected_id().map(ObjectId::raw)
    }

    /// Screen position `[x, y]` for the selection handles
    pub fn selection_anchor(&self) -> Option<Vec<f64>> {
        let p = self.workspace.selection_anchor(self.viewport)?;
        Some(vec![p.x, p.y])
    }

    /// Shell notifications since the last call, as a JSON array
    pub fn drain_events(&mut self) -> String {
        let events: Vec<EventView> = self.workspace.shell.drain().into_iter().map(EventView::from).collect();
        serde_json::to_string(&events).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centre_of(editor: &DeskEditor, id: u64) -> (f64, f64) {
        let obj = editor.workspace.engine().get(ObjectId::from_raw(id)).unwrap();
        let p = editor.workspace.camera.project(obj.position, editor.viewport).unwrap();
        (p.x, p.y)
    }

    #[test]
    fn test_starts_with_one_object() {
        let editor = DeskEditor::new(800.0, 600.0);
        let objects: serde_json::Value = serde_json::from_str(&editor.objects_json()).unwrap();
        assert_eq!(objects.as_array().unwrap().len(), 1);
        assert_eq!(objects[0]["selected"], false);
        let desk: serde_json::Value = serde_json::from_str(&editor.desk_json()).unwrap();
        assert_eq!(desk["width"], 1.2);
    }

    #[test]
    fn test_click_and_drag_report_events() {
        let mut editor = DeskEditor::new(800.0, 600.0);
        let id = editor.workspace.engine().objects()[0].id.raw();
        let (x, y) = centre_of(&editor, id);

        assert_eq!(editor.pointer_down(x, y), Some(id));
        assert_eq!(editor.pointer_move(x + 5.0, y), Some(id));
        editor.pointer_up();

        let events: serde_json::Value = serde_json::from_str(&editor.drain_events()).unwrap();
        let kinds: Vec<&str> = events
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["type"].as_str().unwrap())
            .collect();
        assert_eq!(
            kinds,
            ["orbitEnabled", "selectionChanged", "transformChanged", "orbitEnabled"]
        );
        assert_eq!(events[1]["id"], id);
        assert_eq!(events[3]["enabled"], true);
        assert_eq!(editor.drain_events(), "[]");
    }

    #[test]
    fn test_keys() {
        let mut editor = DeskEditor::new(800.0, 600.0);
        let id = editor.workspace.engine().objects()[0].id.raw();
        let (x, y) = centre_of(&editor, id);
        editor.pointer_down(x, y);
        editor.pointer_up();

        assert!(editor.key_down("q"));
        let yaw = editor.workspace.engine().get(ObjectId::from_raw(id)).unwrap().rotation_y;
        assert!((yaw - PlacementSettings::default().rotate_step).abs() < 1e-12);

        assert!(!editor.key_down("x"));
        assert!(editor.key_down("Delete"));
        assert_eq!(editor.workspace.engine().len(), 0);
        assert_eq!(editor.selected_id(), None);
    }

    #[test]
    fn test_export_then_load_keeps_layout() {
        let mut editor = DeskEditor::new(800.0, 600.0);
        assert!(editor.select_template("monitor-27inch"));
        assert!(editor.add_object().is_ok());
        let Ok(json) = editor.export_layout() else {
            panic!("export failed");
        };

        let mut other = DeskEditor::new(800.0, 600.0);
        other.clear_objects();
        assert!(other.load_layout(&json).is_ok());
        assert_eq!(other.export_layout().ok(), Some(json));
        assert_eq!(other.workspace.engine().len(), 2);
    }

    #[test]
    fn test_event_view_shape() {
        let json = serde_json::to_value(EventView::from(ShellEvent::SelectionChanged(None))).unwrap();
        assert_eq!(json, serde_json::json!({"type": "selectionChanged", "id": null}));
    }

    #[test]
    fn test_key_mapping() {
        assert!(matches!(key_command("Backspace", 0.2), Some(KeyCommand::DeleteSelected)));
        assert!(matches!(key_command("E", 0.2), Some(KeyCommand::RotateSelected(d)) if d == -0.2));
        assert!(key_command("w", 0.2).is_none());
    }
}
