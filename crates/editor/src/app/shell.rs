use desk_core::{ObjectId, PlacedObject, PresentationShell};

/// What the egui panels need to know about the core's notifications
#[derive(Debug, Default)]
pub struct EguiShell {
    pub selected: Option<ObjectId>,
    /// Scaled size of the selected object in centimetres, for the resize fields
    pub selected_size_cm: Option<[f64; 3]>,
    pub orbit_enabled: bool,
    /// Set on any change the handles follow; cleared by the viewport after redraw
    pub handles_dirty: bool,
}

impl EguiShell {
    pub fn new() -> Self {
        Self {
            orbit_enabled: true,
            ..Default::default()
        }
    }

    fn capture_size(&mut self, object: &PlacedObject) {
        let size = object.size() * 100.0;
        self.selected_size_cm = Some([size.x, size.y, size.z]);
    }
}

impl PresentationShell for EguiShell {
    fn notify_selection_changed(&mut self, selected: Option<&PlacedObject>) {
        self.selected = selected.map(|o| o.id);
        match selected {
            Some(object) => self.capture_size(object),
            None => self.selected_size_cm = None,
        }
        self.handles_dirty = true;
    }

    fn notify_transform_changed(&mut self, object: &PlacedObject) {
        if self.selected == Some(object.id) {
            self.capture_size(object);
        }
        self.handles_dirty = true;
    }

    fn set_orbit_enabled(&mut self, enabled: bool) {
        self.orbit_enabled = enabled;
    }
}
