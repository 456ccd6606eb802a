//! Contract between the core and whatever draws it

use crate::placement::{ObjectId, PlacedObject};

/// Visual feedback hooks the core calls into.
///
/// Implementors render handles and menus; they never own objects, only the
/// handles passed here.
pub trait PresentationShell {
    /// The selection changed; `None` means nothing is selected now
    fn notify_selection_changed(&mut self, selected: Option<&PlacedObject>);

    /// An object moved, turned or was resized; anchored handles should follow
    fn notify_transform_changed(&mut self, object: &PlacedObject);

    /// Camera orbit is turned off for the length of a gesture
    fn set_orbit_enabled(&mut self, enabled: bool);
}

/// Shell that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullShell;

impl PresentationShell for NullShell {
    fn notify_selection_changed(&mut self, _selected: Option<&PlacedObject>) {}
    fn notify_transform_changed(&mut self, _object: &PlacedObject) {}
    fn set_orbit_enabled(&mut self, _enabled: bool) {}
}

/// A notification as recorded by [`RecordingShell`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    SelectionChanged(Option<ObjectId>),
    TransformChanged(ObjectId),
    OrbitEnabled(bool),
}

/// Shell that keeps every notification, for tests and for hosts that drain
/// events in batches (the browser bindings)
#[derive(Debug, Default, Clone)]
pub struct RecordingShell {
    pub events: Vec<ShellEvent>,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<ShellEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn last(&self) -> Option<ShellEvent> {
        self.events.last().copied()
    }
}

impl PresentationShell for RecordingShell {
    fn notify_selection_changed(&mut self, selected: Option<&PlacedObject>) {
        self.events
            .push(ShellEvent::SelectionChanged(selected.map(|o| o.id)));
    }

    fn notify_transform_changed(&mut self, object: &PlacedObject) {
        self.events.push(ShellEvent::TransformChanged(object.id));
    }

    fn set_orbit_enabled(&mut self, enabled: bool) {
        self.events.push(ShellEvent::OrbitEnabled(enabled));
    }
}
