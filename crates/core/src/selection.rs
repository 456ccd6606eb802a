use crate::placement::ObjectId;

/// Single-object selection state
#[derive(Debug, Default)]
pub struct SelectionState {
    selected: Option<ObjectId>,
    /// Version counter for selection changes (lets the shell skip redundant refreshes)
    version: u64,
}

impl SelectionState {
    /// The selected object, if any
    pub fn primary(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Check if an object is selected
    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selected == Some(id)
    }

    /// Select an object (replaces any previous selection)
    pub fn select(&mut self, id: ObjectId) {
        if self.selected != Some(id) {
            self.selected = Some(id);
            self.version += 1;
        }
    }

    /// Clear selection
    pub fn clear(&mut self) {
        if self.selected.take().is_some() {
            self.version += 1;
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}
