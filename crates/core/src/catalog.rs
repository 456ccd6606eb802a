//! Catalog of placeable items

use serde::{Deserialize, Serialize};
use shared::{MalformedRecord, Rgb, ShapeKind, Size3};

use crate::error::EditorError;

/// Read-only template an object is instantiated from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTemplate {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub shape: ShapeKind,
    pub size: Size3,
    pub color: Rgb,
}

impl CatalogTemplate {
    pub fn new(id: &str, name: &str, size: Size3, color: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            shape: ShapeKind::Box,
            size,
            color: Rgb(color),
        }
    }
}

/// Item templates in display order, plus the one the user picked
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogTemplate>,
    selected_id: Option<String>,
}

impl Catalog {
    /// The stock desk items
    pub fn builtin() -> Self {
        Self {
            items: vec![
                CatalogTemplate::new("default-cube", "Cube", Size3::default_cube(), 0x4a86e8),
                CatalogTemplate::new("monitor-27inch", "Monitor", Size3::new(0.60, 0.35, 0.05), 0x222222),
                CatalogTemplate::new("book-vertical", "Book", Size3::new(0.05, 0.22, 0.15), 0xdddddd),
                CatalogTemplate::new("mouse-pad", "Mouse Pad", Size3::new(0.25, 0.005, 0.20), 0x333333),
            ],
            selected_id: None,
        }
    }

    /// Build a catalog from templates, rejecting duplicate ids and empty sizes
    pub fn from_templates(items: Vec<CatalogTemplate>) -> Result<Self, EditorError> {
        for (i, item) in items.iter().enumerate() {
            EditorError::check_dimension("template width", item.size.w)?;
            EditorError::check_dimension("template height", item.size.h)?;
            EditorError::check_dimension("template depth", item.size.d)?;
            if items[..i].iter().any(|other| other.id == item.id) {
                return Err(MalformedRecord(format!("duplicate catalog id '{}'", item.id)).into());
            }
        }
        Ok(Self {
            items,
            selected_id: None,
        })
    }

    /// Load templates from a JSON array
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let items: Vec<CatalogTemplate> = serde_json::from_str(json)
            .map_err(|e| MalformedRecord(format!("catalog: {e}")))?;
        Self::from_templates(items)
    }

    pub fn templates(&self) -> &[CatalogTemplate] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CatalogTemplate> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Remember the user's pick. Unknown ids clear the selection.
    pub fn set_selected(&mut self, id: &str) {
        self.selected_id = self.get(id).map(|item| item.id.clone());
    }

    pub fn clear_selected(&mut self) {
        self.selected_id = None;
    }

    pub fn selected(&self) -> Option<&CatalogTemplate> {
        self.get(self.selected_id.as_deref()?)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let c = Catalog::builtin();
        let ids: Vec<&str> = c.templates().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["default-cube", "monitor-27inch", "book-vertical", "mouse-pad"]);
    }

    #[test]
    fn test_lookup() {
        let c = Catalog::builtin();
        assert_eq!(c.get("book-vertical").unwrap().size, Size3::new(0.05, 0.22, 0.15));
        assert!(c.get("lamp").is_none());
    }

    #[test]
    fn test_selection() {
        let mut c = Catalog::builtin();
        assert!(c.selected().is_none());
        c.set_selected("monitor-27inch");
        assert_eq!(c.selected().unwrap().name, "Monitor");
        c.set_selected("nope");
        assert!(c.selected().is_none());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"id": "lamp", "name": "Lamp", "type": "box", "size": {"w": 0.1, "h": 0.4, "d": 0.1}, "color": 16777215},
            {"id": "mug", "name": "Mug", "size": {"w": 0.08, "h": 0.1, "d": 0.08}, "color": 0}
        ]"#;
        let c = Catalog::from_json(json).unwrap();
        assert_eq!(c.templates().len(), 2);
        assert_eq!(c.get("mug").unwrap().shape, ShapeKind::Box);
    }

    #[test]
    fn test_from_json_rejects_duplicates_and_zero_size() {
        let dup = r#"[
            {"id": "a", "name": "A", "size": {"w": 1, "h": 1, "d": 1}, "color": 0},
            {"id": "a", "name": "B", "size": {"w": 1, "h": 1, "d": 1}, "color": 0}
        ]"#;
        assert!(matches!(Catalog::from_json(dup), Err(EditorError::MalformedRecord(_))));

        let flat = r#"[{"id": "a", "name": "A", "size": {"w": 1, "h": 0, "d": 1}, "color": 0}]"#;
        assert!(matches!(
            Catalog::from_json(flat),
            Err(EditorError::InvalidDimension { .. })
        ));
    }
}
