//! Application settings

use std::path::{Path, PathBuf};

use desk_core::PlacementSettings;
use serde::{Deserialize, Serialize};

/// Where layouts are saved and loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per layout in a local folder
    #[default]
    Local,
    /// Google Drive, inside the app folder
    Drive,
    /// Kept in memory for this session only
    Memory,
}

impl StorageBackend {
    pub fn display_name(&self) -> &'static str {
        match self {
            StorageBackend::Local => "Local folder",
            StorageBackend::Drive => "Google Drive",
            StorageBackend::Memory => "This session only",
        }
    }

    pub fn all() -> &'static [StorageBackend] {
        &[StorageBackend::Local, StorageBackend::Drive, StorageBackend::Memory]
    }
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Drive folder all layouts live in
    pub app_folder: String,
    /// Overrides the platform data directory for the local backend
    pub local_dir: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            app_folder: "DescoApp".to_string(),
            local_dir: None,
        }
    }
}

impl StorageSettings {
    /// Folder used by the local backend: the override, else `<data dir>/layouts`
    pub fn resolved_local_dir(&self) -> Option<PathBuf> {
        self.local_dir
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("layouts")))
    }
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self { font_size: 14.0 }
    }
}

/// All application settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub placement: PlacementSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "desco", "desk-editor")
}

impl AppSettings {
    /// Path of `settings.json` in the platform config directory
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Save settings to file
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Err(e) = self.save_to(&path) {
            tracing::warn!("Failed to save settings to {}: {e}", path.display());
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring unreadable settings {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = AppSettings::load_from(&dir.path().join("nope.json"));
        assert_eq!(s, AppSettings::default());
        assert_eq!(s.storage.app_folder, "DescoApp");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("settings.json");
        let mut s = AppSettings::default();
        s.storage.backend = StorageBackend::Memory;
        s.placement.margin = 0.02;
        s.ui.font_size = 16.0;
        s.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path), s);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"storage": {"backend": "drive"}}"#).unwrap();
        let s = AppSettings::load_from(&path);
        assert_eq!(s.storage.backend, StorageBackend::Drive);
        assert_eq!(s.storage.app_folder, "DescoApp");
        assert_eq!(s.placement, PlacementSettings::default());
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }

    #[test]
    fn test_local_dir_override() {
        let s = StorageSettings {
            local_dir: Some(PathBuf::from("/tmp/layouts")),
            ..Default::default()
        };
        assert_eq!(s.resolved_local_dir(), Some(PathBuf::from("/tmp/layouts")));
    }
}
