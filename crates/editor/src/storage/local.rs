use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use desk_core::EditorError;
use shared::LayoutRecord;

use super::{parse_layout, FileEntry, LayoutStorage, SavedFile};

/// One `.json` file per layout in a folder on disk. The file name is the id.
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for a file name; anything that could escape the folder is refused
    fn path_for(&self, name: &str) -> Result<PathBuf, EditorError> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !plain {
            return Err(EditorError::Transport(format!("invalid file name '{name}'")));
        }
        Ok(self.dir.join(name))
    }
}

fn io_error(context: &str, e: std::io::Error) -> EditorError {
    EditorError::Transport(format!("{context}: {e}"))
}

impl LayoutStorage for LocalStorage {
    async fn list_files(&self) -> Result<Vec<FileEntry>, EditorError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            // Nothing saved yet
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("Could not read layout folder", e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error("Could not read layout folder", e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.to_lowercase().ends_with(".json") {
                continue;
            }
            let Ok(meta) = entry.metadata().await else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            let modified_time = meta.modified().ok().map(DateTime::<Utc>::from);
            files.push(FileEntry {
                id: name.clone(),
                name,
                modified_time,
            });
        }

        files.sort_by(|a, b| {
            b.modified_time
                .cmp(&a.modified_time)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(files)
    }

    async fn load_file_content(&self, id: &str) -> Result<LayoutRecord, EditorError> {
        let path = self.path_for(id)?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| io_error("Could not load file", e))?;
        parse_layout(&text)
    }

    async fn save_file(&self, name: &str, record: &LayoutRecord) -> Result<SavedFile, EditorError> {
        let path = self.path_for(name)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("Could not create layout folder", e))?;
        tokio::fs::write(&path, record.to_json_pretty())
            .await
            .map_err(|e| io_error("Could not write file", e))?;
        tracing::info!("Saved layout to {}", path.display());
        Ok(SavedFile {
            id: name.to_string(),
            name: name.to_string(),
        })
    }

    fn invalidate_cache(&self) {}

    fn requires_auth(&self) -> bool {
        false
    }
}
