use std::sync::Mutex;

use chrono::{DateTime, Utc};
use desk_core::EditorError;
use shared::LayoutRecord;

use super::{parse_layout, FileEntry, LayoutStorage, SavedFile};

struct StoredFile {
    id: String,
    name: String,
    modified: DateTime<Utc>,
    /// Save order, to break ties between saves in the same instant
    seq: u64,
    content: String,
}

/// Layouts kept in process memory
#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<Vec<StoredFile>>,
    next_seq: Mutex<u64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> EditorError {
        EditorError::Transport("memory storage unavailable".to_string())
    }

    fn take_seq(&self) -> Result<u64, EditorError> {
        let mut seq = self.next_seq.lock().map_err(|_| Self::poisoned())?;
        *seq += 1;
        Ok(*seq)
    }
}

impl LayoutStorage for MemoryStorage {
    async fn list_files(&self) -> Result<Vec<FileEntry>, EditorError> {
        let files = self.files.lock().map_err(|_| Self::poisoned())?;
        let mut sorted: Vec<&StoredFile> = files.iter().collect();
        sorted.sort_by(|a, b| (b.modified, b.seq).cmp(&(a.modified, a.seq)));
        Ok(sorted
            .into_iter()
            .map(|f| FileEntry {
                id: f.id.clone(),
                name: f.name.clone(),
                modified_time: Some(f.modified),
            })
            .collect())
    }

    async fn load_file_content(&self, id: &str) -> Result<LayoutRecord, EditorError> {
        let content = {
            let files = self.files.lock().map_err(|_| Self::poisoned())?;
            files
                .iter()
                .find(|f| f.id == id)
                .map(|f| f.content.clone())
                .ok_or_else(|| EditorError::Transport(format!("Could not load file: no file with id {id}")))?
        };
        parse_layout(&content)
    }

    async fn save_file(&self, name: &str, record: &LayoutRecord) -> Result<SavedFile, EditorError> {
        let seq = self.take_seq()?;
        let content = record.to_json_pretty();
        let mut files = self.files.lock().map_err(|_| Self::poisoned())?;

        if let Some(existing) = files.iter_mut().find(|f| f.name == name) {
            existing.content = content;
            existing.modified = Utc::now();
            existing.seq = seq;
            return Ok(SavedFile {
                id: existing.id.clone(),
                name: existing.name.clone(),
            });
        }

        let id = uuid::Uuid::new_v4().to_string();
        files.push(StoredFile {
            id: id.clone(),
            name: name.to_string(),
            modified: Utc::now(),
            seq,
            content,
        });
        Ok(SavedFile {
            id,
            name: name.to_string(),
        })
    }

    fn invalidate_cache(&self) {}

    fn requires_auth(&self) -> bool {
        false
    }
}
