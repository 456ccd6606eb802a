//! Layout storage backends.
//!
//! Every backend stores layouts as pretty JSON and decodes them through the
//! layout codec on the way back in, so a corrupt file surfaces as
//! `MalformedRecord` instead of loading half a desk.

mod drive;
mod local;
mod memory;

pub use drive::DriveStorage;
pub use local::LocalStorage;
pub use memory::MemoryStorage;

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use desk_core::EditorError;
use serde::{Deserialize, Serialize};
use shared::LayoutRecord;

use crate::auth::TokenAuth;
use crate::settings::{StorageBackend, StorageSettings};

/// A stored layout as shown in the file list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "modifiedTime")]
    pub modified_time: Option<DateTime<Utc>>,
}

/// Result of a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub id: String,
    pub name: String,
}

/// Somewhere layouts can be listed, loaded and saved
pub trait LayoutStorage: Send + Sync {
    /// Saved layouts, most recently modified first
    fn list_files(&self) -> impl Future<Output = Result<Vec<FileEntry>, EditorError>> + Send;

    fn load_file_content(&self, id: &str) -> impl Future<Output = Result<LayoutRecord, EditorError>> + Send;

    /// Save under `name`, overwriting a layout of the same name
    fn save_file(
        &self,
        name: &str,
        record: &LayoutRecord,
    ) -> impl Future<Output = Result<SavedFile, EditorError>> + Send;

    /// Forget anything cached about the account (called on sign-out)
    fn invalidate_cache(&self);

    /// Whether calls need a signed-in account
    fn requires_auth(&self) -> bool;
}

/// Decode stored JSON text into a normalised record
pub(crate) fn parse_layout(text: &str) -> Result<LayoutRecord, EditorError> {
    let (desk, objects) = shared::decode_str(text)?;
    Ok(shared::encode(desk, &objects))
}

/// The backend picked in settings
pub enum Storage {
    Local(LocalStorage),
    Drive(DriveStorage<TokenAuth>),
    Memory(MemoryStorage),
}

impl Storage {
    pub fn from_settings(settings: &StorageSettings, auth: Arc<TokenAuth>) -> Self {
        match settings.backend {
            StorageBackend::Drive => Storage::Drive(DriveStorage::new(auth, &settings.app_folder)),
            StorageBackend::Memory => Storage::Memory(MemoryStorage::new()),
            StorageBackend::Local => match settings.resolved_local_dir() {
                Some(dir) => Storage::Local(LocalStorage::new(dir)),
                None => {
                    tracing::warn!("No data directory available; layouts are kept in memory");
                    Storage::Memory(MemoryStorage::new())
                }
            },
        }
    }

    pub fn backend(&self) -> StorageBackend {
        match self {
            Storage::Local(_) => StorageBackend::Local,
            Storage::Drive(_) => StorageBackend::Drive,
            Storage::Memory(_) => StorageBackend::Memory,
        }
    }
}

impl LayoutStorage for Storage {
    async fn list_files(&self) -> Result<Vec<FileEntry>, EditorError> {
        match self {
            Storage::Local(s) => s.list_files().await,
            Storage::Drive(s) => s.list_files().await,
            Storage::Memory(s) => s.list_files().await,
        }
    }

    async fn load_file_content(&self, id: &str) -> Result<LayoutRecord, EditorError> {
        match self {
            Storage::Local(s) => s.load_file_content(id).await,
            Storage::Drive(s) => s.load_file_content(id).await,
            Storage::Memory(s) => s.load_file_content(id).await,
        }
    }

    async fn save_file(&self, name: &str, record: &LayoutRecord) -> Result<SavedFile, EditorError> {
        match self {
            Storage::Local(s) => s.save_file(name, record).await,
            Storage::Drive(s) => s.save_file(name, record).await,
            Storage::Memory(s) => s.save_file(name, record).await,
        }
    }

    fn invalidate_cache(&self) {
        match self {
            Storage::Local(s) => s.invalidate_cache(),
            Storage::Drive(s) => s.invalidate_cache(),
            Storage::Memory(s) => s.invalidate_cache(),
        }
    }

    fn requires_auth(&self) -> bool {
        match self {
            Storage::Local(s) => s.requires_auth(),
            Storage::Drive(s) => s.requires_auth(),
            Storage::Memory(s) => s.requires_auth(),
        }
    }
}
