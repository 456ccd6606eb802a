//! Google Drive v3 backend. Layouts live in one app folder, found or created
//! on first use and cached until sign-out.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use desk_core::EditorError;
use serde::Deserialize;
use shared::LayoutRecord;

use super::{parse_layout, FileEntry, LayoutStorage, SavedFile};
use crate::auth::AuthProvider;

const API_BASE: &str = "https://www.googleapis.com/drive/v3";
const UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "modifiedTime", default)]
    modified_time: Option<DateTime<Utc>>,
    #[serde(rename = "mimeType", default)]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// Layout storage in the user's Google Drive
pub struct DriveStorage<A> {
    client: reqwest::Client,
    auth: Arc<A>,
    folder_name: String,
    folder_id: Mutex<Option<String>>,
    api_base: String,
    upload_base: String,
}

impl<A: AuthProvider> DriveStorage<A> {
    pub fn new(auth: Arc<A>, folder_name: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth,
            folder_name: folder_name.to_string(),
            folder_id: Mutex::new(None),
            api_base: API_BASE.to_string(),
            upload_base: UPLOAD_BASE.to_string(),
        }
    }

    /// Point at another Drive-compatible endpoint
    pub fn with_endpoints(mut self, api_base: &str, upload_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self.upload_base = upload_base.trim_end_matches('/').to_string();
        self
    }

    pub fn cached_folder_id(&self) -> Option<String> {
        self.folder_id.lock().ok()?.clone()
    }

    pub(crate) fn remember_folder(&self, id: &str) {
        if let Ok(mut cached) = self.folder_id.lock() {
            *cached = Some(id.to_string());
        }
    }

    fn token(&self) -> Result<String, EditorError> {
        self.auth.access_token().ok_or(EditorError::NotSignedIn)
    }

    /// The app folder's id, searching for it (or creating it) the first time
    async fn app_folder(&self) -> Result<String, EditorError> {
        if let Some(id) = self.cached_folder_id() {
            return Ok(id);
        }
        let token = self.token()?;
        let id = self
            .find_or_create_folder(&token)
            .await
            .map_err(|msg| EditorError::Transport(format!("Could not access app folder: {msg}")))?;
        self.remember_folder(&id);
        Ok(id)
    }

    async fn find_or_create_folder(&self, token: &str) -> Result<String, String> {
        let query = format!(
            "name='{}' and mimeType='{FOLDER_MIME}' and trashed=false",
            escape_query(&self.folder_name)
        );
        let found: FileList = self
            .send_json(
                self.client
                    .get(format!("{}/files", self.api_base))
                    .query(&[("q", query.as_str()), ("fields", "files(id)"), ("spaces", "drive")]),
                token,
            )
            .await?;
        if let Some(folder) = found.files.into_iter().next() {
            return Ok(folder.id);
        }

        let created: DriveFile = self
            .send_json(
                self.client
                    .post(format!("{}/files", self.api_base))
                    .query(&[("fields", "id")])
                    .json(&serde_json::json!({ "name": self.folder_name, "mimeType": FOLDER_MIME })),
                token,
            )
            .await?;
        tracing::info!("Created Drive folder '{}'", self.folder_name);
        Ok(created.id)
    }

    /// Send with the bearer token and decode a JSON reply; errors carry the
    /// API's `error.message`
    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        token: &str,
    ) -> Result<T, String> {
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status();
        let body: serde_json::Value = response.json().await.map_err(|e| e.to_string())?;
        if !status.is_success() {
            return Err(api_error_message(&body).unwrap_or_else(|| status.to_string()));
        }
        serde_json::from_value(body).map_err(|e| e.to_string())
    }

    async fn upload_content(&self, file_id: &str, content: String, token: &str) -> Result<DriveFile, String> {
        self.send_json(
            self.client
                .patch(format!("{}/files/{file_id}", self.upload_base))
                .query(&[("uploadType", "media"), ("fields", "id,name")])
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(content),
            token,
        )
        .await
    }
}

/// `error.message` from a Google API error body
fn api_error_message(body: &serde_json::Value) -> Option<String> {
    body.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// Quote a value for a Drive `q` string literal
fn escape_query(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

impl<A: AuthProvider> LayoutStorage for DriveStorage<A> {
    async fn list_files(&self) -> Result<Vec<FileEntry>, EditorError> {
        let folder_id = self.app_folder().await?;
        let token = self.token()?;
        let query = format!("'{}' in parents and trashed=false", escape_query(&folder_id));
        let list: FileList = self
            .send_json(
                self.client.get(format!("{}/files", self.api_base)).query(&[
                    ("q", query.as_str()),
                    ("fields", "files(id, name, modifiedTime, mimeType)"),
                    ("orderBy", "modifiedTime desc"),
                ]),
                &token,
            )
            .await
            .map_err(EditorError::Transport)?;

        Ok(list
            .files
            .into_iter()
            .filter(|f| f.mime_type.as_deref() != Some(FOLDER_MIME))
            .map(|f| FileEntry {
                id: f.id,
                name: f.name,
                modified_time: f.modified_time,
            })
            .collect())
    }

    async fn load_file_content(&self, id: &str) -> Result<LayoutRecord, EditorError> {
        let token = self.token()?;
        let load_error = |msg: String| EditorError::Transport(format!("Could not load file: {msg}"));

        let response = self
            .client
            .get(format!("{}/files/{id}", self.api_base))
            .query(&[("alt", "media")])
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| load_error(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| load_error(e.to_string()))?;
        if !status.is_success() {
            let msg = serde_json::from_str(&text)
                .ok()
                .and_then(|body| api_error_message(&body))
                .unwrap_or_else(|| status.to_string());
            return Err(load_error(msg));
        }
        parse_layout(&text)
    }

    async fn save_file(&self, name: &str, record: &LayoutRecord) -> Result<SavedFile, EditorError> {
        let folder_id = self.app_folder().await?;
        let token = self.token()?;
        let content = record.to_json_pretty();

        let query = format!(
            "name='{}' and '{}' in parents and trashed=false",
            escape_query(name),
            escape_query(&folder_id)
        );
        let existing: FileList = self
            .send_json(
                self.client
                    .get(format!("{}/files", self.api_base))
                    .query(&[("q", query.as_str()), ("fields", "files(id)")]),
                &token,
            )
            .await
            .map_err(EditorError::Transport)?;

        let file_id = match existing.files.into_iter().next() {
            Some(file) => file.id,
            None => {
                let created: DriveFile = self
                    .send_json(
                        self.client
                            .post(format!("{}/files", self.api_base))
                            .query(&[("fields", "id, name")])
                            .json(&serde_json::json!({
                                "name": name,
                                "mimeType": "application/json",
                                "parents": [folder_id],
                            })),
                        &token,
                    )
                    .await
                    .map_err(EditorError::Transport)?;
                created.id
            }
        };

        let uploaded = self
            .upload_content(&file_id, content, &token)
            .await
            .map_err(EditorError::Transport)?;
        tracing::info!("Saved '{name}' to Drive");
        Ok(SavedFile {
            id: uploaded.id,
            name: if uploaded.name.is_empty() { name.to_string() } else { uploaded.name },
        })
    }

    fn invalidate_cache(&self) {
        if let Ok(mut cached) = self.folder_id.lock() {
            *cached = None;
        }
    }

    fn requires_auth(&self) -> bool {
        true
    }
}
