//! Async glue between the UI thread and the storage/auth collaborators.
//!
//! The UI never awaits. It asks [`SessionJobs`] to run a request on the tokio
//! runtime and polls once per frame for [`StorageReply`] values, which it then
//! applies to the workspace itself.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use desk_core::{EditorError, PresentationShell, Workspace};
use shared::LayoutRecord;

use crate::auth::AuthProvider;
use crate::storage::{FileEntry, LayoutStorage, SavedFile};

/// Trimmed file name with a `.json` extension, or `None` if blank
pub fn normalize_file_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    if name.to_lowercase().ends_with(".json") {
        Some(name.to_string())
    } else {
        Some(format!("{name}.json"))
    }
}

/// The record to save for the current workspace; fails without a desk
pub fn snapshot_for_save<S: PresentationShell>(workspace: &Workspace<S>) -> Result<LayoutRecord, EditorError> {
    workspace.export_layout()
}

/// Storage plus the account it may need
pub struct Session<S, A> {
    storage: Arc<S>,
    auth: Arc<A>,
}

impl<S, A> Clone for Session<S, A> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            auth: self.auth.clone(),
        }
    }
}

impl<S: LayoutStorage, A: AuthProvider> Session<S, A> {
    pub fn new(storage: Arc<S>, auth: Arc<A>) -> Self {
        Self { storage, auth }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    /// Whether storage calls can be made right now
    pub fn can_use_storage(&self) -> bool {
        !self.storage.requires_auth() || self.auth.is_signed_in()
    }

    fn ensure_access(&self) -> Result<(), EditorError> {
        if self.can_use_storage() {
            Ok(())
        } else {
            Err(EditorError::NotSignedIn)
        }
    }

    pub async fn list_files(&self) -> Result<Vec<FileEntry>, EditorError> {
        self.ensure_access()?;
        self.storage.list_files().await
    }

    /// Save under a normalised name
    pub async fn save_layout(&self, name: &str, record: &LayoutRecord) -> Result<SavedFile, EditorError> {
        self.ensure_access()?;
        let name = normalize_file_name(name)
            .ok_or_else(|| EditorError::Transport("file name is empty".to_string()))?;
        let saved = self.storage.save_file(&name, record).await?;
        tracing::info!("Saved layout '{}' ({} objects)", saved.name, record.objects.len());
        Ok(saved)
    }

    pub async fn load_layout(&self, id: &str) -> Result<LayoutRecord, EditorError> {
        self.ensure_access()?;
        let record = self.storage.load_file_content(id).await?;
        tracing::info!("Loaded layout {id} ({} objects)", record.objects.len());
        Ok(record)
    }

    /// Sign in and look up the user's display name
    pub async fn sign_in(&self) -> Result<Option<String>, EditorError> {
        self.auth.sign_in().await?;
        Ok(self.auth.user_name().await)
    }

    /// Sign out and drop anything the storage cached for the account
    pub async fn sign_out(&self) {
        self.auth.sign_out().await;
        self.storage.invalidate_cache();
    }
}

/// Outcome of a background request, delivered to the UI thread
#[derive(Debug)]
pub enum StorageReply {
    Listed(Result<Vec<FileEntry>, EditorError>),
    Saved(Result<SavedFile, EditorError>),
    Loaded(Result<LayoutRecord, EditorError>),
    SignedIn(Result<Option<String>, EditorError>),
    SignedOut,
}

impl StorageReply {
    /// One-line message for the status bar
    pub fn status_text(&self) -> String {
        match self {
            StorageReply::Listed(Ok(files)) if files.is_empty() => "No layout files found.".to_string(),
            StorageReply::Listed(Ok(files)) => format!("{} layout files", files.len()),
            StorageReply::Listed(Err(e)) => e.to_string(),
            StorageReply::Saved(Ok(saved)) => format!("'{}' saved successfully!", saved.name),
            StorageReply::Saved(Err(e)) => format!("Error saving file: {e}"),
            StorageReply::Loaded(Ok(_)) => "Layout loaded".to_string(),
            StorageReply::Loaded(Err(e)) => format!("Failed to load file: {e}"),
            StorageReply::SignedIn(Ok(name)) => {
                format!("Logged in: {}", name.as_deref().unwrap_or("User"))
            }
            StorageReply::SignedIn(Err(e)) => format!("Sign-in failed: {e}"),
            StorageReply::SignedOut => "Not logged in".to_string(),
        }
    }
}

/// Runs session requests on a tokio runtime and hands replies back over a channel
pub struct SessionJobs<S, A> {
    session: Session<S, A>,
    runtime: tokio::runtime::Runtime,
    tx: mpsc::Sender<StorageReply>,
    rx: mpsc::Receiver<StorageReply>,
    in_flight: usize,
}

impl<S, A> SessionJobs<S, A>
where
    S: LayoutStorage + 'static,
    A: AuthProvider + 'static,
{
    pub fn new(session: Session<S, A>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("desk-io")
            .enable_all()
            .build()?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            session,
            runtime,
            tx,
            rx,
            in_flight: 0,
        })
    }

    pub fn session(&self) -> &Session<S, A> {
        &self.session
    }

    /// Requests sent but not yet polled
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    fn spawn<F, Fut>(&mut self, job: F)
    where
        F: FnOnce(Session<S, A>) -> Fut,
        Fut: std::future::Future<Output = StorageReply> + Send + 'static,
    {
        let tx = self.tx.clone();
        let fut = job(self.session.clone());
        self.in_flight += 1;
        self.runtime.spawn(async move {
            // The receiver only goes away when the app is closing
            let _ = tx.send(fut.await);
        });
    }

    pub fn list_files(&mut self) {
        self.spawn(|s| async move { StorageReply::Listed(s.list_files().await) });
    }

    pub fn save_layout(&mut self, name: String, record: LayoutRecord) {
        self.spawn(|s| async move { StorageReply::Saved(s.save_layout(&name, &record).await) });
    }

    pub fn load_layout(&mut self, id: String) {
        self.spawn(|s| async move { StorageReply::Loaded(s.load_layout(&id).await) });
    }

    pub fn sign_in(&mut self) {
        self.spawn(|s| async move { StorageReply::SignedIn(s.sign_in().await) });
    }

    pub fn sign_out(&mut self) {
        self.spawn(|s| async move {
            s.sign_out().await;
            StorageReply::SignedOut
        });
    }

    /// Replies that arrived since the last poll; never blocks
    pub fn poll(&mut self) -> Vec<StorageReply> {
        let replies: Vec<StorageReply> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(replies.len());
        replies
    }

    /// Wait up to `timeout` for the next reply
    pub fn wait(&mut self, timeout: Duration) -> Option<StorageReply> {
        let reply = self.rx.recv_timeout(timeout).ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(reply)
    }
}
