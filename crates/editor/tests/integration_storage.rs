//! Save and load a desk through the session with real storage backends.

use std::sync::Arc;

use desk_core::{Catalog, EditorError, NullShell, PlacementSettings, Workspace};
use desk_editor_lib::auth::{AuthProvider, TokenAuth, TokenSource};
use desk_editor_lib::session::{snapshot_for_save, Session};
use desk_editor_lib::storage::{DriveStorage, LocalStorage, MemoryStorage};

fn signed_out_auth() -> Arc<TokenAuth> {
    Arc::new(TokenAuth::new(TokenSource::Static(String::new())))
}

fn workspace_with_objects() -> Workspace<NullShell> {
    let mut ws = Workspace::start(PlacementSettings::default(), Catalog::builtin(), NullShell);
    ws.select_template("book-vertical");
    ws.add_object().unwrap();
    ws.select_template("mouse-pad");
    ws.add_object().unwrap();
    ws
}

#[tokio::test]
async fn test_local_save_then_load_into_new_workspace() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::new(Arc::new(LocalStorage::new(dir.path())), signed_out_auth());
    let ws = workspace_with_objects();
    let record = snapshot_for_save(&ws).unwrap();

    let saved = session.save_layout("office", &record).await.unwrap();
    assert_eq!(saved.name, "office.json");
    assert!(dir.path().join("office.json").exists());

    let files = session.list_files().await.unwrap();
    assert_eq!(files.len(), 1);
    let loaded = session.load_layout(&files[0].id).await.unwrap();

    let mut other = Workspace::empty(PlacementSettings::default(), Catalog::builtin(), NullShell);
    other.apply_layout_record(&loaded).unwrap();
    assert_eq!(other.engine().len(), 3);
    assert_eq!(other.export_layout().unwrap(), record);
}

#[tokio::test]
async fn test_saving_same_name_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::new(Arc::new(LocalStorage::new(dir.path())), signed_out_auth());
    let mut ws = workspace_with_objects();

    session.save_layout("desk", &snapshot_for_save(&ws).unwrap()).await.unwrap();
    ws.clear_objects();
    let empty = snapshot_for_save(&ws).unwrap();
    session.save_layout("desk.json", &empty).await.unwrap();

    let files = session.list_files().await.unwrap();
    assert_eq!(files.len(), 1);
    let loaded = session.load_layout(&files[0].id).await.unwrap();
    assert!(loaded.objects.is_empty());
}

#[tokio::test]
async fn test_corrupt_file_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), "{\"desk\": 5}").unwrap();
    let session = Session::new(Arc::new(LocalStorage::new(dir.path())), signed_out_auth());

    let err = session.load_layout("broken.json").await.unwrap_err();
    assert!(matches!(err, EditorError::MalformedRecord(_)));
}

#[tokio::test]
async fn test_snapshot_without_desk_fails() {
    let ws = Workspace::empty(PlacementSettings::default(), Catalog::builtin(), NullShell);
    assert!(matches!(snapshot_for_save(&ws), Err(EditorError::NoSurface)));
}

#[tokio::test]
async fn test_drive_needs_sign_in() {
    let auth = signed_out_auth();
    let drive = DriveStorage::new(auth.clone(), "DescoApp").with_endpoints("http://127.0.0.1:9", "http://127.0.0.1:9");
    let session = Session::new(Arc::new(drive), auth.clone());
    assert!(!session.can_use_storage());

    let record = snapshot_for_save(&workspace_with_objects()).unwrap();
    assert!(matches!(session.save_layout("x", &record).await, Err(EditorError::NotSignedIn)));
    assert!(matches!(session.list_files().await, Err(EditorError::NotSignedIn)));

    // Blank static token cannot sign in
    assert!(session.sign_in().await.is_err());
    assert!(!auth.is_signed_in());
}

#[tokio::test]
async fn test_memory_storage_needs_no_account() {
    let session = Session::new(Arc::new(MemoryStorage::new()), signed_out_auth());
    assert!(session.can_use_storage());
    let record = snapshot_for_save(&workspace_with_objects()).unwrap();
    let saved = session.save_layout("m", &record).await.unwrap();
    assert_eq!(session.load_layout(&saved.id).await.unwrap(), record);
}
