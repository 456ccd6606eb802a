//! Main application module

mod keyboard;
mod panels;
mod shell;
mod styles;
mod viewport;

use std::sync::Arc;

use desk_core::{Catalog, ObjectId, Workspace};
use desk_editor_lib::auth::{AuthProvider, TokenAuth};
use desk_editor_lib::session::{normalize_file_name, snapshot_for_save, Session, SessionJobs, StorageReply};
use desk_editor_lib::settings::AppSettings;
use desk_editor_lib::storage::{FileEntry, Storage};
use eframe::egui;
use shared::LayoutRecord;

use shell::EguiShell;
use viewport::ViewportPanel;

/// Something a panel asked for that needs more than the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    SaveToStorage,
    ListFiles,
    LoadFile(String),
    SignIn,
    SignOut,
    OpenLocalFile,
    SaveLocalFile,
    /// Storage backend changed in settings; rebuild the session
    StorageChanged,
}

/// Transient panel state
pub(crate) struct UiState {
    pub status: String,
    pub save_name: String,
    pub desk_width_cm: f64,
    pub desk_depth_cm: f64,
    /// Resize fields for the selected object
    pub size_cm: [f64; 3],
    /// Object the resize fields were last filled from
    pub size_for: Option<ObjectId>,
    pub files: Vec<FileEntry>,
    pub show_files: bool,
    pub signed_in: bool,
    pub user_label: String,
    pub show_settings: bool,
}

impl UiState {
    fn new(settings: &AppSettings) -> Self {
        Self {
            status: "Ready".to_string(),
            save_name: "layout".to_string(),
            desk_width_cm: settings.placement.default_desk_width * 100.0,
            desk_depth_cm: settings.placement.default_desk_depth * 100.0,
            size_cm: [10.0, 10.0, 10.0],
            size_for: None,
            files: Vec::new(),
            show_files: false,
            signed_in: false,
            user_label: "Not logged in".to_string(),
            show_settings: false,
        }
    }
}

/// Main application
pub struct DeskApp {
    workspace: Workspace<EguiShell>,
    viewport: ViewportPanel,
    settings: AppSettings,
    jobs: Option<SessionJobs<Storage, TokenAuth>>,
    ui: UiState,
    /// Last applied font size (to detect changes)
    last_font_size: f32,
}

fn build_jobs(settings: &AppSettings) -> Option<SessionJobs<Storage, TokenAuth>> {
    let auth = Arc::new(TokenAuth::from_env());
    let storage = Arc::new(Storage::from_settings(&settings.storage, auth.clone()));
    tracing::info!("Using {} storage", storage.backend().display_name());
    match SessionJobs::new(Session::new(storage, auth)) {
        Ok(jobs) => Some(jobs),
        Err(e) => {
            tracing::error!("Failed to start storage runtime: {e}");
            None
        }
    }
}

impl DeskApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_layout: Option<LayoutRecord>) -> Self {
        let settings = AppSettings::load();
        let mut workspace = Workspace::start(settings.placement.clone(), Catalog::builtin(), EguiShell::new());
        let mut ui = UiState::new(&settings);

        if let Some(record) = initial_layout {
            match workspace.apply_layout_record(&record) {
                Ok(()) => ui.status = "Layout loaded".to_string(),
                Err(e) => ui.status = format!("Failed to load file: {e}"),
            }
        }

        styles::configure_styles(&cc.egui_ctx, settings.ui.font_size);

        let jobs = build_jobs(&settings);
        if let Some(jobs) = &jobs {
            ui.signed_in = jobs.session().auth().is_signed_in();
        }

        let last_font_size = settings.ui.font_size;
        Self {
            workspace,
            viewport: ViewportPanel::new(),
            settings,
            jobs,
            ui,
            last_font_size,
        }
    }

    fn poll_jobs(&mut self) {
        let Some(jobs) = self.jobs.as_mut() else {
            return;
        };

        let mut refresh = false;
        for reply in jobs.poll() {
            self.ui.status = reply.status_text();
            match reply {
                StorageReply::Listed(Ok(files)) => {
                    self.ui.files = files;
                    self.ui.show_files = true;
                }
                StorageReply::Loaded(Ok(record)) => {
                    if let Err(e) = self.workspace.apply_layout_record(&record) {
                        self.ui.status = format!("Failed to load file: {e}");
                    }
                    self.ui.show_files = false;
                }
                StorageReply::Saved(Ok(_)) => refresh = self.ui.show_files,
                StorageReply::SignedIn(Ok(name)) => {
                    self.ui.signed_in = true;
                    self.ui.user_label = format!("Logged in: {}", name.as_deref().unwrap_or("User"));
                }
                StorageReply::SignedIn(Err(_)) | StorageReply::SignedOut => {
                    self.ui.signed_in = false;
                    self.ui.user_label = "Not logged in".to_string();
                    self.ui.files.clear();
                }
                StorageReply::Listed(Err(_)) | StorageReply::Loaded(Err(_)) | StorageReply::Saved(Err(_)) => {}
            }
        }

        if refresh {
            jobs.list_files();
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::OpenLocalFile => self.open_local_file(),
            Action::SaveLocalFile => self.save_local_file(),
            Action::StorageChanged => {
                self.settings.save();
                self.jobs = build_jobs(&self.settings);
                self.ui.files.clear();
                self.ui.show_files = false;
                self.ui.signed_in = self
                    .jobs
                    .as_ref()
                    .is_some_and(|jobs| jobs.session().auth().is_signed_in());
            }
            action => self.handle_storage_action(action),
        }
    }

    fn handle_storage_action(&mut self, action: Action) {
        let Some(jobs) = self.jobs.as_mut() else {
            self.ui.status = "Storage is unavailable".to_string();
            return;
        };

        match action {
            Action::SaveToStorage => {
                let Some(name) = normalize_file_name(&self.ui.save_name) else {
                    self.ui.status = "Enter a file name".to_string();
                    return;
                };
                match snapshot_for_save(&self.workspace) {
                    Ok(record) => {
                        self.ui.status = format!("Saving '{name}'...");
                        jobs.save_layout(name, record);
                    }
                    Err(e) => self.ui.status = format!("Error saving file: {e}"),
                }
            }
            Action::ListFiles => {
                self.ui.status = "Loading file list...".to_string();
                jobs.list_files();
            }
            Action::LoadFile(id) => {
                self.ui.status = "Loading layout...".to_string();
                jobs.load_layout(id);
            }
            Action::SignIn => jobs.sign_in(),
            Action::SignOut => jobs.sign_out(),
            Action::OpenLocalFile | Action::SaveLocalFile | Action::StorageChanged => {}
        }
    }

    fn open_local_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Open layout")
            .add_filter("JSON", &["json"])
            .pick_file()
        else {
            return;
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match self.workspace.apply_layout_json(&json) {
                Ok(()) => {
                    tracing::info!("Loaded layout from {}", path.display());
                    self.ui.status = format!("Loaded {}", path.display());
                }
                Err(e) => {
                    tracing::error!("Failed to parse layout: {e}");
                    self.ui.status = format!("Failed to load file: {e}");
                }
            },
            Err(e) => {
                tracing::error!("Failed to read file: {e}");
                self.ui.status = format!("Failed to load file: {e}");
            }
        }
    }

    fn save_local_file(&mut self) {
        let record = match self.workspace.export_layout() {
            Ok(record) => record,
            Err(e) => {
                self.ui.status = format!("Error saving file: {e}");
                return;
            }
        };
        let file_name = normalize_file_name(&self.ui.save_name).unwrap_or_else(|| "layout.json".to_string());
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save layout")
            .add_filter("JSON", &["json"])
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };

        if let Err(e) = std::fs::write(&path, record.to_json_pretty()) {
            tracing::error!("Failed to write layout: {e}");
            self.ui.status = format!("Error saving file: {e}");
        } else {
            tracing::info!("Saved layout to {}", path.display());
            self.ui.status = format!("Saved {}", path.display());
        }
    }

    /// Refill the resize fields when the selection changes
    fn sync_size_fields(&mut self) {
        let selected = self.workspace.shell.selected;
        if selected != self.ui.size_for {
            if let Some(size) = self.workspace.shell.selected_size_cm {
                self.ui.size_cm = size;
            }
            self.ui.size_for = selected;
        }
    }
}

impl eframe::App for DeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size if changed
        if self.settings.ui.font_size != self.last_font_size {
            styles::apply_font_size(ctx, self.settings.ui.font_size);
            self.last_font_size = self.settings.ui.font_size;
        }

        self.poll_jobs();
        if self.jobs.as_ref().is_some_and(|jobs| jobs.is_busy()) {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        keyboard::handle_keyboard(ctx, &mut self.workspace);
        self.sync_size_fields();

        let mut actions = Vec::new();

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                panels::file_menu(ui, &mut self.workspace, &mut self.ui, &mut actions);
                panels::account_menu(ui, &self.ui, &mut actions);
                panels::view_menu(ui, &mut self.workspace, &mut self.ui);
            });
        });

        // ── Windows ──────────────────────────────────────────
        panels::settings_window(ctx, &mut self.settings, &mut self.ui, &mut actions);
        panels::files_window(ctx, &mut self.ui, &mut actions);

        // ── Status bar ───────────────────────────────────────
        let busy = self.jobs.as_ref().is_some_and(|jobs| jobs.is_busy());
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)))
            .show(ctx, |ui| {
                panels::status_bar(ui, &self.workspace, &self.ui, busy);
            });

        // ── Left panel: catalog and desk ─────────────────────
        egui::SidePanel::left("catalog")
            .default_width(210.0)
            .width_range(160.0..=360.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)))
            .show(ctx, |ui| {
                panels::catalog_panel(ui, &mut self.workspace, &mut self.ui);
            });

        // ── Right panel: selected object ─────────────────────
        egui::SidePanel::right("properties")
            .default_width(220.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)))
            .show(ctx, |ui| {
                panels::properties_panel(ui, &mut self.workspace, &mut self.ui);
            });

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default().frame(egui::Frame::NONE).show(ctx, |ui| {
            self.viewport.show(ui, &mut self.workspace);
        });

        for action in actions {
            self.handle_action(action);
        }
    }
}
