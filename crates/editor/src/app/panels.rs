//! Menus, side panels and windows

use desk_core::Workspace;
use desk_editor_lib::settings::{AppSettings, StorageBackend};
use eframe::egui;

use super::shell::EguiShell;
use super::{Action, UiState};

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, workspace: &mut Workspace<EguiShell>, state: &mut UiState, actions: &mut Vec<Action>) {
    ui.menu_button("File", |ui| {
        if ui.button("New desk").clicked() {
            new_desk(workspace, state);
            ui.close_menu();
        }
        if ui.button("Open...").clicked() {
            actions.push(Action::OpenLocalFile);
            ui.close_menu();
        }
        if ui
            .add_enabled(workspace.surface().exists(), egui::Button::new("Save as..."))
            .clicked()
        {
            actions.push(Action::SaveLocalFile);
            ui.close_menu();
        }
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Name:");
            ui.add(egui::TextEdit::singleline(&mut state.save_name).desired_width(120.0));
        });
        if ui.button("Save to storage").clicked() {
            actions.push(Action::SaveToStorage);
            ui.close_menu();
        }
        if ui.button("Load from storage...").clicked() {
            actions.push(Action::ListFiles);
            ui.close_menu();
        }
        ui.separator();
        if ui.button("Settings").clicked() {
            state.show_settings = true;
            ui.close_menu();
        }
        if ui.button("Quit").clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

pub fn account_menu(ui: &mut egui::Ui, state: &UiState, actions: &mut Vec<Action>) {
    ui.menu_button("Account", |ui| {
        ui.label(&state.user_label);
        ui.separator();
        if state.signed_in {
            if ui.button("Sign out").clicked() {
                actions.push(Action::SignOut);
                ui.close_menu();
            }
        } else if ui.button("Sign in").clicked() {
            actions.push(Action::SignIn);
            ui.close_menu();
        }
    });
}

pub fn view_menu(ui: &mut egui::Ui, workspace: &mut Workspace<EguiShell>, state: &mut UiState) {
    ui.menu_button("View", |ui| {
        if ui.button("Toggle grid").clicked() {
            workspace.toggle_grid();
            ui.close_menu();
        }
        if ui.button("Reset camera").clicked() {
            let desk_y = workspace.settings().desk_origin_y;
            workspace.camera = desk_core::OrbitCamera::for_desk(desk_y);
            ui.close_menu();
        }
        if ui.button("Files").clicked() {
            state.show_files = true;
            ui.close_menu();
        }
    });
}

fn new_desk(workspace: &mut Workspace<EguiShell>, state: &mut UiState) {
    match workspace.new_desk(state.desk_width_cm / 100.0, state.desk_depth_cm / 100.0) {
        Ok(()) => state.status = format!("New desk {:.0} x {:.0} cm", state.desk_width_cm, state.desk_depth_cm),
        Err(e) => state.status = e.to_string(),
    }
}

/// Resize the desk in place; objects keep their positions
fn resize_desk(workspace: &mut Workspace<EguiShell>, state: &mut UiState) {
    match workspace.create_surface(state.desk_width_cm / 100.0, state.desk_depth_cm / 100.0) {
        Ok(()) => state.status = format!("Desk resized to {:.0} x {:.0} cm", state.desk_width_cm, state.desk_depth_cm),
        Err(e) => state.status = e.to_string(),
    }
}

/// Catalog list, add button and desk controls
pub fn catalog_panel(ui: &mut egui::Ui, workspace: &mut Workspace<EguiShell>, state: &mut UiState) {
    ui.heading("Catalog");

    let selected_template = workspace.catalog().selected().map(|t| t.id.clone());
    let templates: Vec<(String, String)> = workspace
        .catalog()
        .templates()
        .iter()
        .map(|t| (t.id.clone(), t.name.clone()))
        .collect();

    egui::ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
        for (id, name) in &templates {
            let is_selected = selected_template.as_deref() == Some(id.as_str());
            if ui.selectable_label(is_selected, name).clicked() {
                workspace.select_template(id);
            }
        }
    });

    if ui
        .add_enabled(selected_template.is_some(), egui::Button::new("Add to desk"))
        .clicked()
    {
        match workspace.add_object() {
            Ok(_) => state.status = "Object added".to_string(),
            Err(e) => state.status = e.to_string(),
        }
    }

    ui.separator();
    ui.heading("Desk");

    egui::Grid::new("desk_size").num_columns(2).show(ui, |ui| {
        ui.label("Width");
        ui.add(egui::DragValue::new(&mut state.desk_width_cm).speed(1.0).range(10.0..=500.0).suffix(" cm"));
        ui.end_row();
        ui.label("Depth");
        ui.add(egui::DragValue::new(&mut state.desk_depth_cm).speed(1.0).range(10.0..=500.0).suffix(" cm"));
        ui.end_row();
    });

    ui.horizontal(|ui| {
        if ui.button("New desk").clicked() {
            new_desk(workspace, state);
        }
        if ui.button("Resize desk").clicked() {
            resize_desk(workspace, state);
        }
        if ui.button("Clear objects").clicked() {
            workspace.clear_objects();
            state.status = "Objects cleared".to_string();
        }
    });

    let mut grid = workspace.surface().current().is_some_and(|s| s.grid_visible);
    if ui
        .add_enabled(workspace.surface().exists(), egui::Checkbox::new(&mut grid, "Show grid"))
        .changed()
    {
        workspace.toggle_grid();
    }
}

/// Size and rotation of the selected object
pub fn properties_panel(ui: &mut egui::Ui, workspace: &mut Workspace<EguiShell>, state: &mut UiState) {
    ui.heading("Selection");

    let Some(selected) = workspace.engine().selected() else {
        ui.label(egui::RichText::new("Click an object to select it").weak());
        return;
    };
    let degrees = selected.rotation_y.to_degrees();
    let position = selected.position;

    ui.label(format!("Position: {:.1}, {:.1} cm", position.x * 100.0, position.z * 100.0));
    ui.label(format!("Rotation: {degrees:.0}°"));
    ui.separator();

    egui::Grid::new("object_size").num_columns(2).show(ui, |ui| {
        for (label, value) in ["Width", "Height", "Depth"].iter().zip(state.size_cm.iter_mut()) {
            ui.label(*label);
            ui.add(egui::DragValue::new(value).speed(0.5).range(0.1..=500.0).suffix(" cm"));
            ui.end_row();
        }
    });

    if ui.button("Apply size").clicked() {
        let [w, h, d] = state.size_cm;
        match workspace.rescale_selected(w / 100.0, h / 100.0, d / 100.0) {
            Ok(_) => state.status = format!("Resized to {w:.1} x {h:.1} x {d:.1} cm"),
            Err(e) => state.status = e.to_string(),
        }
    }

    ui.separator();
    let step = workspace.settings().rotate_step;
    ui.horizontal(|ui| {
        if ui.button("⟲ Left").clicked() {
            workspace.rotate_selected(step);
        }
        if ui.button("Right ⟳").clicked() {
            workspace.rotate_selected(-step);
        }
    });
    if ui.button("Delete").clicked() {
        workspace.delete_selected();
    }
}

pub fn status_bar(ui: &mut egui::Ui, workspace: &Workspace<EguiShell>, state: &UiState, busy: bool) {
    ui.horizontal(|ui| {
        if busy {
            ui.spinner();
        }
        ui.label(&state.status);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(&state.user_label);
            ui.separator();
            match workspace.surface().current() {
                Some(desk) => ui.label(format!(
                    "Desk {:.0} x {:.0} cm | {} objects",
                    desk.width * 100.0,
                    desk.depth * 100.0,
                    workspace.engine().len()
                )),
                None => ui.label("No desk"),
            };
        });
    });
}

/// Saved layouts from the storage backend
pub fn files_window(ctx: &egui::Context, state: &mut UiState, actions: &mut Vec<Action>) {
    let mut open = state.show_files;
    egui::Window::new("Layout files")
        .open(&mut open)
        .default_width(320.0)
        .show(ctx, |ui| {
            if ui.button("Refresh").clicked() {
                actions.push(Action::ListFiles);
            }
            ui.separator();
            if state.files.is_empty() {
                ui.label("No layout files found.");
                return;
            }
            egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                for file in &state.files {
                    ui.horizontal(|ui| {
                        if ui.button("Load").clicked() {
                            actions.push(Action::LoadFile(file.id.clone()));
                        }
                        ui.label(&file.name);
                        if let Some(modified) = file.modified_time {
                            ui.label(egui::RichText::new(modified.format("%Y-%m-%d %H:%M").to_string()).weak());
                        }
                    });
                }
            });
        });
    state.show_files = open;
}

pub fn settings_window(
    ctx: &egui::Context,
    settings: &mut AppSettings,
    state: &mut UiState,
    actions: &mut Vec<Action>,
) {
    let mut open = state.show_settings;
    egui::Window::new("Settings")
        .open(&mut open)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Storage");
            let current = settings.storage.backend;
            egui::ComboBox::from_label("Backend")
                .selected_text(current.display_name())
                .show_ui(ui, |ui| {
                    for backend in StorageBackend::all() {
                        ui.selectable_value(&mut settings.storage.backend, *backend, backend.display_name());
                    }
                });
            if settings.storage.backend != current {
                actions.push(Action::StorageChanged);
            }
            ui.horizontal(|ui| {
                ui.label("Drive folder");
                ui.text_edit_singleline(&mut settings.storage.app_folder);
            });
            ui.add_space(10.0);

            ui.heading("Interface");
            ui.horizontal(|ui| {
                ui.label("Font size");
                ui.add(
                    egui::DragValue::new(&mut settings.ui.font_size)
                        .speed(0.5)
                        .range(8.0..=24.0)
                        .suffix(" pt"),
                );
            });
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Apply").clicked() {
                    settings.save();
                    actions.push(Action::StorageChanged);
                }
                if ui.button("Reset").clicked() {
                    *settings = AppSettings::default();
                }
            });
        });
    state.show_settings = open;
}
