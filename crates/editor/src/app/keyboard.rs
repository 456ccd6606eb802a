//! Keyboard shortcut handling

use desk_core::{KeyCommand, Workspace};
use eframe::egui;

use super::shell::EguiShell;

/// Map pressed keys to workspace commands
pub fn handle_keyboard(ctx: &egui::Context, workspace: &mut Workspace<EguiShell>) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let step = workspace.settings().rotate_step;
    let commands = ctx.input(|i| {
        let mut commands = Vec::new();
        if i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace) {
            commands.push(KeyCommand::DeleteSelected);
        }
        if i.key_pressed(egui::Key::Escape) {
            commands.push(KeyCommand::Deselect);
        }
        // Q / E turn left / right
        if i.key_pressed(egui::Key::Q) {
            commands.push(KeyCommand::RotateSelected(step));
        }
        if i.key_pressed(egui::Key::E) {
            commands.push(KeyCommand::RotateSelected(-step));
        }
        commands
    });

    for command in commands {
        workspace.on_key(command);
    }
}
