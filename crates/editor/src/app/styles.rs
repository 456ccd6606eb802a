//! Look and feel

use eframe::egui;

/// Scene background behind the desk
pub const VIEWPORT_BG: egui::Color32 = egui::Color32::from_rgb(0xf0, 0xf0, 0xf0);
pub const SLAB_FILL: egui::Color32 = egui::Color32::from_rgb(0x8b, 0x6f, 0x4e);
pub const SLAB_EDGE: egui::Color32 = egui::Color32::from_rgb(0x5c, 0x47, 0x30);
pub const GRID_MINOR: egui::Color32 = egui::Color32::from_rgb(0xc8, 0xc8, 0xc8);
pub const GRID_MAJOR: egui::Color32 = egui::Color32::from_rgb(0x88, 0x88, 0x88);
pub const SELECTION: egui::Color32 = egui::Color32::from_rgb(0xff, 0xa5, 0x00);

/// Light theme, compact spacing, and the configured font size
pub fn configure_styles(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();
    style.visuals = egui::Visuals::light();

    style.visuals.window_corner_radius = egui::CornerRadius::same(8);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(4);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(4);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(4);
    style.visuals.selection.bg_fill = egui::Color32::from_rgb(0x4a, 0x86, 0xe8);

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);

    apply_text_styles(&mut style, font_size);
    ctx.set_style(style);
}

pub fn apply_font_size(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();
    apply_text_styles(&mut style, font_size);
    ctx.set_style(style);
}

fn apply_text_styles(style: &mut egui::Style, font_size: f32) {
    use egui::{FontId, TextStyle};
    let sizes = [
        (TextStyle::Body, FontId::proportional(font_size)),
        (TextStyle::Button, FontId::proportional(font_size)),
        (TextStyle::Small, FontId::proportional(font_size * 0.85)),
        (TextStyle::Heading, FontId::proportional(font_size * 1.3)),
        (TextStyle::Monospace, FontId::monospace(font_size)),
    ];
    for (text_style, font) in sizes {
        style.text_styles.insert(text_style, font);
    }
}

/// Core colour as an egui colour
pub fn rgb(color: shared::Rgb) -> egui::Color32 {
    let [r, g, b] = color.to_array();
    egui::Color32::from_rgb(r, g, b)
}
