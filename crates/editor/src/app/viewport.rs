//! 3D viewport: forwards pointer input to the workspace and paints the desk
//! and objects with the egui painter.

use desk_core::{PlacedObject, ScreenPoint, ViewportRect, Workspace};
use eframe::egui;
use glam::DVec3;

use super::shell::EguiShell;
use super::styles;

const HANDLE_RADIUS: f32 = 11.0;
const HANDLE_OFFSET: egui::Vec2 = egui::vec2(18.0, -30.0);

/// Box faces as corner indices (see `PlacedObject::corners`), with a shade factor
const FACES: [([usize; 4], f32); 6] = [
    ([4, 5, 7, 6], 1.0),  // top
    ([0, 1, 3, 2], 0.5),  // bottom
    ([0, 2, 6, 4], 0.75), // -x
    ([1, 3, 7, 5], 0.75), // +x
    ([0, 1, 5, 4], 0.85), // -z
    ([2, 3, 7, 6], 0.85), // +z
];

const EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 3), (3, 2), (2, 0),
    (4, 5), (5, 7), (7, 6), (6, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handle {
    Rotate,
    Delete,
}

/// Central panel showing the desk
#[derive(Default)]
pub struct ViewportPanel {
    /// The current primary press started on empty space and drives the camera
    orbiting: bool,
}

fn to_viewport(rect: egui::Rect) -> ViewportRect {
    ViewportRect {
        left: rect.left() as f64,
        top: rect.top() as f64,
        width: rect.width() as f64,
        height: rect.height() as f64,
    }
}

fn to_screen(pos: egui::Pos2) -> ScreenPoint {
    ScreenPoint::new(pos.x as f64, pos.y as f64)
}

fn to_pos(p: ScreenPoint) -> egui::Pos2 {
    egui::pos2(p.x as f32, p.y as f32)
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, workspace: &mut Workspace<EguiShell>) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        let viewport = to_viewport(rect);

        self.handle_pointer(ui, &response, viewport, workspace);
        self.handle_camera(ui, &response, workspace);

        if !ui.is_rect_visible(rect) {
            return;
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, styles::VIEWPORT_BG);
        draw_desk(&painter, workspace, viewport);
        draw_objects(&painter, workspace, viewport);
        draw_handles(&painter, workspace, viewport);

        if workspace.engine().is_gesture_active() || workspace.shell.handles_dirty {
            workspace.shell.handles_dirty = false;
            ui.ctx().request_repaint();
        }
    }

    fn handle_pointer(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        viewport: ViewportRect,
        workspace: &mut Workspace<EguiShell>,
    ) {
        let (pressed, released, moved, has_pointer, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.delta() != egui::Vec2::ZERO,
                i.pointer.has_pointer(),
                i.pointer.latest_pos(),
            )
        });

        if pressed && response.hovered() {
            if let Some(pos) = pos {
                let screen = to_screen(pos);
                match handle_at(workspace, viewport, pos) {
                    Some(Handle::Rotate) => {
                        workspace.on_rotate_handle_down(screen);
                        self.orbiting = false;
                    }
                    Some(Handle::Delete) => {
                        workspace.delete_selected();
                        self.orbiting = false;
                    }
                    None => {
                        let hit = workspace.on_pointer_down(screen, viewport);
                        self.orbiting = hit.is_none();
                    }
                }
            }
        }

        if moved && workspace.engine().is_gesture_active() {
            if let Some(pos) = pos {
                workspace.on_pointer_move(to_screen(pos), viewport);
            }
        }

        if released {
            workspace.on_pointer_up();
            self.orbiting = false;
        } else if !has_pointer && workspace.engine().is_gesture_active() {
            workspace.on_pointer_cancel();
            self.orbiting = false;
        }
    }

    fn handle_camera(&mut self, ui: &egui::Ui, response: &egui::Response, workspace: &mut Workspace<EguiShell>) {
        let delta = response.drag_delta();
        if (self.orbiting && response.dragged_by(egui::PointerButton::Primary))
            || response.dragged_by(egui::PointerButton::Middle)
        {
            workspace.camera.rotate(delta.x as f64, delta.y as f64);
        }
        if response.dragged_by(egui::PointerButton::Secondary) {
            workspace.camera.pan(-delta.x as f64 * 0.002, delta.y as f64 * 0.002);
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                workspace.camera.zoom(scroll as f64 * 0.002);
            }
        }
    }
}

/// Centres of the rotate and delete handles, if something is selected and on screen
fn handle_positions(workspace: &Workspace<EguiShell>, viewport: ViewportRect) -> Option<(egui::Pos2, egui::Pos2)> {
    let anchor = to_pos(workspace.selection_anchor(viewport)?);
    let rotate = anchor + egui::vec2(-HANDLE_OFFSET.x, HANDLE_OFFSET.y);
    let delete = anchor + HANDLE_OFFSET;
    Some((rotate, delete))
}

fn handle_at(workspace: &Workspace<EguiShell>, viewport: ViewportRect, pos: egui::Pos2) -> Option<Handle> {
    let (rotate, delete) = handle_positions(workspace, viewport)?;
    if rotate.distance(pos) <= HANDLE_RADIUS {
        Some(Handle::Rotate)
    } else if delete.distance(pos) <= HANDLE_RADIUS {
        Some(Handle::Delete)
    } else {
        None
    }
}

fn project(workspace: &Workspace<EguiShell>, viewport: ViewportRect, p: DVec3) -> Option<egui::Pos2> {
    workspace.camera.project(p, viewport).map(to_pos)
}

fn draw_desk(painter: &egui::Painter, workspace: &Workspace<EguiShell>, viewport: ViewportRect) {
    let Some(surface) = workspace.surface().current() else {
        return;
    };

    if surface.slab_visible {
        let corners: Option<Vec<egui::Pos2>> = surface
            .top_corners()
            .iter()
            .map(|c| project(workspace, viewport, *c))
            .collect();
        if let Some(points) = corners {
            painter.add(egui::Shape::convex_polygon(
                points,
                styles::SLAB_FILL,
                egui::Stroke::new(1.5, styles::SLAB_EDGE),
            ));
        }
    }

    if surface.grid_visible {
        for line in surface.grid_lines() {
            let (Some(a), Some(b)) = (
                project(workspace, viewport, line.start),
                project(workspace, viewport, line.end),
            ) else {
                continue;
            };
            let stroke = if line.major {
                egui::Stroke::new(1.2, styles::GRID_MAJOR)
            } else {
                egui::Stroke::new(0.5, styles::GRID_MINOR)
            };
            painter.line_segment([a, b], stroke);
        }
    }
}

fn shade(color: egui::Color32, factor: f32) -> egui::Color32 {
    let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
    egui::Color32::from_rgb(scale(color.r()), scale(color.g()), scale(color.b()))
}

fn draw_objects(painter: &egui::Painter, workspace: &Workspace<EguiShell>, viewport: ViewportRect) {
    let eye = workspace.camera.eye_position();
    let selected = workspace.engine().selected_id();

    // Far to near
    let mut objects: Vec<&PlacedObject> = workspace.engine().objects().iter().collect();
    objects.sort_by(|a, b| {
        let da = a.position.distance_squared(eye);
        let db = b.position.distance_squared(eye);
        db.total_cmp(&da)
    });

    for obj in objects {
        let corners = obj.corners();
        let Some(screen): Option<Vec<egui::Pos2>> = corners
            .iter()
            .map(|c| project(workspace, viewport, *c))
            .collect()
        else {
            continue;
        };
        let base = styles::rgb(obj.color);

        for (face, factor) in FACES {
            let center = face.iter().map(|&i| corners[i]).sum::<DVec3>() / 4.0;
            // Skip faces pointing away from the camera
            if (center - obj.position).dot(eye - center) <= 0.0 {
                continue;
            }
            let points = face.iter().map(|&i| screen[i]).collect();
            painter.add(egui::Shape::convex_polygon(points, shade(base, factor), egui::Stroke::NONE));
        }

        let stroke = if selected == Some(obj.id) {
            egui::Stroke::new(2.0, styles::SELECTION)
        } else {
            egui::Stroke::new(0.8, shade(base, 0.4))
        };
        for (a, b) in EDGES {
            painter.line_segment([screen[a], screen[b]], stroke);
        }
    }
}

fn draw_handles(painter: &egui::Painter, workspace: &Workspace<EguiShell>, viewport: ViewportRect) {
    let Some((rotate, delete)) = handle_positions(workspace, viewport) else {
        return;
    };
    let font = egui::FontId::proportional(14.0);
    for (pos, glyph, fill) in [
        (rotate, "⟲", egui::Color32::from_rgb(0x4a, 0x86, 0xe8)),
        (delete, "✕", egui::Color32::from_rgb(0xd9, 0x53, 0x4f)),
    ] {
        painter.circle(pos, HANDLE_RADIUS, fill, egui::Stroke::new(1.0, egui::Color32::WHITE));
        painter.text(pos, egui::Align2::CENTER_CENTER, glyph, font.clone(), egui::Color32::WHITE);
    }
}
