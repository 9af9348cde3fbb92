use egui::Context;
use glam::Vec3;

/// Data the overlay reads (and the one knob it writes) each frame.
pub struct UiState<'a> {
    pub fps: f32,
    pub player_pos: Vec3,
    pub speed: f32,
    pub camera_mode: &'a str,
    pub is_dodging: bool,
    pub dodge_ready: bool,
    pub projectile_count: usize,
    pub pointer_locked: bool,
    pub sensitivity: &'a mut f32,
}

pub fn draw(ctx: &Context, state: &mut UiState) {
    if state.pointer_locked {
        draw_crosshair(ctx);
    }
    draw_debug_window(ctx, state);
    draw_settings_window(ctx, state);
}

fn draw_crosshair(ctx: &Context) {
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::TOP,
        egui::Id::new("crosshair"),
    ));
    let screen_size = ctx.available_rect();
    let center = screen_size.center();
    let size = 10.0;
    painter.line_segment(
        [
            egui::Pos2::new(center.x - size, center.y),
            egui::Pos2::new(center.x + size, center.y),
        ],
        egui::Stroke::new(1.0, egui::Color32::WHITE),
    );
    painter.line_segment(
        [
            egui::Pos2::new(center.x, center.y - size),
            egui::Pos2::new(center.x, center.y + size),
        ],
        egui::Stroke::new(1.0, egui::Color32::WHITE),
    );
}

fn draw_debug_window(ctx: &Context, state: &UiState) {
    let dodge = if state.is_dodging {
        "dodging"
    } else if state.dodge_ready {
        "ready"
    } else {
        "cooldown"
    };

    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {:.0}", state.fps)).small());
            ui.label(
                egui::RichText::new(format!(
                    "Pos: x: {:.1} y: {:.1} z: {:.1}",
                    state.player_pos.x, state.player_pos.y, state.player_pos.z
                ))
                .small(),
            );
            ui.label(egui::RichText::new(format!("Speed: {:.1} u/s", state.speed)).small());
            ui.label(egui::RichText::new(format!("Camera: {}", state.camera_mode)).small());
            ui.label(egui::RichText::new(format!("Dodge: {dodge}")).small());
            ui.label(
                egui::RichText::new(format!("Projectiles: {}", state.projectile_count)).small(),
            );
            ui.separator();
            ui.label(egui::RichText::new("Controls:").small());
            ui.label(egui::RichText::new("WASD - Move").small());
            ui.label(egui::RichText::new("Shift - Run").small());
            ui.label(egui::RichText::new("Space - Dodge").small());
            ui.label(egui::RichText::new("Click - Lock pointer / shoot").small());
            ui.label(egui::RichText::new("C - Toggle camera rig").small());
            ui.label(egui::RichText::new("Esc - Release pointer").small());
        });
}

fn draw_settings_window(ctx: &Context, state: &mut UiState) {
    egui::Window::new("Settings")
        .default_pos([ctx.available_rect().width() - 160.0, 8.0])
        .default_size([140.0, 80.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("Mouse sensitivity").small());
            ui.add(
                egui::Slider::new(&mut *state.sensitivity, 0.001..=0.02)
                    .logarithmic(true)
                    .step_by(0.0),
            );
        });
}
