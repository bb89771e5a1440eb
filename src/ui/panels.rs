use egui::{Context, RichText};

use crate::renderer::Camera;
use crate::ui::theme::*;

const CONTROLS: &[(&str, &str)] = &[
    ("W / S", "forward / back"),
    ("A / D", "left / right"),
    ("Q / E", "up / down"),
    ("Mouse", "look"),
    ("Scroll", "speed"),
    ("P", "toggle projection"),
    ("Esc", "quit"),
];

pub fn draw_help_overlay(ctx: &Context, title: &str, camera: &Camera) {
    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(BG_OVERLAY)
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.label(RichText::new(title).color(ACCENT_WARM).strong());
                    ui.add_space(4.0);

                    ui.style_mut().override_font_id =
                        Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));

                    for (key, action) in CONTROLS {
                        ui.label(RichText::new(format!("{key:<7}{action}")).color(TEXT_MUTED));
                    }

                    ui.add_space(4.0);
                    let pos = camera.position;
                    ui.label(
                        RichText::new(format!(
                            "Pos: ({:.1}, {:.1}, {:.1}) | Speed: {:.2}",
                            pos.x, pos.y, pos.z, camera.move_speed
                        ))
                        .color(TEXT_PRIMARY),
                    );
                    ui.label(
                        RichText::new(format!("Projection: {}", camera.projection.label()))
                            .color(ACCENT_BLUE),
                    );
                });
        });
}
