use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

pub const BG_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 180);
pub const BG_PANEL: Color32 = Color32::from_rgb(12, 12, 16);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(200, 200, 204);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(140, 140, 146);

pub const ACCENT_WARM: Color32 = Color32::from_rgb(255, 230, 204);
pub const ACCENT_BLUE: Color32 = Color32::from_rgb(128, 128, 255);

pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.window_fill = BG_PANEL;
    visuals.panel_fill = BG_PANEL;
    visuals.window_rounding = Rounding::same(6.0);
    visuals.window_stroke = Stroke::new(1.0, Color32::from_white_alpha(24));
    visuals.selection.stroke = Stroke::new(1.0, ACCENT_BLUE);
    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.text_styles = [
        (TextStyle::Small, FontId::new(10.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(11.0, FontFamily::Monospace)),
    ]
    .into();

    ctx.set_style(style);
}
