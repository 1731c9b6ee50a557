use eframe::egui;
use egui::{Color32, CornerRadius, Margin, Stroke};

/// Page title and primary buttons
pub const ACCENT_COLOR: Color32 = Color32::from_rgb(76, 175, 80);
/// Section headings ("Upload Your File", "Data Preview", ...)
pub const HEADING_COLOR: Color32 = Color32::from_rgb(255, 99, 71);
/// Form labels
pub const LABEL_COLOR: Color32 = Color32::from_rgb(30, 144, 255);
pub const ERROR_COLOR: Color32 = Color32::from_rgb(198, 40, 40);

const PANEL_FILL: Color32 = Color32::from_rgb(240, 242, 246);
const CARD_FILL: Color32 = Color32::from_rgb(250, 250, 250);
const BORDER: Color32 = Color32::from_rgb(221, 221, 221);

pub const SPACING_SMALL: f32 = 6.0;
pub const SPACING_MEDIUM: f32 = 10.0;
pub const SPACING_LARGE: f32 = 18.0;

/// Light look with green accents and rounded widgets.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::light();
    let rounding = CornerRadius::same(5);

    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.corner_radius = rounding;
    }
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT_COLOR);
    visuals.widgets.active.weak_bg_fill = ACCENT_COLOR;
    visuals.selection.bg_fill = ACCENT_COLOR.gamma_multiply(0.35);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT_COLOR);
    visuals.panel_fill = Color32::WHITE;
    visuals.striped = true;

    ctx.set_visuals(visuals);
}

pub fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(CARD_FILL)
        .stroke(Stroke::new(1.0, BORDER))
        .corner_radius(CornerRadius::same(8))
        .inner_margin(Margin::same(12))
}

pub fn sidebar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(PANEL_FILL)
        .inner_margin(Margin::symmetric(14, 12))
}
