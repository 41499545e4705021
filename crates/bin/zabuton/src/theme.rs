//! palette + egui style, light and dark

use eframe::egui::{self, Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color32,
    pub surface: Color32,
    pub surface_alt: Color32,
    pub border: Color32,
    pub text: Color32,
    pub text_muted: Color32,
    pub text_faint: Color32,
    pub primary: Color32,
    pub primary_soft: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub danger: Color32,
}

impl Palette {
    /// evening garden
    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(28, 28, 30),
            surface: Color32::from_rgb(38, 38, 40),
            surface_alt: Color32::from_rgb(32, 34, 36),
            border: Color32::from_rgb(58, 58, 60),
            text: Color32::from_rgb(235, 235, 240),
            text_muted: Color32::from_rgb(152, 152, 157),
            text_faint: Color32::from_gray(90),
            primary: Color32::from_rgb(140, 160, 180),
            primary_soft: Color32::from_rgb(50, 60, 72),
            success: Color32::from_rgb(120, 160, 120),
            warning: Color32::from_rgb(200, 180, 100),
            danger: Color32::from_rgb(200, 100, 100),
        }
    }

    /// paper and ink
    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(244, 242, 238),
            surface: Color32::from_rgb(255, 255, 255),
            surface_alt: Color32::from_rgb(236, 234, 230),
            border: Color32::from_rgb(210, 208, 204),
            text: Color32::from_rgb(30, 30, 34),
            text_muted: Color32::from_rgb(100, 100, 106),
            text_faint: Color32::from_gray(150),
            primary: Color32::from_rgb(64, 96, 128),
            primary_soft: Color32::from_rgb(214, 224, 234),
            success: Color32::from_rgb(60, 128, 72),
            warning: Color32::from_rgb(170, 130, 40),
            danger: Color32::from_rgb(184, 60, 60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub dark_mode: bool,
    pub color: Palette,
}

impl Theme {
    pub fn new(dark_mode: bool) -> Self {
        let color = if dark_mode { Palette::dark() } else { Palette::light() };
        Self { dark_mode, color }
    }

    /// push the palette into egui's style
    pub fn apply(&self, ctx: &egui::Context) {
        let c = self.color;
        let mut style = (*ctx.style()).clone();
        style.visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };

        // generous spacing
        style.spacing.item_spacing = Vec2::new(12.0, 10.0);
        style.spacing.button_padding = Vec2::new(20.0, 8.0);
        style.spacing.indent = 16.0;
        style.spacing.interact_size = Vec2::new(40.0, 28.0);

        let rounding = Rounding::same(6.0);
        style.visuals.window_rounding = Rounding::same(12.0);
        style.visuals.widgets.noninteractive.rounding = rounding;
        style.visuals.widgets.inactive.rounding = rounding;
        style.visuals.widgets.hovered.rounding = rounding;
        style.visuals.widgets.active.rounding = rounding;

        style.visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, c.border);
        style.visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, c.border);
        style.visuals.widgets.hovered.bg_stroke = Stroke::new(1.5, c.primary);
        style.visuals.widgets.active.bg_stroke = Stroke::new(1.5, c.primary);

        style.visuals.window_fill = c.surface;
        style.visuals.panel_fill = c.background;
        style.visuals.extreme_bg_color = c.surface_alt;
        style.visuals.widgets.noninteractive.bg_fill = c.surface;
        style.visuals.widgets.inactive.bg_fill = c.surface_alt;
        style.visuals.widgets.inactive.weak_bg_fill = c.surface_alt;
        style.visuals.widgets.hovered.bg_fill = c.primary_soft;
        style.visuals.widgets.hovered.weak_bg_fill = c.primary_soft;
        style.visuals.widgets.active.bg_fill = c.primary_soft;

        style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, c.text_muted);
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, c.text);
        style.visuals.selection.bg_fill = c.primary.linear_multiply(0.35);
        style.visuals.hyperlink_color = c.primary;
        style.visuals.error_fg_color = c.danger;
        style.visuals.warn_fg_color = c.warning;

        style.text_styles = [
            (TextStyle::Heading, FontId::new(20.0, FontFamily::Proportional)),
            (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
            (TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace)),
            (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
            (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
        ]
        .into();

        ctx.set_style(style);
    }
}

/// default fonts plus phosphor icons as fallback
pub fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}
