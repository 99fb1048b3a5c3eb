use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::collections::BTreeMap;

/// Theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

/// Apply the deck theme. Page surfaces use `panel_fill`, which is also the
/// color transitions fade toward.
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode {
        Visuals::dark()
    } else {
        Visuals::light()
    };

    let accent = accent_color();
    if theme.dark_mode {
        let page_bg = Color32::from_rgb(18, 18, 20);
        let widget_bg = Color32::from_rgb(38, 38, 42);
        let text_color = Color32::from_rgb(228, 228, 228);

        visuals.window_fill = page_bg;
        visuals.panel_fill = page_bg;
        visuals.extreme_bg_color = Color32::from_rgb(10, 10, 12);
        visuals.faint_bg_color = widget_bg;

        visuals.widgets.inactive.bg_fill = widget_bg;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text_color);
        visuals.widgets.hovered.bg_fill = Color32::from_rgb(52, 52, 58);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, text_color);
        visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text_color);
    }

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = Rounding::same(6.0);
    }

    visuals.selection.bg_fill = accent.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent);
    visuals.hyperlink_color = accent;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);

    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(12.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(16.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(15.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(30.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    ctx.set_style(style);
    ctx.set_visuals(visuals);
}

/// Get the accent color for the theme
pub fn accent_color() -> Color32 {
    Color32::from_rgb(255, 140, 60)
}

/// Secondary text on page surfaces
pub fn muted_text_color() -> Color32 {
    Color32::from_rgb(150, 150, 156)
}
