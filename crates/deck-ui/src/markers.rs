//! Segmented progress bar, one segment per page

use deck_core::{Marker, MarkerState};
use egui::{Color32, Pos2, Rect, Response, Rounding, Sense, Ui, Vec2};

/// Progress marker styling
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    /// Height of each segment
    pub height: f32,

    /// Gap between segments
    pub spacing: f32,

    /// Unfilled segment color
    pub track_color: Color32,

    /// Passed segments and the active segment's fill
    pub fill_color: Color32,

    /// Last page once it is active
    pub done_color: Color32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            height: 4.0,
            spacing: 4.0,
            track_color: Color32::from_gray(70),
            fill_color: Color32::from_gray(220),
            done_color: crate::theme::accent_color(),
        }
    }
}

impl MarkerStyle {
    /// Geometry of segment `index` out of `count` laid across `rect`
    fn segment_rect(&self, rect: Rect, index: usize, count: usize) -> Rect {
        let count = count.max(1) as f32;
        let width = ((rect.width() - self.spacing * (count - 1.0)) / count).max(1.0);
        let left = rect.left() + index as f32 * (width + self.spacing);
        Rect::from_min_size(
            Pos2::new(left, rect.center().y - self.height / 2.0),
            Vec2::new(width, self.height),
        )
    }
}

/// Draw the markers across the available width
pub fn progress_markers(ui: &mut Ui, markers: &[Marker], style: &MarkerStyle) -> Response {
    let size = Vec2::new(ui.available_width(), style.height * 3.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    if markers.is_empty() || !ui.is_rect_visible(rect) {
        return response;
    }

    let painter = ui.painter_at(rect);
    let rounding = Rounding::same(style.height / 2.0);
    for marker in markers {
        let bar = style.segment_rect(rect, marker.index, markers.len());
        match marker.state {
            MarkerState::Passed => {
                painter.rect_filled(bar, rounding, style.fill_color);
            }
            MarkerState::Upcoming => {
                painter.rect_filled(bar, rounding, style.track_color);
            }
            MarkerState::Active { fill } => {
                painter.rect_filled(bar, rounding, style.track_color);
                if fill > 0.0 {
                    let filled =
                        Rect::from_min_size(bar.min, Vec2::new(bar.width() * fill, bar.height()));
                    painter.rect_filled(filled, rounding, style.fill_color);
                }
            }
            MarkerState::Done => {
                painter.rect_filled(bar, rounding, style.done_color);
                painter.circle_filled(
                    Pos2::new(bar.right(), bar.center().y),
                    style.height * 1.5,
                    style.done_color,
                );
            }
        }
    }

    response
}
