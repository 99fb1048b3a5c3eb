//! Page surface widget
//!
//! [`DeckView`] owns only animation bookkeeping. Each frame it reads the
//! cursor back through [`DeckController::sync`], forwards drags on the page
//! surface and arrow keys at the window scope, and paints the entering and
//! exiting pages with the poses sampled from the controller's motion.

use std::hash::Hash;

use deck_core::{DeckController, Pose, Transition, TransitionMotion};
use egui::{Color32, Id, Rect, Response, Rounding, Sense, Ui, Vec2};

use crate::input::{bind_drag, forward_keys};
use crate::markers::{progress_markers, MarkerStyle};

/// Deck view configuration
#[derive(Debug, Clone)]
pub struct DeckViewConfig {
    /// Draw the progress markers above the page surface
    pub show_markers: bool,

    pub marker_style: MarkerStyle,

    /// Color hidden pages fade toward; defaults to the panel fill
    pub fade_color: Option<Color32>,

    /// Pages follow the pointer while dragging
    pub follow_drag: bool,
}

impl Default for DeckViewConfig {
    fn default() -> Self {
        Self {
            show_markers: true,
            marker_style: MarkerStyle::default(),
            fade_color: None,
            follow_drag: true,
        }
    }
}

/// What happened during one frame of the view
pub struct DeckViewResponse {
    /// Response of the page surface
    pub response: Response,

    /// Page change observed at the start of this frame
    pub transition: Option<Transition>,
}

struct ActiveAnimation {
    transition: Transition,
    motion: TransitionMotion,
    started_at: f64,
}

impl ActiveAnimation {
    fn progress(&self, now: f64) -> f32 {
        if self.motion.duration_ms == 0 {
            return 1.0;
        }
        let elapsed_ms = (now - self.started_at) * 1000.0;
        (elapsed_ms / self.motion.duration_ms as f64) as f32
    }
}

/// Swipeable page surface for a [`DeckController`]
pub struct DeckView {
    id: Id,
    config: DeckViewConfig,
    animation: Option<ActiveAnimation>,
}

impl DeckView {
    pub fn new(id_source: impl Hash) -> Self {
        Self {
            id: Id::new(id_source),
            config: DeckViewConfig::default(),
            animation: None,
        }
    }

    /// Set configuration
    pub fn with_config(mut self, config: DeckViewConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DeckViewConfig {
        &self.config
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Show the deck, calling `add_page` for every page that is on screen
    pub fn show<P>(
        &mut self,
        ui: &mut Ui,
        deck: &DeckController<P>,
        mut add_page: impl FnMut(&mut Ui, &P),
    ) -> DeckViewResponse {
        let transition = deck.sync();
        let now = ui.input(|i| i.time);

        if let Some(next) = deck.take_transition() {
            match deck.motion(next.direction) {
                Some(motion) => {
                    self.animation = Some(ActiveAnimation {
                        transition: next,
                        motion,
                        started_at: now,
                    });
                }
                None => {
                    self.animation = None;
                    deck.finish_transition();
                }
            }
        }

        if self.config.show_markers && !deck.is_empty() {
            progress_markers(ui, &deck.markers(), &self.config.marker_style);
        }

        let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let response = ui.interact(rect, self.id, Sense::drag());

        bind_drag(ui, &response, deck);
        forward_keys(ui.ctx(), deck);

        let fade = self.config.fade_color.unwrap_or(ui.visuals().panel_fill);
        let finished = match &self.animation {
            Some(animation) => {
                let t = animation.progress(now);
                let exiting = animation.transition.from.and_then(|index| deck.page(index));
                if let Some(page) = exiting {
                    let pose = animation.motion.exit.sample(t);
                    paint_page(ui, rect, pose, fade, page, &mut add_page);
                }
                if let Some(page) = deck.page(animation.transition.to) {
                    let pose = animation.motion.enter.sample(t);
                    paint_page(ui, rect, pose, fade, page, &mut add_page);
                }
                t >= 1.0
            }
            None => {
                if let Some(page) = deck.current_page() {
                    let pose = Pose {
                        offset_x: if self.config.follow_drag {
                            deck.drag_offset()
                        } else {
                            0.0
                        },
                        ..Pose::REST
                    };
                    paint_page(ui, rect, pose, fade, page, &mut add_page);
                }
                false
            }
        };

        if finished {
            self.animation = None;
            deck.finish_transition();
        }
        if self.animation.is_some() || deck.is_counting_down() {
            ui.ctx().request_repaint();
        }

        DeckViewResponse {
            response,
            transition,
        }
    }
}

/// Page rect for `pose` inside `surface`
fn posed_rect(surface: Rect, pose: Pose) -> Rect {
    Rect::from_center_size(
        surface.center() + Vec2::new(pose.offset_x, 0.0),
        surface.size() * pose.scale,
    )
}

/// Alpha of the fade overlay that stands in for page opacity
fn overlay_alpha(opacity: f32) -> u8 {
    ((1.0 - opacity.clamp(0.0, 1.0)) * 255.0).round() as u8
}

fn paint_page<P>(
    ui: &mut Ui,
    surface: Rect,
    pose: Pose,
    fade: Color32,
    page: &P,
    add_page: &mut impl FnMut(&mut Ui, &P),
) {
    let page_rect = posed_rect(surface, pose);
    if !page_rect.intersects(surface) {
        return;
    }

    let mut child = ui.child_ui(page_rect, *ui.layout());
    child.set_clip_rect(surface.intersect(ui.clip_rect()));
    add_page(&mut child, page);

    let alpha = overlay_alpha(pose.opacity);
    if alpha > 0 {
        let overlay = Color32::from_rgba_unmultiplied(fade.r(), fade.g(), fade.b(), alpha);
        ui.painter()
            .with_clip_rect(surface)
            .rect_filled(page_rect, Rounding::ZERO, overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Pos2;

    #[test]
    fn test_posed_rect_offsets_and_scales() {
        let surface = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 200.0));
        let rest = posed_rect(surface, Pose::REST);
        assert_eq!(rest, surface);

        let hidden = posed_rect(
            surface,
            Pose {
                offset_x: 300.0,
                opacity: 0.0,
                scale: 0.5,
            },
        );
        assert_eq!(hidden.center(), Pos2::new(500.0, 100.0));
        assert_eq!(hidden.size(), Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_overlay_alpha_inverts_opacity() {
        assert_eq!(overlay_alpha(1.0), 0);
        assert_eq!(overlay_alpha(0.0), 255);
        assert_eq!(overlay_alpha(-3.0), 255);
        assert_eq!(overlay_alpha(0.5), 128);
    }
}
