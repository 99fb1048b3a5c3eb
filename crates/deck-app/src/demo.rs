//! Demo content for the story deck

use deck_core::{DeckContext, DeckSubscriber, Transition};
use egui::{Color32, RichText, Ui};
use tracing::info;

/// One page of the demo deck
#[derive(Debug, Clone)]
pub struct StoryPage {
    pub title: &'static str,
    pub body: &'static str,
    pub accent: Color32,
}

pub fn story_pages() -> Vec<StoryPage> {
    vec![
        StoryPage {
            title: "Swipe",
            body: "Drag the page left or right. A short flick is enough.",
            accent: Color32::from_rgb(255, 140, 60),
        },
        StoryPage {
            title: "Arrow keys",
            body: "Left and right arrows step through the deck.",
            accent: Color32::from_rgb(90, 170, 255),
        },
        StoryPage {
            title: "Auto advance",
            body: "The bar above fills up and the next page follows on its own.",
            accent: Color32::from_rgb(120, 210, 130),
        },
        StoryPage {
            title: "Done",
            body: "The last page stays put. Swipe back to revisit the others.",
            accent: Color32::from_rgb(230, 110, 160),
        },
    ]
}

pub fn show_story(ui: &mut Ui, page: &StoryPage) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.label(RichText::new(page.title).heading().color(page.accent));
        ui.add_space(12.0);
        ui.label(RichText::new(page.body).color(deck_ui::theme::muted_text_color()));
    });
}

/// Logs every page change
pub struct PageLogger;

impl DeckSubscriber for PageLogger {
    fn on_page_change(&self, transition: &Transition, context: &DeckContext) {
        info!(
            "Story page {} of {} ({:?})",
            transition.to + 1,
            context.len,
            transition.direction
        );
    }
}
