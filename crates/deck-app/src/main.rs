//! Main application entry point

use std::sync::Arc;

use anyhow::{Context as _, Result};
use deck_core::{
    DeckConfig, DeckController, DeckSubscriber, InMemoryCursor, MonotonicClock, PulseLoop,
    RouteNavigator, SwipeRouter,
};
use deck_ui::{DeckView, RouteSwipe, Theme};
use eframe::egui::{self, Context, Id, RichText, Sense, Ui};
use parking_lot::RwLock;
use tracing::{info, warn};

mod demo;

use demo::{show_story, story_pages, PageLogger, StoryPage};

const WELCOME: &str = "/welcome";
const STORIES: &str = "/stories";
const SETTINGS: &str = "/settings";
const ROUTES: [(&str, &str); 3] = [
    (WELCOME, "Welcome"),
    (STORIES, "Stories"),
    (SETTINGS, "Settings"),
];

/// Default countdown when no configuration file is given
const DEFAULT_AUTO_ADVANCE_MS: u64 = 4000;

/// Story deck mounted while its route is shown
struct MountedStories {
    deck: DeckController<StoryPage>,
    view: DeckView,
    _logger: Arc<dyn DeckSubscriber>,
}

/// Main application state
struct DeckApp {
    config: DeckConfig,

    /// Frame pulse driving auto-advance countdowns
    pulses: PulseLoop,

    /// Current route, written by the router and the tab bar
    route: Arc<RwLock<String>>,

    router: SwipeRouter,
    route_swipe: RouteSwipe,

    /// Present only while `/stories` is the current route
    stories: Option<MountedStories>,
}

impl DeckApp {
    fn new(cc: &eframe::CreationContext<'_>, config: DeckConfig) -> Self {
        deck_ui::apply_theme(&cc.egui_ctx, &Theme::default());

        let route = Arc::new(RwLock::new(WELCOME.to_string()));
        let sink = route.clone();
        let navigator: Arc<dyn RouteNavigator> =
            Arc::new(move |target: &str| *sink.write() = target.to_string());
        let router = SwipeRouter::new(ROUTES.iter().map(|(path, _)| *path), navigator)
            .with_thresholds(config.gesture);

        Self {
            config,
            pulses: PulseLoop::new(Arc::new(MonotonicClock::new())),
            route,
            router,
            route_swipe: RouteSwipe::new(),
            stories: None,
        }
    }

    fn current_route(&self) -> String {
        self.route.read().clone()
    }

    fn mount_stories(&self) -> MountedStories {
        let pages = story_pages();
        let cursor = Arc::new(InMemoryCursor::new(pages.len()));
        let deck = DeckController::new(pages, cursor, self.pulses.clone(), self.config.clone());
        let logger: Arc<dyn DeckSubscriber> = Arc::new(PageLogger);
        deck.add_subscriber(logger.clone());
        deck.activate();
        info!("Story deck mounted with {} pages", deck.len());

        MountedStories {
            deck,
            view: DeckView::new("story_deck"),
            _logger: logger,
        }
    }

    /// Mount or drop the story deck to match the current route
    fn sync_mount(&mut self) {
        let on_stories = self.current_route() == STORIES;
        match (self.stories.is_some(), on_stories) {
            (false, true) => self.stories = Some(self.mount_stories()),
            (true, false) => {
                self.stories = None;
                info!("Story deck unmounted");
            }
            _ => {}
        }
    }

    fn show_tabs(&mut self, ui: &mut Ui) {
        let current = self.current_route();
        ui.horizontal(|ui| {
            for (path, label) in ROUTES {
                if ui.selectable_label(current == path, label).clicked() && current != path {
                    *self.route.write() = path.to_string();
                }
            }
        });
    }

    /// Page surface for routes without a deck; horizontal swipes change route
    fn show_swipe_surface(&mut self, ui: &mut Ui, route: &str, add_contents: impl FnOnce(&mut Ui)) {
        let response = ui.interact(ui.max_rect(), Id::new("route_surface"), Sense::drag());
        if let Some(target) = self.route_swipe.bind(ui, &response, route, &self.router) {
            ui.ctx().request_repaint();
            info!("Route changed to {}", target);
        }
        add_contents(ui);
    }

    fn show_welcome(ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.heading("Deck");
            ui.add_space(8.0);
            ui.label(
                RichText::new("Swipe left to open the stories")
                    .color(deck_ui::theme::muted_text_color()),
            );
        });
    }

    fn show_settings(ui: &mut Ui, config: &DeckConfig) {
        ui.heading("Settings");
        ui.add_space(12.0);
        egui::Grid::new("settings_grid")
            .num_columns(2)
            .spacing([24.0, 8.0])
            .show(ui, |ui| {
                ui.label("Auto advance");
                match config.auto_advance() {
                    Some(ms) => ui.label(format!("{} ms", ms)),
                    None => ui.label("off"),
                };
                ui.end_row();

                ui.label("Swipe distance");
                ui.label(format!("{} px", config.gesture.distance_px));
                ui.end_row();

                ui.label("Swipe velocity");
                ui.label(format!("{} px/s", config.gesture.velocity_px_per_s));
                ui.end_row();

                ui.label("Transition");
                ui.label(format!("{} ms", config.transition.duration_ms));
                ui.end_row();
            });
    }
}

impl eframe::App for DeckApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.sync_mount();

        egui::TopBottomPanel::top("route_tabs").show(ctx, |ui| {
            self.show_tabs(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let route = self.current_route();
            match route.as_str() {
                STORIES => {
                    if let Some(stories) = &mut self.stories {
                        stories.view.show(ui, &stories.deck, show_story);
                    }
                }
                SETTINGS => {
                    let config = self.config.clone();
                    self.show_swipe_surface(ui, &route, |ui| Self::show_settings(ui, &config));
                }
                _ => self.show_swipe_surface(ui, &route, Self::show_welcome),
            }
        });

        // Countdowns advance once the frame's input has been handled
        self.pulses.run_frame();
        if self.pulses.pending() > 0 {
            ctx.request_repaint();
        }
    }
}

/// Configuration from the path given as the first argument, if any
fn load_config() -> Result<DeckConfig> {
    let Some(path) = std::env::args().nth(1) else {
        info!("No configuration given, auto advance every {} ms", DEFAULT_AUTO_ADVANCE_MS);
        return Ok(DeckConfig::default().with_auto_advance(DEFAULT_AUTO_ADVANCE_MS));
    };

    let config = DeckConfig::load(&path)
        .with_context(|| format!("Failed to load configuration from {}", path))?;
    if config.auto_advance().is_none() {
        warn!("Auto advance disabled by {}", path);
    }
    Ok(config)
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = load_config()?;
    info!("Starting deck viewer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 800.0])
            .with_min_inner_size([320.0, 480.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Deck",
        options,
        Box::new(move |cc| Box::new(DeckApp::new(cc, config))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
