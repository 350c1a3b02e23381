pub mod animation;
pub mod document;
pub mod input;
pub mod layout;
pub mod navigator;
pub mod print;
pub mod progress;

use std::time::Instant;

pub use document::{Bounds, Display, Document, Position, SlideView};
pub use input::{Key, KeyAction, Swipe};
pub use navigator::{NavigationObserver, Navigator};
pub use print::{PrintState, PrintView};
pub use progress::ProgressIndicator;

use crate::error::{DeckError, HostError};
use crate::parser::Presentation;
use crate::theme::{DEFAULT_THEME, Theme, ThemeRegistry};
use input::SwipeTracker;

/// Platform services the deck calls into but does not implement.
pub trait Host {
    fn is_fullscreen(&self) -> bool;
    fn request_fullscreen(&mut self) -> Result<(), HostError>;
    fn exit_fullscreen(&mut self);
    fn print(&mut self);
}

#[derive(Debug, Clone)]
pub struct DeckOptions {
    /// 1-based slide to open on. Clamped into range.
    pub start_slide: usize,
    /// Theme that wins over the deck's own frontmatter.
    pub theme_override: Option<String>,
    /// Theme used when neither the override nor the deck names one.
    pub default_theme: Option<String>,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            start_slide: 1,
            theme_override: None,
            default_theme: None,
        }
    }
}

/// Everything one running presentation needs, in one place.
///
/// Handlers receive the deck by `&mut` instead of looking components up
/// globally; the navigator is the single source of the current position.
#[derive(Debug)]
pub struct Deck {
    presentation: Presentation,
    document: Document,
    navigator: Navigator,
    print: PrintView,
    themes: ThemeRegistry,
    swipe: SwipeTracker,
}

impl Deck {
    pub fn new(presentation: Presentation, options: &DeckOptions) -> Result<Self, DeckError> {
        let mut document = Document::from_presentation(&presentation);

        let mut themes = ThemeRegistry::default();
        let theme = [
            options.theme_override.as_deref(),
            presentation.meta.theme.as_deref(),
            options.default_theme.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|name| Theme::by_name(name).is_some())
        .unwrap_or(DEFAULT_THEME);
        themes.apply_theme(theme, &mut document);

        let navigator =
            Navigator::new(&mut document, options.start_slide, ProgressIndicator::new())?;

        Ok(Self {
            presentation,
            document,
            navigator,
            print: PrintView::default(),
            themes,
            swipe: SwipeTracker::default(),
        })
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn current(&self) -> usize {
        self.navigator.current()
    }

    pub fn total(&self) -> usize {
        self.navigator.total()
    }

    pub fn progress(&self) -> &ProgressIndicator {
        self.navigator.observer()
    }

    pub fn theme(&self) -> &'static Theme {
        self.themes.active()
    }

    pub fn print_state(&self) -> PrintState {
        self.print.state()
    }

    pub fn go_to_slide(&mut self, n: usize) -> bool {
        self.navigator.go_to_slide(&mut self.document, n)
    }

    pub fn next_slide(&mut self) -> bool {
        self.navigator.next_slide(&mut self.document)
    }

    pub fn previous_slide(&mut self) -> bool {
        self.navigator.previous_slide(&mut self.document)
    }

    /// Dispatch a key press. Returns `true` when the key is one of ours and
    /// its default action should be suppressed.
    pub fn handle_key(&mut self, key: Key, host: &mut dyn Host) -> bool {
        let Some(action) = KeyAction::from_key(key) else {
            return false;
        };
        match action {
            KeyAction::Next => {
                self.next_slide();
            }
            KeyAction::Previous => {
                self.previous_slide();
            }
            KeyAction::First => {
                self.navigator.first_slide(&mut self.document);
            }
            KeyAction::Last => {
                self.navigator.last_slide(&mut self.document);
            }
            KeyAction::ToggleFullscreen => self.toggle_fullscreen(host),
        }
        true
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.swipe.touch_start(x, y);
    }

    /// Finish a touch gesture. Returns `true` when it moved the deck.
    pub fn touch_end(&mut self, x: f32, y: f32) -> bool {
        match self.swipe.touch_end(x, y) {
            Some(Swipe::Next) => self.next_slide(),
            Some(Swipe::Previous) => self.previous_slide(),
            None => false,
        }
    }

    pub fn toggle_fullscreen(&mut self, host: &mut dyn Host) {
        if host.is_fullscreen() {
            host.exit_fullscreen();
        } else if let Err(err) = host.request_fullscreen() {
            log::warn!("Error attempting to enable fullscreen: {err}");
        }
    }

    pub fn before_print(&mut self) {
        self.print.before_print(&mut self.document);
    }

    pub fn after_print(&mut self) {
        self.print.after_print(&mut self.document, &self.navigator);
    }

    pub fn generate_pdf(&self, host: &mut dyn Host) {
        self.print.generate_pdf(host);
    }

    pub fn apply_theme(&mut self, name: &str) -> bool {
        self.themes.apply_theme(name, &mut self.document)
    }

    pub fn cycle_theme(&mut self) -> &'static Theme {
        self.themes.cycle(&mut self.document)
    }

    /// Record the banner's new placement and move the navigation under it.
    pub fn on_resize(&mut self, banner: Option<Bounds>) {
        if let Some(b) = self.document.banner.as_mut() {
            b.bounds = banner;
        }
        layout::position_navigation(&mut self.document);
    }

    /// Advance the entry animation; `true` while more frames are needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.navigator.tick(&mut self.document, now)
    }

    pub fn finish_animation(&mut self) {
        self.navigator.finish_animation(&mut self.document);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[derive(Default)]
    struct MockHost {
        fullscreen: bool,
        reject_fullscreen: bool,
        fullscreen_requests: usize,
        prints: usize,
    }

    impl Host for MockHost {
        fn is_fullscreen(&self) -> bool {
            self.fullscreen
        }

        fn request_fullscreen(&mut self) -> Result<(), HostError> {
            self.fullscreen_requests += 1;
            if self.reject_fullscreen {
                return Err(HostError::Fullscreen("not allowed".into()));
            }
            self.fullscreen = true;
            Ok(())
        }

        fn exit_fullscreen(&mut self) {
            self.fullscreen = false;
        }

        fn print(&mut self) {
            self.prints += 1;
        }
    }

    fn deck_with(source: &str, options: &DeckOptions) -> Deck {
        Deck::new(parser::parse(source).unwrap(), options).unwrap()
    }

    fn five_slides() -> Deck {
        deck_with(
            "# One\n\n# Two\n\n# Three\n\n# Four\n\n# Five",
            &DeckOptions::default(),
        )
    }

    #[test]
    fn test_keyboard_drives_navigation() {
        let mut deck = five_slides();
        let mut host = MockHost::default();

        assert!(deck.handle_key(Key::ArrowRight, &mut host));
        assert!(deck.handle_key(Key::Space, &mut host));
        assert_eq!(deck.current(), 3);
        assert!(deck.handle_key(Key::ArrowLeft, &mut host));
        assert_eq!(deck.current(), 2);
        assert!(deck.handle_key(Key::End, &mut host));
        assert_eq!(deck.current(), 5);
        assert!(deck.handle_key(Key::Home, &mut host));
        assert_eq!(deck.current(), 1);
        assert!(!deck.handle_key(Key::Other, &mut host));
        assert_eq!(deck.current(), 1);
    }

    #[test]
    fn test_mapped_keys_are_consumed_at_boundaries() {
        let mut deck = five_slides();
        let mut host = MockHost::default();
        assert!(deck.handle_key(Key::ArrowLeft, &mut host));
        assert_eq!(deck.current(), 1);
    }

    #[test]
    fn test_escape_toggles_fullscreen() {
        let mut deck = five_slides();
        let mut host = MockHost::default();
        deck.handle_key(Key::Escape, &mut host);
        assert!(host.fullscreen);
        deck.handle_key(Key::Escape, &mut host);
        assert!(!host.fullscreen);
        assert_eq!(host.fullscreen_requests, 1);
    }

    #[test]
    fn test_fullscreen_failure_is_not_surfaced() {
        let mut deck = five_slides();
        let mut host = MockHost {
            reject_fullscreen: true,
            ..MockHost::default()
        };
        assert!(deck.handle_key(Key::Escape, &mut host));
        assert!(!host.fullscreen);
        assert_eq!(host.fullscreen_requests, 1);
        assert_eq!(deck.current(), 1);
    }

    #[test]
    fn test_swipes() {
        let mut deck = five_slides();

        deck.touch_start(400.0, 300.0);
        assert!(deck.touch_end(340.0, 300.0));
        assert_eq!(deck.current(), 2);

        deck.touch_start(400.0, 300.0);
        assert!(!deck.touch_end(360.0, 300.0));
        assert_eq!(deck.current(), 2);

        deck.touch_start(400.0, 300.0);
        assert!(!deck.touch_end(340.0, 220.0));
        assert_eq!(deck.current(), 2);

        deck.touch_start(400.0, 300.0);
        assert!(deck.touch_end(460.0, 300.0));
        assert_eq!(deck.current(), 1);
    }

    #[test]
    fn test_print_cycle_through_context() {
        let mut deck = five_slides();
        let mut host = MockHost::default();
        deck.go_to_slide(3);

        deck.generate_pdf(&mut host);
        assert_eq!(host.prints, 1);

        deck.before_print();
        assert_eq!(deck.print_state(), PrintState::Printing);
        assert_eq!(deck.document().visible_positions(), vec![1, 2, 3, 4, 5]);
        deck.after_print();
        assert_eq!(deck.current(), 3);
        assert_eq!(deck.document().visible_positions(), vec![3]);
    }

    #[test]
    fn test_theme_precedence() {
        let source = "---\ntheme: cyber\n---\n# One";

        let deck = deck_with(source, &DeckOptions::default());
        assert_eq!(deck.theme().name, "cyber");

        let options = DeckOptions {
            theme_override: Some("corporate".into()),
            default_theme: Some("network".into()),
            ..DeckOptions::default()
        };
        assert_eq!(deck_with(source, &options).theme().name, "corporate");

        let options = DeckOptions {
            default_theme: Some("corporate".into()),
            ..DeckOptions::default()
        };
        assert_eq!(deck_with("# One", &options).theme().name, "corporate");

        let options = DeckOptions {
            theme_override: Some("neon".into()),
            ..DeckOptions::default()
        };
        assert_eq!(deck_with("# One", &options).theme().name, DEFAULT_THEME);
    }

    #[test]
    fn test_resize_repositions_navigation() {
        let mut deck = deck_with(
            "---\nbanner: Press Ctrl+P to print\n---\n# One",
            &DeckOptions::default(),
        );
        deck.on_resize(Some(Bounds {
            top: 16.0,
            right: 16.0,
            width: 200.0,
            height: 40.0,
        }));
        let nav = deck.document().navigation.unwrap();
        assert_eq!(nav.top, 68.0);
    }

    #[test]
    fn test_start_slide_option() {
        let options = DeckOptions {
            start_slide: 4,
            ..DeckOptions::default()
        };
        let deck = deck_with("# One\n\n# Two\n\n# Three\n\n# Four\n\n# Five", &options);
        assert_eq!(deck.current(), 4);
        assert_eq!(deck.progress().percent(), 80.0);
    }
}
