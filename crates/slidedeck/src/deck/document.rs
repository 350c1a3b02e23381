//! View model of the deck markup.
//!
//! A [`Document`] is what the navigation state machine mutates: slide
//! visibility, counter text, button state and root style variables. The
//! renderer only reads it. Chrome elements are optional; anything that is
//! absent is skipped by the code that would update it.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::parser::Presentation;

/// Vertical offset (px) of an animatable item before it is revealed.
pub const HIDDEN_OFFSET: f32 = 20.0;
/// Opacity/transform transition recorded on every slide at start-up.
pub const SLIDE_TRANSITION: Duration = Duration::from_millis(300);
pub const PRINTING_CLASS: &str = "printing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Hidden,
    Flex,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Overlaid in the viewport, one slide at a time.
    Absolute,
    /// Part of the document flow, stacked below the previous slide.
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemStyle {
    pub opacity: f32,
    pub offset_y: f32,
    pub transition: Option<Duration>,
}

impl ItemStyle {
    pub const VISIBLE: Self = Self {
        opacity: 1.0,
        offset_y: 0.0,
        transition: None,
    };

    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        offset_y: HIDDEN_OFFSET,
        transition: None,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlideView {
    pub active: bool,
    pub display: Display,
    pub position: Position,
    pub transition: Option<Duration>,
    pub items: Vec<ItemStyle>,
}

impl SlideView {
    fn new(items: usize) -> Self {
        Self {
            active: false,
            display: Display::Hidden,
            position: Position::Absolute,
            transition: None,
            items: vec![ItemStyle::VISIBLE; items],
        }
    }

    pub fn is_visible(&self) -> bool {
        self.display != Display::Hidden
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Button {
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub top: f32,
    pub right: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub text: String,
    /// Last measured placement, `None` until the host has laid it out.
    pub bounds: Option<Bounds>,
}

/// Placement of the navigation controls, measured from the top-right corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub top: f32,
    pub right: f32,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            top: 16.0,
            right: 16.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    pub slides: Vec<SlideView>,
    pub current_counter: Option<String>,
    pub total_counter: Option<String>,
    pub prev_button: Option<Button>,
    pub next_button: Option<Button>,
    pub banner: Option<Banner>,
    pub navigation: Option<Overlay>,
    pub body_background: Option<String>,
    root_style: BTreeMap<String, String>,
    body_classes: BTreeSet<String>,
}

impl Document {
    /// Build the view model for a parsed deck. Slide order follows the file.
    pub fn from_presentation(presentation: &Presentation) -> Self {
        let meta = &presentation.meta;
        let controls = meta.controls.then(Button::default);
        Self {
            slides: presentation
                .slides
                .iter()
                .map(|s| SlideView::new(s.item_count()))
                .collect(),
            current_counter: meta.counter.then(String::new),
            total_counter: meta.counter.then(String::new),
            prev_button: controls,
            next_button: controls,
            banner: meta.banner.clone().map(|text| Banner { text, bounds: None }),
            navigation: meta.controls.then(Overlay::default),
            ..Self::default()
        }
    }

    /// Bare document with `count` item-less slides and full chrome.
    pub fn with_slides(count: usize) -> Self {
        Self::with_items(&vec![0; count])
    }

    /// Bare document whose slide `i` holds `items[i]` animatable items.
    pub fn with_items(items: &[usize]) -> Self {
        Self {
            slides: items.iter().map(|&n| SlideView::new(n)).collect(),
            current_counter: Some(String::new()),
            total_counter: Some(String::new()),
            prev_button: Some(Button::default()),
            next_button: Some(Button::default()),
            navigation: Some(Overlay::default()),
            ..Self::default()
        }
    }

    pub fn slide(&self, position: usize) -> Option<&SlideView> {
        position.checked_sub(1).and_then(|i| self.slides.get(i))
    }

    pub fn slide_mut(&mut self, position: usize) -> Option<&mut SlideView> {
        position
            .checked_sub(1)
            .and_then(move |i| self.slides.get_mut(i))
    }

    /// 1-based positions of every slide currently marked active.
    pub fn active_positions(&self) -> Vec<usize> {
        self.slides
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// 1-based positions of every slide currently visible.
    pub fn visible_positions(&self) -> Vec<usize> {
        self.slides
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_visible())
            .map(|(i, _)| i + 1)
            .collect()
    }

    pub fn set_root_var(&mut self, name: &str, value: &str) {
        self.root_style.insert(name.to_string(), value.to_string());
    }

    pub fn root_var(&self, name: &str) -> Option<&str> {
        self.root_style.get(name).map(String::as_str)
    }

    pub fn add_body_class(&mut self, class: &str) {
        self.body_classes.insert(class.to_string());
    }

    pub fn remove_body_class(&mut self, class: &str) {
        self.body_classes.remove(class);
    }

    pub fn has_body_class(&self, class: &str) -> bool {
        self.body_classes.contains(class)
    }

    pub fn is_printing(&self) -> bool {
        self.has_body_class(PRINTING_CLASS)
    }
}
