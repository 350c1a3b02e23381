use std::time::Instant;

use super::animation::EntryAnimation;
use super::document::{Display, Document, Position, SLIDE_TRANSITION};
use super::progress::ProgressIndicator;
use crate::error::DeckError;

/// Receives every successful move, including the initial render.
pub trait NavigationObserver {
    fn on_navigate(&mut self, current: usize, total: usize);
}

/// Owns the current position and is the only code that changes it.
///
/// Positions are 1-based and always in `[1, total]`; exactly one slide in
/// the document is active and it is the one at `current`.
#[derive(Debug)]
pub struct Navigator<O = ProgressIndicator> {
    current: usize,
    total: usize,
    animation: Option<EntryAnimation>,
    observer: O,
}

impl<O: NavigationObserver> Navigator<O> {
    /// Render the initial state with `start` (clamped into range) active.
    pub fn new(document: &mut Document, start: usize, observer: O) -> Result<Self, DeckError> {
        let total = document.slides.len();
        if total == 0 {
            return Err(DeckError::Empty);
        }

        let current = start.clamp(1, total);
        for slide in &mut document.slides {
            slide.active = false;
            slide.display = Display::Hidden;
            slide.position = Position::Absolute;
            slide.transition = Some(SLIDE_TRANSITION);
        }
        if let Some(slide) = document.slide_mut(current) {
            slide.active = true;
            slide.display = Display::Flex;
        }
        if let Some(total_counter) = document.total_counter.as_mut() {
            *total_counter = total.to_string();
        }

        let mut navigator = Self {
            current,
            total,
            animation: None,
            observer,
        };
        navigator.update_navigation(document);
        navigator.observer.on_navigate(current, total);
        Ok(navigator)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Move to slide `n`. Targets outside `[1, total]` are ignored.
    pub fn go_to_slide(&mut self, document: &mut Document, n: usize) -> bool {
        if n < 1 || n > self.total {
            log::trace!("ignoring out-of-range slide {n} (total {})", self.total);
            return false;
        }

        let printing = document.is_printing();
        let previous = self.current;
        if let Some(slide) = document.slide_mut(previous) {
            slide.active = false;
            if !printing {
                slide.display = Display::Hidden;
            }
        }

        self.current = n;
        let Some(slide) = document.slide_mut(n) else {
            return false;
        };
        slide.active = true;
        if !printing {
            slide.display = Display::Flex;
            slide.position = Position::Absolute;
        }

        // A new reveal replaces whatever sequence was still running.
        if let Some(old) = self.animation.take() {
            log::trace!("cancelling entry animation for slide {}", old.position());
        }
        self.animation = Some(EntryAnimation::start(n, slide));

        self.update_navigation(document);
        self.observer.on_navigate(self.current, self.total);
        log::debug!("slide {previous} -> {n} of {}", self.total);
        true
    }

    pub fn next_slide(&mut self, document: &mut Document) -> bool {
        if self.current < self.total {
            self.go_to_slide(document, self.current + 1)
        } else {
            false
        }
    }

    pub fn previous_slide(&mut self, document: &mut Document) -> bool {
        if self.current > 1 {
            self.go_to_slide(document, self.current - 1)
        } else {
            false
        }
    }

    pub fn first_slide(&mut self, document: &mut Document) -> bool {
        self.go_to_slide(document, 1)
    }

    pub fn last_slide(&mut self, document: &mut Document) -> bool {
        self.go_to_slide(document, self.total)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Advance the running entry animation. Returns `true` while it is
    /// still in progress.
    pub fn tick(&mut self, document: &mut Document, now: Instant) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };
        let Some(slide) = document.slide_mut(animation.position()) else {
            self.animation = None;
            return false;
        };
        if animation.tick(slide, now) {
            self.animation = None;
            return false;
        }
        true
    }

    /// Complete the running entry animation immediately.
    pub fn finish_animation(&mut self, document: &mut Document) {
        let Some(mut animation) = self.animation.take() else {
            return;
        };
        if let Some(slide) = document.slide_mut(animation.position()) {
            animation.finish(slide);
        }
    }

    fn update_navigation(&self, document: &mut Document) {
        if let Some(counter) = document.current_counter.as_mut() {
            *counter = self.current.to_string();
        }
        if let Some(prev) = document.prev_button.as_mut() {
            prev.disabled = self.current == 1;
        }
        if let Some(next) = document.next_button.as_mut() {
            next.disabled = self.current == self.total;
        }
    }
}
