use std::time::{Duration, Instant};

use super::document::{HIDDEN_OFFSET, ItemStyle, SlideView};

/// Delay between the reveal of consecutive items.
pub const STAGGER: Duration = Duration::from_millis(100);
/// Duration of a single item's reveal.
pub const REVEAL: Duration = Duration::from_millis(500);

/// Staggered reveal of one slide's items.
///
/// A sequence belongs to exactly one navigation. The navigator drops the
/// running sequence when it starts a new one, so two reveals never write to
/// the same items.
#[derive(Debug, Clone)]
pub struct EntryAnimation {
    position: usize,
    items: usize,
    started: Option<Instant>,
}

impl EntryAnimation {
    /// Reset every item of `slide` to its hidden state and return the
    /// sequence that will reveal them. The clock starts on the first tick.
    pub fn start(position: usize, slide: &mut SlideView) -> Self {
        for item in &mut slide.items {
            *item = ItemStyle::HIDDEN;
        }
        Self {
            position,
            items: slide.items.len(),
            started: None,
        }
    }

    /// 1-based position of the slide being animated.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total time from the first tick until the last item is fully shown.
    pub fn total_duration(&self) -> Duration {
        match self.items {
            0 => Duration::ZERO,
            n => STAGGER * (n as u32 - 1) + REVEAL,
        }
    }

    /// Advance the sequence to `now`. Returns `true` once every item is
    /// fully revealed.
    pub fn tick(&mut self, slide: &mut SlideView, now: Instant) -> bool {
        let started = *self.started.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);

        for (i, item) in slide.items.iter_mut().enumerate() {
            let delay = STAGGER * i as u32;
            let Some(local) = elapsed.checked_sub(delay) else {
                continue;
            };
            let t = (local.as_secs_f32() / REVEAL.as_secs_f32()).min(1.0);
            let eased = ease_in_out(t);
            *item = ItemStyle {
                opacity: eased,
                offset_y: HIDDEN_OFFSET * (1.0 - eased),
                transition: Some(REVEAL),
            };
        }

        elapsed >= self.total_duration()
    }

    /// Jump straight to the end state.
    pub fn finish(&mut self, slide: &mut SlideView) {
        for item in &mut slide.items {
            *item = ItemStyle::VISIBLE;
        }
        self.started = None;
    }
}

/// Smoothstep easing on `[0, 1]`.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::document::Document;

    #[test]
    fn test_start_hides_all_items() {
        let mut doc = Document::with_items(&[3]);
        let anim = EntryAnimation::start(1, &mut doc.slides[0]);
        assert_eq!(anim.position(), 1);
        assert!(doc.slides[0].items.iter().all(|i| *i == ItemStyle::HIDDEN));
    }

    #[test]
    fn test_items_reveal_in_sequence() {
        let mut doc = Document::with_items(&[3]);
        let slide = &mut doc.slides[0];
        let mut anim = EntryAnimation::start(1, slide);
        let t0 = Instant::now();

        assert!(!anim.tick(slide, t0));
        // Item 0 has started, the others wait for their stagger slot
        assert_eq!(slide.items[0].opacity, 0.0);
        assert_eq!(slide.items[0].transition, Some(REVEAL));
        assert_eq!(slide.items[1], ItemStyle::HIDDEN);

        assert!(!anim.tick(slide, t0 + Duration::from_millis(150)));
        assert!(slide.items[0].opacity > 0.0);
        assert!(slide.items[1].opacity > 0.0);
        assert_eq!(slide.items[2], ItemStyle::HIDDEN);

        assert!(!anim.tick(slide, t0 + Duration::from_millis(600)));
        assert_eq!(slide.items[0].opacity, 1.0);
        assert_eq!(slide.items[0].offset_y, 0.0);
        assert!(slide.items[2].opacity < 1.0);

        assert!(anim.tick(slide, t0 + Duration::from_millis(700)));
        assert!(slide.items.iter().all(|i| i.opacity == 1.0 && i.offset_y == 0.0));
    }

    #[test]
    fn test_empty_slide_finishes_immediately() {
        let mut doc = Document::with_items(&[0]);
        let slide = &mut doc.slides[0];
        let mut anim = EntryAnimation::start(1, slide);
        assert_eq!(anim.total_duration(), Duration::ZERO);
        assert!(anim.tick(slide, Instant::now()));
    }

    #[test]
    fn test_finish_reveals_everything() {
        let mut doc = Document::with_items(&[4]);
        let slide = &mut doc.slides[0];
        let mut anim = EntryAnimation::start(1, slide);
        anim.finish(slide);
        assert!(slide.items.iter().all(|i| *i == ItemStyle::VISIBLE));
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert_eq!(ease_in_out(0.5), 0.5);
    }
}
