/// Minimum horizontal travel (px) for a gesture to count as a swipe.
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// Keys the deck listens to. Everything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    Space,
    Home,
    End,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Next,
    Previous,
    First,
    Last,
    ToggleFullscreen,
}

impl KeyAction {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::ArrowRight | Key::Space => Some(Self::Next),
            Key::ArrowLeft => Some(Self::Previous),
            Key::Home => Some(Self::First),
            Key::End => Some(Self::Last),
            Key::Escape => Some(Self::ToggleFullscreen),
            Key::Other => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved left.
    Next,
    /// Finger moved right.
    Previous,
}

/// Classify a gesture from its displacement `start - end`.
///
/// Mostly-vertical gestures are scrolling, not paging.
pub fn classify_swipe(dx: f32, dy: f32) -> Option<Swipe> {
    if dy.abs() > dx.abs() {
        return None;
    }
    if dx > SWIPE_THRESHOLD {
        Some(Swipe::Next)
    } else if dx < -SWIPE_THRESHOLD {
        Some(Swipe::Previous)
    } else {
        None
    }
}

/// Remembers where the current touch gesture began.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start: Option<(f32, f32)>,
}

impl SwipeTracker {
    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    /// Finish the gesture. The tracker is reset whatever the outcome.
    pub fn touch_end(&mut self, x: f32, y: f32) -> Option<Swipe> {
        let (start_x, start_y) = self.start.take()?;
        classify_swipe(start_x - x, start_y - y)
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }
}
