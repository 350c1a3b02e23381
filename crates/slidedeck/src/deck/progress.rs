use super::navigator::NavigationObserver;

/// Completion bar shown along the top edge of the deck.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressIndicator {
    percent: f64,
}

impl ProgressIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_progress(&mut self, current: usize, total: usize) {
        self.percent = if total == 0 {
            0.0
        } else {
            (current * 100) as f64 / total as f64
        };
    }

    /// Completion as a percentage in `[0, 100]`.
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Fill proportion of the bar in `[0, 1]`.
    pub fn fill(&self) -> f32 {
        (self.percent / 100.0) as f32
    }
}

impl NavigationObserver for ProgressIndicator {
    fn on_navigate(&mut self, current: usize, total: usize) {
        self.update_progress(current, total);
    }
}
