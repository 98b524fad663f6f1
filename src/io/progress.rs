//! Batch progress display for composition runs

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "[{{elapsed_precise}}] [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Tracks compositions produced and the attempts they needed
pub struct ProgressManager {
    bar: ProgressBar,
    total_attempts: usize,
    completed: usize,
}

impl ProgressManager {
    /// Create a progress bar for `count` compositions
    pub fn new(count: usize) -> Self {
        let bar = ProgressBar::new(count as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        Self {
            bar,
            total_attempts: 0,
            completed: 0,
        }
    }

    /// Create a manager that tracks counts without drawing anything
    pub fn hidden(count: usize) -> Self {
        let manager = Self::new(count);
        manager.bar.set_draw_target(ProgressDrawTarget::hidden());
        manager
    }

    /// Record one finished composition
    pub fn record(&mut self, attempts: usize) {
        self.completed += 1;
        self.total_attempts += attempts;
        self.bar.inc(1);
        self.bar
            .set_message(format!("{:.1} attempts/item", self.mean_attempts()));
    }

    /// Average attempts per finished composition
    pub fn mean_attempts(&self) -> f64 {
        if self.completed == 0 {
            return 0.0;
        }
        self.total_attempts as f64 / self.completed as f64
    }

    /// Compositions recorded so far
    pub const fn completed(&self) -> usize {
        self.completed
    }

    /// Clear the display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
