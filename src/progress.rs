//! # Progress Tracker
//!
//! Thread-safe counter accumulating completed-account count across all
//! concurrently running flows. Increments are serialized under a mutex on
//! purpose: the printed order then reflects real completion order, which a
//! lock-free counter would not guarantee.

use parking_lot::Mutex;
use tracing::info;

const BAR_LENGTH: usize = 30;

#[derive(Debug)]
struct ProgressState {
    current: u64,
    total: u64,
}

/// Shared progress counter with a human-readable bar per increment.
#[derive(Debug)]
pub struct ProgressTracker {
    description: String,
    state: Mutex<ProgressState>,
}

impl ProgressTracker {
    pub fn new(total: u64, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            state: Mutex::new(ProgressState { current: 0, total }),
        }
    }

    /// Atomically bump the counter and emit the progress line.
    ///
    /// The formatted line is a reporting side effect only; the contract is
    /// the serialized read-modify-write.
    pub fn increment(&self, amount: u64) {
        let mut state = self.state.lock();
        state.current += amount;

        let percentage = if state.total == 0 {
            100.0
        } else {
            (state.current as f64 / state.total as f64) * 100.0
        };
        let bar = render_bar(percentage);
        let emoji = if percentage >= 100.0 {
            "✅"
        } else if percentage >= 50.0 {
            "🔄"
        } else {
            "⏳"
        };

        info!(
            "{emoji} [{}] [{bar}] {}/{} ({percentage:.1}%)",
            self.description, state.current, state.total
        );
    }

    /// Replace the expected total.
    pub fn set_total(&self, total: u64) {
        let mut state = self.state.lock();
        state.total = total;
    }

    pub fn current(&self) -> u64 {
        self.state.lock().current
    }

    pub fn total(&self) -> u64 {
        self.state.lock().total
    }
}

fn render_bar(percentage: f64) -> String {
    let filled = ((BAR_LENGTH as f64) * percentage / 100.0) as usize;
    let filled = filled.min(BAR_LENGTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_LENGTH - filled))
}
