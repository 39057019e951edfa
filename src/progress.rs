// src/progress.rs
//! Paced progress logging shared across worker threads.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

/// Counts completed steps and logs a status line each time another `pace`
/// percent of `total` has been reached.
///
/// Safe to share by reference between rayon workers; reporting never affects
/// the computation being tracked.
#[derive(Debug)]
pub struct Progress {
    label: &'static str,
    total: usize,
    every: usize,
    done: AtomicUsize,
}

impl Progress {
    /// A `pace` that is not a positive finite percentage reports only on
    /// [`Progress::finish`].
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn new(label: &'static str, total: usize, pace: f64) -> Self {
        let every = if pace.is_finite() && pace > 0.0 && total > 0 {
            ((total as f64 * pace / 100.0).ceil() as usize).max(1)
        } else {
            usize::MAX
        };
        Self {
            label,
            total,
            every,
            done: AtomicUsize::new(0),
        }
    }

    #[cfg(test)]
    fn interval(&self) -> usize {
        self.every
    }

    /// Records one finished step and returns the running count.
    pub fn step(&self) -> usize {
        self.advance(1)
    }

    /// Records `n` finished steps and returns the running count.
    pub fn advance(&self, n: usize) -> usize {
        let before = self.done.fetch_add(n, Ordering::Relaxed);
        let done = before + n;
        // Exactly one caller sees each mark crossed.
        if done / self.every > before / self.every {
            self.report(done);
        }
        done
    }

    #[must_use]
    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    /// Logs the final count unconditionally.
    pub fn finish(&self) {
        self.report(self.done());
    }

    #[allow(clippy::cast_precision_loss)]
    fn report(&self, done: usize) {
        if self.total == 0 {
            info!(task = self.label, done, "progress");
            return;
        }
        let percent = done as f64 * 100.0 / self.total as f64;
        info!(
            task = self.label,
            done,
            total = self.total,
            percent = %format!("{percent:.1}"),
            "progress"
        );
    }
}
