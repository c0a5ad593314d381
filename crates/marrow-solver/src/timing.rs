//! Step-time accounting: a sliding one-second average.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Records per-step wall times and publishes their average over the
/// trailing second.
#[derive(Debug, Default)]
pub struct StepTiming {
    samples: VecDeque<(Instant, f64)>,
}

impl StepTiming {
    /// Creates an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one step duration (seconds).
    pub fn record(&mut self, seconds: f64) {
        let now = Instant::now();
        self.samples.push_back((now, seconds));
        while let Some(&(t, _)) = self.samples.front() {
            if now.duration_since(t) > WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Average step time over the trailing second, in seconds.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let total: f64 = self.samples.iter().map(|&(_, s)| s).sum();
        total / self.samples.len() as f64
    }

    /// Number of samples currently in the window.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}
