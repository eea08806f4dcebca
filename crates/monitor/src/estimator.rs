use ekg_domain::{Inconclusive, PeakSet};
use ekg_signal::RollingWindow;

/// Candidate peaks a window needs before its intervals are trusted.
pub const MIN_CANDIDATES: usize = 3;

#[derive(Clone, Debug)]
pub struct BpmEstimator {
    min_candidates: usize,
}

impl BpmEstimator {
    pub fn new() -> Self {
        Self {
            min_candidates: MIN_CANDIDATES,
        }
    }

    pub fn estimate(&self, peaks: &PeakSet) -> Result<f64, Inconclusive> {
        if peaks.candidates < self.min_candidates {
            return Err(Inconclusive::TooFewCandidates {
                found: peaks.candidates,
                required: self.min_candidates,
            });
        }
        let intervals = peaks.intervals();
        if intervals.is_empty() {
            return Err(Inconclusive::TooFewSurvivors { found: peaks.len() });
        }
        let average = intervals.iter().sum::<f64>() / intervals.len() as f64;
        if !(average.is_finite() && average > 0.0) {
            return Err(Inconclusive::DegenerateInterval { average });
        }
        Ok(60.0 / average)
    }
}

impl Default for BpmEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct BpmAverager {
    recent: RollingWindow<f64>,
}

impl BpmAverager {
    pub fn new(window: usize) -> Self {
        Self {
            recent: RollingWindow::new(window.max(1)),
        }
    }

    pub fn push(&mut self, bpm: f64) -> f64 {
        self.recent.push(bpm);
        self.recent.mean().unwrap_or(bpm)
    }

    pub fn average(&self) -> Option<f64> {
        self.recent.mean()
    }

    pub fn clear(&mut self) {
        self.recent.clear();
    }
}
