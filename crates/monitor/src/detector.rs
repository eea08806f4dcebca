use ekg_domain::{MonitorConfig, Peak, PeakSet};

/// Finds strict local maxima in a window of bin averages and thins them with a
/// refractory rule.
#[derive(Clone, Debug, PartialEq)]
pub struct PeakDetector {
    pub min_peak_amplitude: f64,
    pub min_peak_time_difference: f64,
    pub duplicate_amplitude_tolerance: f64,
    pub time_per_peak: f64,
}

impl PeakDetector {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            min_peak_amplitude: config.min_peak_amplitude,
            min_peak_time_difference: config.min_peak_time_difference,
            duplicate_amplitude_tolerance: config.duplicate_amplitude_tolerance,
            time_per_peak: config.bin_duration(),
        }
    }

    pub fn detect(&self, history: &[f64]) -> PeakSet {
        let candidates = self.local_maxima(history);
        let survivors = self.refractory_filter(&candidates);
        PeakSet::new(candidates.len(), survivors)
    }

    pub fn local_maxima(&self, history: &[f64]) -> Vec<Peak> {
        history
            .windows(3)
            .enumerate()
            .filter(|(_, w)| w[1] > self.min_peak_amplitude && w[0] < w[1] && w[2] < w[1])
            .map(|(offset, w)| Peak::at_index(offset + 1, self.time_per_peak, w[1]))
            .collect()
    }

    /// Single chronological sweep comparing each candidate with the last survivor.
    ///
    /// Within the refractory period a near-equal pair keeps the later peak,
    /// otherwise the taller one wins; equal heights keep the earlier one.
    pub fn refractory_filter(&self, candidates: &[Peak]) -> Vec<Peak> {
        let mut alive = vec![true; candidates.len()];
        let mut left = 0;
        for right in 1..candidates.len() {
            let (earlier, later) = (&candidates[left], &candidates[right]);
            if (later.time - earlier.time).abs() >= self.min_peak_time_difference {
                left = right;
                continue;
            }
            let duplicate = (earlier.amplitude - later.amplitude).abs()
                < self.duplicate_amplitude_tolerance;
            if duplicate || later.amplitude > earlier.amplitude {
                alive[left] = false;
                left = right;
            } else {
                alive[right] = false;
            }
        }
        candidates
            .iter()
            .zip(alive)
            .filter_map(|(peak, keep)| keep.then_some(*peak))
            .collect()
    }
}
