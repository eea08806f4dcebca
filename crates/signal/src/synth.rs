use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PulseTrain {
    pub bpm: f64,
    pub baseline: f64,
    pub amplitude: f64,
    pub delta_x: f64,
    pub pulse_samples: usize,
    pub phase_seconds: f64,
}

impl Default for PulseTrain {
    fn default() -> Self {
        Self {
            bpm: 60.0,
            baseline: 400.0,
            amplitude: 1000.0,
            delta_x: 0.02,
            pulse_samples: 1,
            phase_seconds: 0.5,
        }
    }
}

impl PulseTrain {
    pub fn with_bpm(bpm: f64) -> Self {
        Self {
            bpm,
            ..Default::default()
        }
    }

    pub fn beat_indices(&self, sample_count: usize) -> Vec<usize> {
        if !(self.bpm.is_finite()
            && self.bpm > 0.0
            && self.delta_x.is_finite()
            && self.delta_x > 0.0
            && self.phase_seconds.is_finite())
        {
            return Vec::new();
        }
        let period = 60.0 / self.bpm;
        // Every beat must advance at least one sample or the walk never reaches the end.
        if period < self.delta_x {
            return Vec::new();
        }
        let mut indices = Vec::new();
        let mut beat = 0usize;
        loop {
            let time = self.phase_seconds + beat as f64 * period;
            let index = (time / self.delta_x).round();
            if index < 0.0 {
                beat += 1;
                continue;
            }
            let index = index as usize;
            if index >= sample_count {
                break;
            }
            indices.push(index);
            beat += 1;
        }
        indices
    }

    pub fn samples(&self, duration_seconds: f64) -> Vec<f64> {
        if !(self.delta_x > 0.0 && duration_seconds.is_finite() && duration_seconds > 0.0) {
            return Vec::new();
        }
        let count = (duration_seconds / self.delta_x).round() as usize;
        let mut samples = vec![self.baseline; count];
        for start in self.beat_indices(count) {
            let end = (start + self.pulse_samples).min(count);
            for sample in &mut samples[start..end] {
                *sample = self.baseline + self.amplitude;
            }
        }
        samples
    }
}
