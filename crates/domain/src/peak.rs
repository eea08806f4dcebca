use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Peak {
    pub index: usize,
    pub time: f64,
    pub amplitude: f64,
}

impl Peak {
    pub fn at_index(index: usize, time_per_peak: f64, amplitude: f64) -> Self {
        Self {
            index,
            time: index as f64 * time_per_peak,
            amplitude,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PeakSet {
    pub candidates: usize,
    pub peaks: Vec<Peak>,
}

impl PeakSet {
    pub fn new(candidates: usize, peaks: Vec<Peak>) -> Self {
        Self { candidates, peaks }
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.peaks.iter().map(|peak| peak.time)
    }

    pub fn intervals(&self) -> Vec<f64> {
        self.peaks
            .windows(2)
            .map(|pair| pair[1].time - pair[0].time)
            .collect()
    }
}
