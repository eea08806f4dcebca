use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BpmReading {
    pub bpm: f64,
    pub average_bpm: f64,
    pub peak_count: usize,
    pub candidate_count: usize,
    pub window_end: f64,
}

impl BpmReading {
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitorStats {
    pub samples: u64,
    pub bins: u64,
    pub passes: u64,
    pub conclusive: u64,
    pub inconclusive: u64,
    pub beats: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_per_beat_inverts_rate() {
        let reading = BpmReading {
            bpm: 120.0,
            average_bpm: 118.0,
            peak_count: 3,
            candidate_count: 4,
            window_end: 12.0,
        };
        assert_eq!(reading.seconds_per_beat(), 0.5);
    }
}
