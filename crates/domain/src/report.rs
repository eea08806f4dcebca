use serde::{Deserialize, Serialize};

use crate::{BpmReading, MonitorConfig, MonitorStats};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MonitorReport {
    pub source: String,
    pub config: MonitorConfig,
    pub readings: Vec<BpmReading>,
    pub stats: MonitorStats,
}

impl MonitorReport {
    pub fn new(
        source: impl Into<String>,
        config: MonitorConfig,
        readings: Vec<BpmReading>,
        stats: MonitorStats,
    ) -> Self {
        Self {
            source: source.into(),
            config,
            readings,
            stats,
        }
    }

    pub fn latest_bpm(&self) -> Option<f64> {
        self.readings.last().map(|reading| reading.bpm)
    }

    pub fn average_bpm(&self) -> Option<f64> {
        if self.readings.is_empty() {
            return None;
        }
        let total: f64 = self.readings.iter().map(|reading| reading.bpm).sum();
        Some(total / self.readings.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(bpm: f64) -> BpmReading {
        BpmReading {
            bpm,
            average_bpm: bpm,
            peak_count: 4,
            candidate_count: 4,
            window_end: 0.0,
        }
    }

    #[test]
    fn summarises_readings() {
        let report = MonitorReport::new(
            "memory",
            MonitorConfig::default(),
            vec![reading(60.0), reading(80.0)],
            MonitorStats::default(),
        );
        assert_eq!(report.latest_bpm(), Some(80.0));
        assert_eq!(report.average_bpm(), Some(70.0));
    }

    #[test]
    fn empty_report_has_no_rate() {
        let report = MonitorReport::new(
            "memory",
            MonitorConfig::default(),
            Vec::new(),
            MonitorStats::default(),
        );
        assert_eq!(report.latest_bpm(), None);
        assert_eq!(report.average_bpm(), None);
    }
}
