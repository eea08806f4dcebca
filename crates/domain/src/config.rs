use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::DomainError;

// Absorbs binary rounding in bin_size_seconds / delta_x (0.3 / 0.1 is 2.999...).
const BIN_RATIO_EPSILON: f64 = 1e-9;

pub const MAX_BUFFER_LEN: usize = 1 << 20;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectionMode {
    #[default]
    Tumbling,
    /// Keep the most recent bins and detect every `hop_bins` once the history is full.
    /// Beats within a refractory period of the window's end are counted by a later pass,
    /// so the last few beats of a stream never reach `MonitorStats::beats`.
    Sliding { hop_bins: usize },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub delta_x: f64,
    pub bin_size_seconds: f64,
    pub buffer_max_size: usize,
    pub min_peak_amplitude: f64,
    /// Refractory period in seconds.
    pub min_peak_time_difference: f64,
    pub duplicate_amplitude_tolerance: f64,
    pub display_seconds: f64,
    pub trend_capacity: usize,
    pub bpm_average_window: usize,
    pub detection: DetectionMode,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            delta_x: 0.02,
            bin_size_seconds: 0.1,
            buffer_max_size: 120,
            min_peak_amplitude: 520.0,
            min_peak_time_difference: 0.3,
            duplicate_amplitude_tolerance: 15.0,
            display_seconds: 30.0,
            trend_capacity: 500,
            bpm_average_window: 5,
            detection: DetectionMode::Tumbling,
        }
    }
}

impl MonitorConfig {
    #[instrument]
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        let extension = path.extension().and_then(|ext| ext.to_str());
        let yaml = match extension {
            Some("yaml") | Some("yml") => true,
            Some("json") => false,
            other => {
                return Err(DomainError::validation(format!(
                    "unsupported config extension {:?}",
                    other
                )))
            }
        };
        let text = fs::read_to_string(path)?;
        let config: Self = if yaml {
            serde_yaml::from_str(&text).map_err(|err| DomainError::Serialization(err.to_string()))?
        } else {
            serde_json::from_str(&text).map_err(|err| DomainError::Serialization(err.to_string()))?
        };
        config.validate()?;
        debug!(?config, "loaded monitor config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.delta_x.is_finite() && self.delta_x > 0.0) {
            return Err(DomainError::validation("delta_x must be positive"));
        }
        if !(self.bin_size_seconds.is_finite() && self.bin_size_seconds > 0.0) {
            return Err(DomainError::validation("bin_size_seconds must be positive"));
        }
        if self.bin_size_n() < 1 {
            return Err(DomainError::validation(format!(
                "bin of {}s is shorter than one sample period of {}s",
                self.bin_size_seconds, self.delta_x
            )));
        }
        if self.bin_size_n() > MAX_BUFFER_LEN {
            return Err(DomainError::validation(format!(
                "bin of {}s holds more than {} samples of {}s",
                self.bin_size_seconds, MAX_BUFFER_LEN, self.delta_x
            )));
        }
        if self.buffer_max_size < 3 {
            return Err(DomainError::validation(
                "buffer_max_size must hold at least 3 bins",
            ));
        }
        check_len("buffer_max_size", self.buffer_max_size)?;
        if !(self.min_peak_amplitude.is_finite() && self.min_peak_amplitude >= 0.0) {
            return Err(DomainError::validation(
                "min_peak_amplitude cannot be negative",
            ));
        }
        if !(self.min_peak_time_difference.is_finite() && self.min_peak_time_difference >= 0.0) {
            return Err(DomainError::validation(
                "min_peak_time_difference cannot be negative",
            ));
        }
        if !(self.duplicate_amplitude_tolerance.is_finite()
            && self.duplicate_amplitude_tolerance >= 0.0)
        {
            return Err(DomainError::validation(
                "duplicate_amplitude_tolerance cannot be negative",
            ));
        }
        if !(self.display_seconds.is_finite() && self.display_seconds > 0.0) {
            return Err(DomainError::validation("display_seconds must be positive"));
        }
        check_len("display buffer", self.display_capacity())?;
        if self.trend_capacity == 0 {
            return Err(DomainError::validation("trend_capacity must be at least 1"));
        }
        check_len("trend_capacity", self.trend_capacity)?;
        if self.bpm_average_window == 0 {
            return Err(DomainError::validation(
                "bpm_average_window must be at least 1",
            ));
        }
        check_len("bpm_average_window", self.bpm_average_window)?;
        if let DetectionMode::Sliding { hop_bins } = self.detection {
            if hop_bins == 0 || hop_bins > self.buffer_max_size {
                return Err(DomainError::validation(
                    "sliding hop must be between 1 and buffer_max_size bins",
                ));
            }
        }
        Ok(())
    }

    pub fn bin_size_n(&self) -> usize {
        let ratio = self.bin_size_seconds / self.delta_x + BIN_RATIO_EPSILON;
        if ratio.is_finite() && ratio >= 1.0 {
            ratio.floor() as usize
        } else {
            0
        }
    }

    pub fn bin_duration(&self) -> f64 {
        self.bin_size_n() as f64 * self.delta_x
    }

    pub fn display_capacity(&self) -> usize {
        let bin = self.bin_duration();
        if bin <= 0.0 {
            return 0;
        }
        ((self.display_seconds / bin) - BIN_RATIO_EPSILON).ceil().max(1.0) as usize
    }
}

fn check_len(name: &str, len: usize) -> Result<(), DomainError> {
    if len > MAX_BUFFER_LEN {
        return Err(DomainError::validation(format!(
            "{name} of {len} exceeds {MAX_BUFFER_LEN} entries"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_reference_tuning() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bin_size_n(), 5);
        assert_relative_eq!(config.bin_duration(), 0.1, epsilon = 1e-12);
        assert_eq!(config.display_capacity(), 300);
    }

    #[test]
    fn bin_size_survives_rounding() {
        let config = MonitorConfig {
            delta_x: 0.1,
            bin_size_seconds: 0.3,
            ..Default::default()
        };
        assert_eq!(config.bin_size_n(), 3);
    }

    #[test]
    fn bin_size_truncates() {
        let config = MonitorConfig {
            delta_x: 0.02,
            bin_size_seconds: 0.13,
            ..Default::default()
        };
        assert_eq!(config.bin_size_n(), 6);
        assert_relative_eq!(config.bin_duration(), 0.12, epsilon = 1e-12);
    }

    #[test]
    fn rejects_invalid_tunables() {
        let bad = [
            MonitorConfig {
                delta_x: 0.0,
                ..Default::default()
            },
            MonitorConfig {
                bin_size_seconds: -1.0,
                ..Default::default()
            },
            MonitorConfig {
                bin_size_seconds: 0.01,
                ..Default::default()
            },
            MonitorConfig {
                buffer_max_size: 2,
                ..Default::default()
            },
            MonitorConfig {
                min_peak_amplitude: -5.0,
                ..Default::default()
            },
            MonitorConfig {
                min_peak_time_difference: f64::NAN,
                ..Default::default()
            },
            MonitorConfig {
                bpm_average_window: 0,
                ..Default::default()
            },
            MonitorConfig {
                detection: DetectionMode::Sliding { hop_bins: 0 },
                ..Default::default()
            },
            MonitorConfig {
                detection: DetectionMode::Sliding { hop_bins: 121 },
                ..Default::default()
            },
            MonitorConfig {
                delta_x: 1e-300,
                ..Default::default()
            },
            MonitorConfig {
                display_seconds: 1e300,
                ..Default::default()
            },
            MonitorConfig {
                buffer_max_size: usize::MAX,
                ..Default::default()
            },
            MonitorConfig {
                trend_capacity: usize::MAX,
                ..Default::default()
            },
            MonitorConfig {
                bpm_average_window: MAX_BUFFER_LEN + 1,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(DomainError::Validation(_))),
                "expected rejection for {:?}",
                config
            );
        }
    }

    #[test]
    fn accepts_largest_buffers() {
        let config = MonitorConfig {
            buffer_max_size: MAX_BUFFER_LEN,
            trend_capacity: MAX_BUFFER_LEN,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config: MonitorConfig = serde_yaml::from_str(
            "buffer_max_size: 60\ndetection:\n  kind: sliding\n  hop_bins: 10\n",
        )
        .unwrap();
        assert_eq!(config.buffer_max_size, 60);
        assert_eq!(config.detection, DetectionMode::Sliding { hop_bins: 10 });
        assert_eq!(config.min_peak_amplitude, 520.0);
    }

    #[test]
    fn loads_json_from_disk() {
        let path = std::env::temp_dir().join(format!("ekg-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "min_peak_amplitude": 400.0 }"#).unwrap();
        let config = MonitorConfig::from_path(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.min_peak_amplitude, 400.0);
        assert_eq!(config.bin_size_n(), 5);
    }

    #[test]
    fn rejects_unknown_extension() {
        let result = MonitorConfig::from_path(Path::new("monitor.toml"));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
