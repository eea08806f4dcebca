use serde::{Deserialize, Serialize};

use ekg_domain::{DomainError, MonitorConfig};

use crate::error::SignalError;

const PREALLOCATE_LIMIT: usize = 4096;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BinAverage {
    pub mean: f64,
    pub velocity: f64,
}

#[derive(Clone, Debug)]
pub struct SampleBinner {
    bin_size: usize,
    current: Vec<f64>,
}

impl SampleBinner {
    pub fn new(bin_size: usize) -> Result<Self, SignalError> {
        if bin_size == 0 {
            return Err(SignalError::EmptyBin);
        }
        Ok(Self {
            bin_size,
            current: Vec::with_capacity(bin_size.min(PREALLOCATE_LIMIT)),
        })
    }

    pub fn from_config(config: &MonitorConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Self::new(config.bin_size_n()).map_err(|err| DomainError::validation(err.to_string()))
    }

    pub fn bin_size(&self) -> usize {
        self.bin_size
    }

    pub fn pending(&self) -> usize {
        self.current.len()
    }

    pub fn add_sample(&mut self, value: f64) -> Option<BinAverage> {
        self.current.push(value);
        if self.current.len() < self.bin_size {
            return None;
        }
        let bin = BinAverage {
            mean: mean(&self.current),
            velocity: mean_velocity(&self.current),
        };
        self.current.clear();
        Some(bin)
    }

    pub fn reset(&mut self) {
        self.current.clear();
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of `x[i] - x[i - 1]`; zero when there are fewer than two values.
pub fn mean_velocity(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let total: f64 = values.windows(2).map(|pair| pair[1] - pair[0]).sum();
    total / (values.len() - 1) as f64
}
