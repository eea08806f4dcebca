use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::SignalError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRecording {
    pub delta_x: Option<f64>,
    pub samples: Vec<f64>,
}

/// Reads text recordings: one value per line, or `time,value` rows.
pub struct SampleDecoder;

impl SampleDecoder {
    #[instrument]
    pub fn open(path: &Path) -> Result<SampleRecording> {
        let text =
            fs::read_to_string(path).with_context(|| format!("open sample file {:?}", path))?;
        let recording =
            Self::parse(&text).with_context(|| format!("decode sample file {:?}", path))?;
        debug!(
            sample_count = recording.samples.len(),
            delta_x = ?recording.delta_x,
            "decoded recording"
        );
        Ok(recording)
    }

    pub fn parse(text: &str) -> Result<SampleRecording, SignalError> {
        let mut samples = Vec::new();
        let mut times = Vec::with_capacity(2);
        for (number, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line
                .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                .filter(|field| !field.is_empty())
                .collect();
            let parse_error = || SignalError::Parse {
                line: number + 1,
                content: raw.to_string(),
            };
            let value = fields
                .last()
                .and_then(|field| field.parse::<f64>().ok())
                .filter(|value| value.is_finite())
                .ok_or_else(parse_error)?;
            if fields.len() > 1 && times.len() < 2 {
                let time = fields[0].parse::<f64>().map_err(|_| parse_error())?;
                times.push(time);
            }
            samples.push(value);
        }
        let delta_x = match times.as_slice() {
            [first, second] if second > first => Some(second - first),
            _ => None,
        };
        Ok(SampleRecording { delta_x, samples })
    }
}
