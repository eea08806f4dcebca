use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ekg_domain::{
    BpmReading, DetectionMode, ExportFormat, MonitorConfig, MonitorReport, ReportExporter,
};
use ekg_monitor::HeartRateMonitor;
use ekg_signal::{FeedConfig, PulseTrain, SampleDecoder, SampleFeed};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Replay EKG samples through the heart-rate monitor"
)]
struct Args {
    /// Text recording: one sample per line, or `time,value` rows
    input: Option<PathBuf>,
    /// YAML or JSON monitor configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seconds between samples (overrides the recording and config)
    #[arg(long)]
    delta_x: Option<f64>,
    #[arg(long)]
    bin_seconds: Option<f64>,
    /// Bins per detection window
    #[arg(long)]
    window_bins: Option<usize>,
    #[arg(long)]
    min_amplitude: Option<f64>,
    /// Refractory period in seconds
    #[arg(long)]
    refractory: Option<f64>,
    /// Detect on a sliding window, every N bins
    #[arg(long)]
    sliding_hop: Option<usize>,
    /// Generate a pulse train at this rate instead of reading INPUT
    #[arg(long)]
    synthetic_bpm: Option<f64>,
    /// Length of the synthetic recording in seconds
    #[arg(long, default_value_t = 60.0)]
    duration: f64,
    /// Pace samples at the nominal sample rate
    #[arg(long)]
    realtime: bool,
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => ExportFormat::Json,
            Format::Yaml => ExportFormat::Yaml,
        }
    }
}

fn build_config(args: &Args, recorded_delta_x: Option<f64>) -> Result<MonitorConfig> {
    let mut config = match &args.config {
        Some(path) => MonitorConfig::from_path(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(delta_x) = args.delta_x.or(recorded_delta_x) {
        config.delta_x = delta_x;
    }
    if let Some(seconds) = args.bin_seconds {
        config.bin_size_seconds = seconds;
    }
    if let Some(bins) = args.window_bins {
        config.buffer_max_size = bins;
    }
    if let Some(amplitude) = args.min_amplitude {
        config.min_peak_amplitude = amplitude;
    }
    if let Some(seconds) = args.refractory {
        config.min_peak_time_difference = seconds;
    }
    if let Some(hop_bins) = args.sliding_hop {
        config.detection = DetectionMode::Sliding { hop_bins };
    }
    config.validate()?;
    Ok(config)
}

fn load_samples(args: &Args) -> Result<(String, Option<f64>, Vec<f64>)> {
    match (&args.input, args.synthetic_bpm) {
        (_, Some(bpm)) => {
            if !(bpm.is_finite() && bpm > 0.0) {
                bail!("--synthetic-bpm must be a positive finite rate, got {bpm}");
            }
            if !(args.duration.is_finite() && args.duration > 0.0) {
                bail!("--duration must be a positive finite number of seconds");
            }
            let train = PulseTrain {
                bpm,
                delta_x: args.delta_x.unwrap_or(PulseTrain::default().delta_x),
                ..Default::default()
            };
            Ok((
                format!("synthetic {bpm} bpm"),
                Some(train.delta_x),
                train.samples(args.duration),
            ))
        }
        (Some(path), None) => {
            let recording = SampleDecoder::open(path)?;
            Ok((
                path.display().to_string(),
                recording.delta_x,
                recording.samples,
            ))
        }
        (None, None) => bail!("provide an INPUT recording or --synthetic-bpm"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let (source, recorded_delta_x, samples) = load_samples(&args)?;
    let config = build_config(&args, recorded_delta_x)?;
    info!(source = %source, samples = samples.len(), "replaying");

    let feed_config = FeedConfig {
        pace: args.realtime.then_some(config.delta_x),
        ..Default::default()
    };
    let mut readings: Vec<BpmReading> = Vec::new();
    let mut monitor = HeartRateMonitor::new(config.clone(), |reading: &BpmReading| {
        info!(
            bpm = reading.bpm,
            average_bpm = reading.average_bpm,
            at = reading.window_end,
            "heart rate"
        );
        readings.push(reading.clone());
    })?;

    let mut feed = SampleFeed::spawn(samples, feed_config);
    for sample in feed.by_ref() {
        monitor.add_sample(sample);
    }
    feed.finish()?;

    let stats = monitor.stats().clone();
    drop(monitor);
    if readings.is_empty() {
        warn!(passes = stats.passes, "no conclusive heart-rate reading");
    }

    let report = MonitorReport::new(source, config, readings, stats);
    let exporter = ekg_domain::io::exporter_for(args.format.into());
    let bytes = exporter.export(&report, args.format.into())?;
    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "ekg-replay",
            "--synthetic-bpm",
            "72",
            "--window-bins",
            "60",
            "--sliding-hop",
            "15",
        ]);
        let config = build_config(&args, Some(0.01)).unwrap();
        assert_eq!(config.buffer_max_size, 60);
        assert_eq!(config.delta_x, 0.01);
        assert_eq!(config.detection, DetectionMode::Sliding { hop_bins: 15 });
    }

    #[test]
    fn invalid_flags_are_rejected() {
        let args = Args::parse_from(["ekg-replay", "--synthetic-bpm", "72", "--window-bins", "2"]);
        assert!(build_config(&args, None).is_err());
    }

    #[test]
    fn requires_a_sample_source() {
        let args = Args::parse_from(["ekg-replay"]);
        assert!(load_samples(&args).is_err());
    }

    #[test]
    fn rejects_unbounded_synthetic_rate() {
        for flags in [["--synthetic-bpm", "inf"], ["--synthetic-bpm", "NaN"], ["--synthetic-bpm", "0"]] {
            let args = Args::parse_from(["ekg-replay", flags[0], flags[1]]);
            assert!(load_samples(&args).is_err());
        }
        let args = Args::parse_from(["ekg-replay", "--synthetic-bpm", "60", "--duration", "inf"]);
        assert!(load_samples(&args).is_err());
    }

    #[test]
    fn synthetic_source_uses_duration() {
        let args = Args::parse_from(["ekg-replay", "--synthetic-bpm", "60", "--duration", "10"]);
        let (source, delta_x, samples) = load_samples(&args).unwrap();
        assert!(source.contains("60"));
        assert_eq!(delta_x, Some(0.02));
        assert_eq!(samples.len(), 500);
    }
}
