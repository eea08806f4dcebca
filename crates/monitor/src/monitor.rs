use ekg_domain::{BpmReading, DetectionMode, DomainError, MonitorConfig, MonitorStats, PeakSet};
use ekg_signal::{BinAverage, RollingWindow, SampleBinner, SignalTrend};
use tracing::debug;

use crate::detector::PeakDetector;
use crate::estimator::{BpmAverager, BpmEstimator};
use crate::observer::BpmObserver;

// Two beats closer than this in stream time are the same beat seen by two passes.
const SAME_BEAT_SECONDS: f64 = 1e-6;

/// Streaming engine: raw samples in, display values and heart-rate readings out.
pub struct HeartRateMonitor<O: BpmObserver> {
    config: MonitorConfig,
    binner: SampleBinner,
    history: RollingWindow<f64>,
    display: RollingWindow<f64>,
    trend: SignalTrend,
    detector: PeakDetector,
    estimator: BpmEstimator,
    averager: BpmAverager,
    observer: O,
    bins_since_pass: usize,
    last_beat: Option<f64>,
    last_peaks: Option<PeakSet>,
    last_reading: Option<BpmReading>,
    stats: MonitorStats,
}

impl<O: BpmObserver> HeartRateMonitor<O> {
    pub fn new(config: MonitorConfig, observer: O) -> Result<Self, DomainError> {
        let binner = SampleBinner::from_config(&config)?;
        debug!(
            bin_size = binner.bin_size(),
            window_bins = config.buffer_max_size,
            mode = ?config.detection,
            "heart-rate monitor ready"
        );
        Ok(Self {
            binner,
            history: RollingWindow::new(config.buffer_max_size),
            display: RollingWindow::new(config.display_capacity()),
            trend: SignalTrend::new(config.trend_capacity),
            detector: PeakDetector::from_config(&config),
            estimator: BpmEstimator::new(),
            averager: BpmAverager::new(config.bpm_average_window),
            observer,
            bins_since_pass: 0,
            last_beat: None,
            last_peaks: None,
            last_reading: None,
            stats: MonitorStats::default(),
            config,
        })
    }

    pub fn add_sample(&mut self, value: f64) -> Option<BinAverage> {
        self.stats.samples += 1;
        let bin = self.binner.add_sample(value)?;
        self.stats.bins += 1;
        self.trend.push(&bin);
        self.display.push(bin.mean);
        self.history.push(bin.mean);
        self.bins_since_pass += 1;

        match self.config.detection {
            DetectionMode::Tumbling => {
                if self.history.is_full() {
                    self.run_pass();
                    self.history.clear();
                }
            }
            DetectionMode::Sliding { hop_bins } => {
                if self.history.is_full() && self.bins_since_pass >= hop_bins {
                    self.run_pass();
                }
            }
        }
        Some(bin)
    }

    pub fn extend<I: IntoIterator<Item = f64>>(&mut self, samples: I) {
        for sample in samples {
            self.add_sample(sample);
        }
    }

    fn run_pass(&mut self) {
        self.bins_since_pass = 0;
        self.stats.passes += 1;
        let bin_duration = self.detector.time_per_peak;
        let window_len = self.history.len();
        let origin = (self.stats.bins as usize - window_len) as f64 * bin_duration;
        let window_end = self.stats.bins as f64 * bin_duration;

        let peaks = self.detector.detect(self.history.as_slice());
        debug!(
            candidates = peaks.candidates,
            survivors = peaks.len(),
            window_end,
            "detection pass"
        );
        // A sliding pass cannot yet see a taller neighbour past the window's end, so beats
        // that close to the edge are left for a later pass to count.
        let settled = match self.config.detection {
            DetectionMode::Tumbling => window_len,
            DetectionMode::Sliding { .. } => {
                let refractory_bins =
                    (self.detector.min_peak_time_difference / bin_duration).ceil() as usize;
                window_len.saturating_sub(refractory_bins.saturating_add(1))
            }
        };
        for peak in peaks.peaks.iter().filter(|peak| peak.index < settled) {
            let at = origin + peak.time;
            let fresh = self
                .last_beat
                .map_or(true, |last| at > last + SAME_BEAT_SECONDS);
            if fresh {
                self.stats.beats += 1;
                self.last_beat = Some(at);
            }
        }

        match self.estimator.estimate(&peaks) {
            Ok(bpm) => {
                let average_bpm = self.averager.push(bpm);
                let reading = BpmReading {
                    bpm,
                    average_bpm,
                    peak_count: peaks.len(),
                    candidate_count: peaks.candidates,
                    window_end,
                };
                debug!(bpm, average_bpm, "heart rate updated");
                self.stats.conclusive += 1;
                self.observer.on_bpm_updated(&reading);
                self.last_reading = Some(reading);
            }
            Err(reason) => {
                debug!(%reason, window_end, "detection pass inconclusive");
                self.stats.inconclusive += 1;
            }
        }
        self.last_peaks = Some(peaks);
    }

    pub fn display(&self) -> &RollingWindow<f64> {
        &self.display
    }

    pub fn trend(&self) -> &SignalTrend {
        &self.trend
    }

    pub fn last_reading(&self) -> Option<&BpmReading> {
        self.last_reading.as_ref()
    }

    pub fn last_peaks(&self) -> Option<&PeakSet> {
        self.last_peaks.as_ref()
    }

    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    pub fn reset(&mut self) {
        self.binner.reset();
        self.history.clear();
        self.display.clear();
        self.trend.clear();
        self.averager.clear();
        self.bins_since_pass = 0;
        self.last_beat = None;
        self.last_peaks = None;
        self.last_reading = None;
        self.stats = MonitorStats::default();
    }
}
