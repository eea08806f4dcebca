use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ringbuf::{HeapConsumer, HeapRb};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SignalError;

const IDLE_WAIT: Duration = Duration::from_micros(200);

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct FeedConfig {
    pub capacity: usize,
    pub pace: Option<f64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            pace: None,
        }
    }
}

/// Single producer thread handing samples to one consumer through a bounded ring.
pub struct SampleFeed {
    consumer: HeapConsumer<f64>,
    finished: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
    producer: Option<JoinHandle<()>>,
}

impl SampleFeed {
    pub fn spawn(samples: Vec<f64>, config: FeedConfig) -> Self {
        let ring = HeapRb::<f64>::new(config.capacity.max(1));
        let (mut producer, consumer) = ring.split();
        let finished = Arc::new(AtomicBool::new(false));
        let done = finished.clone();
        let cancelled = Arc::new(AtomicBool::new(false));
        let stop = cancelled.clone();
        let pace = config
            .pace
            .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
            .map(Duration::from_secs_f64);
        let handle = thread::spawn(move || {
            let total = samples.len();
            'samples: for sample in samples {
                let mut pending = sample;
                while let Err(rejected) = producer.push(pending) {
                    if stop.load(Ordering::Acquire) {
                        break 'samples;
                    }
                    pending = rejected;
                    thread::sleep(IDLE_WAIT);
                }
                if let Some(period) = pace {
                    thread::sleep(period);
                }
            }
            debug!(total, "sample producer finished");
            done.store(true, Ordering::Release);
        });
        Self {
            consumer,
            finished,
            cancelled,
            producer: Some(handle),
        }
    }

    pub fn next_sample(&mut self) -> Option<f64> {
        loop {
            if let Some(sample) = self.consumer.pop() {
                return Some(sample);
            }
            if self.finished.load(Ordering::Acquire) {
                return self.consumer.pop();
            }
            thread::sleep(IDLE_WAIT);
        }
    }

    pub fn finish(mut self) -> Result<(), SignalError> {
        match self.producer.take() {
            Some(handle) => handle.join().map_err(|_| SignalError::ProducerPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for SampleFeed {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl Iterator for SampleFeed {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.next_sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_every_sample_in_order() {
        let samples: Vec<f64> = (0..5_000).map(|i| i as f64).collect();
        let mut feed = SampleFeed::spawn(
            samples.clone(),
            FeedConfig {
                capacity: 16,
                pace: None,
            },
        );
        let received: Vec<f64> = feed.by_ref().collect();
        assert_eq!(received, samples);
        assert!(feed.finish().is_ok());
    }

    #[test]
    fn empty_feed_ends_immediately() {
        let mut feed = SampleFeed::spawn(Vec::new(), FeedConfig::default());
        assert_eq!(feed.next_sample(), None);
        assert!(feed.finish().is_ok());
    }

    #[test]
    fn paced_feed_still_delivers() {
        let mut feed = SampleFeed::spawn(
            vec![1.0, 2.0, 3.0],
            FeedConfig {
                capacity: 2,
                pace: Some(0.001),
            },
        );
        let received: Vec<f64> = feed.by_ref().collect();
        assert_eq!(received, vec![1.0, 2.0, 3.0]);
        feed.finish().unwrap();
    }
}
