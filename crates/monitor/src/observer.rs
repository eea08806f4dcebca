use ekg_domain::BpmReading;

/// Receives each conclusive reading, synchronously, on the thread feeding samples.
pub trait BpmObserver {
    fn on_bpm_updated(&mut self, reading: &BpmReading);
}

impl<F> BpmObserver for F
where
    F: FnMut(&BpmReading),
{
    fn on_bpm_updated(&mut self, reading: &BpmReading) {
        self(reading)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl BpmObserver for NullObserver {
    fn on_bpm_updated(&mut self, _reading: &BpmReading) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_observe_readings() {
        let mut seen = Vec::new();
        {
            let mut observer = |reading: &BpmReading| seen.push(reading.bpm);
            observer.on_bpm_updated(&BpmReading {
                bpm: 75.0,
                average_bpm: 75.0,
                peak_count: 3,
                candidate_count: 3,
                window_end: 12.0,
            });
        }
        assert_eq!(seen, vec![75.0]);
    }
}
