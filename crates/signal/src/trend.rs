use crate::binner::BinAverage;
use crate::window::RollingWindow;

#[derive(Clone, Debug)]
pub struct SignalTrend {
    values: RollingWindow<f64>,
    velocities: RollingWindow<f64>,
}

impl SignalTrend {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: RollingWindow::new(capacity),
            velocities: RollingWindow::new(capacity),
        }
    }

    pub fn push(&mut self, bin: &BinAverage) {
        self.values.push(bin.mean);
        self.velocities.push(bin.velocity);
    }

    pub fn mean_value(&self) -> f64 {
        self.values.mean().unwrap_or(0.0)
    }

    pub fn mean_velocity(&self) -> f64 {
        self.velocities.mean().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.velocities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_trend_is_zero() {
        let trend = SignalTrend::new(10);
        assert!(trend.is_empty());
        assert_eq!(trend.mean_value(), 0.0);
        assert_eq!(trend.mean_velocity(), 0.0);
    }

    #[test]
    fn averages_only_retained_bins() {
        let mut trend = SignalTrend::new(2);
        for (mean, velocity) in [(100.0, 1.0), (200.0, 3.0), (400.0, 5.0)] {
            trend.push(&BinAverage { mean, velocity });
        }
        assert_eq!(trend.len(), 2);
        assert_eq!(trend.mean_value(), 300.0);
        assert_eq!(trend.mean_velocity(), 4.0);
    }
}
