pub mod detector;
pub mod estimator;
pub mod monitor;
pub mod observer;

pub use detector::PeakDetector;
pub use estimator::{BpmAverager, BpmEstimator};
pub use monitor::HeartRateMonitor;
pub use observer::{BpmObserver, NullObserver};
