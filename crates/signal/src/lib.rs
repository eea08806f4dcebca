pub mod binner;
pub mod decoder;
pub mod error;
pub mod feed;
pub mod synth;
pub mod trend;
pub mod window;

pub use binner::{BinAverage, SampleBinner};
pub use decoder::{SampleDecoder, SampleRecording};
pub use error::SignalError;
pub use feed::{FeedConfig, SampleFeed};
pub use synth::PulseTrain;
pub use trend::SignalTrend;
pub use window::RollingWindow;
