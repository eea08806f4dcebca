pub mod config;
pub mod error;
pub mod io;
pub mod peak;
pub mod reading;
pub mod report;

pub use crate::config::{DetectionMode, MonitorConfig, MAX_BUFFER_LEN};
pub use crate::error::{DomainError, Inconclusive};
pub use crate::io::{ExportFormat, JsonExporter, ReportExporter, YamlExporter};
pub use crate::peak::{Peak, PeakSet};
pub use crate::reading::{BpmReading, MonitorStats};
pub use crate::report::MonitorReport;
