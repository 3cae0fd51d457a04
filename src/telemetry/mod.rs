//! Telemetry: the events the core emits and the sinks that receive them.

pub mod csv_log;
pub mod events;
pub mod sink;

pub use csv_log::{CsvLogSink, LogFile, TelemetryError};
pub use events::*;
pub use sink::{FanoutSink, LogSink, MemorySink, TelemetrySink};
