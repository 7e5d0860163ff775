//! Driving the pipeline against live collaborators.

pub mod service;
pub mod stats;
pub mod stream;

pub use service::run_until_shutdown;
pub use stats::{PipelineStats, StatsSnapshot};
pub use stream::{CycleReport, StreamLoop, TradeOutcome, DEFAULT_SHUTDOWN_GRACE};
