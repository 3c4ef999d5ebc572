pub mod config;
pub mod error;
pub mod profiler;

pub use config::{ConfigUpdate, ProfilerConfig};
pub use profiler::{Profiler, ProfilerHandle, Report, Sample};
