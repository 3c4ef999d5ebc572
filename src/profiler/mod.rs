//! Render profiling engine.
//!
//! # OBSERVATIONAL INVARIANT
//! Nothing in here may fail toward the host renderer. Bad samples are dropped
//! and logged, empty stores produce empty batches, and advisories are only
//! ever logged or returned.
//!
//! # OWNERSHIP INVARIANT
//! The sample store belongs to exactly one `SampleRecorder`, which belongs to
//! exactly one `Profiler`. Reports are computed from it without mutation and
//! handed out by value.

pub mod analyzer;
pub mod driver;
pub mod engine;
pub mod recorder;
pub mod report;
pub mod sample;
pub mod schedule;
pub mod sink;
pub mod suggest;
pub mod time;

pub use analyzer::{Advisory, WindowAnalyzer};
pub use driver::{ProfilerEvent, ProfilerHandle};
pub use engine::{EngineState, Profiler};
pub use recorder::{SampleRecorder, SampleSeries, SERIES_CAPACITY, WINDOW_SIZE};
pub use report::Report;
pub use sample::{Interactions, Phase, Sample};
pub use sink::{ChannelSink, ReportSink};
pub use suggest::{suggest, Suggestion};
pub use time::{Clock, ManualClock, SystemClock, TokioClock};
