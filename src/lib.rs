//! Throttled request tracking and trace geometry for telemetry displays
//!
//! - [`tracker`]: rate-limits and coalesces data/sample/redraw requests
//! - [`trace`]: compacts min/max sampled data into drawable segments
//! - [`cursor`], [`shift_lights`]: the rest of the driver display's geometry
//! - [`config`]: persisted throttling settings

pub mod config;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod shift_lights;
pub mod trace;
pub mod tracker;

pub use config::DisplayConfig;
pub use cursor::{Cursor, TimeRange};
pub use error::{DisplayError, Result};
pub use shift_lights::{Led, ShiftLightPanel};
pub use trace::{ParameterValues, Sample, SampleStatus, Segment, Trace};
pub use tracker::{Completion, OperationTracker, TrackerStats};

// Re-export profiling macros for convenience
// When no profiling feature is enabled, these become no-ops
pub use profiling;
