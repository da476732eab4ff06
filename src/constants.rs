//! Application-wide constants and default values
//!
//! Centralizes the throttling, compaction and layout numbers used by the
//! library and the viewer.

/// Operation tracker defaults
pub mod tracker {
    use std::time::Duration;

    /// Default minimum time between dispatched requests (5Hz)
    pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(200);

    /// Upper bound on how long the timer thread sleeps between checks
    pub const TIMER_TICK: Duration = Duration::from_millis(50);

    /// Name given to each tracker's timer thread
    pub const TIMER_THREAD_NAME: &str = "operation-tracker";
}

/// Data request defaults
pub mod request {
    /// Default number of samples requested for a timeline trace
    pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

    /// Smallest sample count the viewer will ask for
    pub const MIN_SAMPLE_COUNT: usize = 10;

    /// Largest sample count the viewer will ask for
    pub const MAX_SAMPLE_COUNT: usize = 20_000;
}

/// Numeric precision constants
pub mod numeric {
    /// Relative tolerance used to decide that a min/max pair is a single point
    pub const POINT_TOLERANCE: f64 = 1e-9;

    /// Absolute floor for the point comparison, for values close to zero
    pub const POINT_ABSOLUTE_FLOOR: f64 = 1e-12;
}

/// Viewer layout defaults
pub mod layout {
    /// Shift light LED radius
    pub const LED_RADIUS: f32 = 9.0;

    /// Horizontal spacing between top-row LEDs
    pub const LED_SPACING: f32 = 24.0;

    /// Height reserved for the shift light strip
    pub const SHIFT_LIGHT_HEIGHT: f32 = 70.0;

    /// Cursor line stroke width
    pub const CURSOR_STROKE: f32 = 1.0;
}

/// Configuration file paths
pub mod config {
    /// Configuration file name
    pub const CONFIG_FILE: &str = "trace-oxide.json";
}
