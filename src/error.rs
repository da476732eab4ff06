//! Error types for trace-oxide
//!
//! The tracker and the trace compactor never fail; errors only come from
//! input validation and configuration handling.

use thiserror::Error;

/// Main error type for trace-oxide operations
#[derive(Error, Debug)]
pub enum DisplayError {
    /// File I/O error
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration value rejected
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parameter value columns of different lengths
    #[error("Sample arrays differ in length (status: {status}, min: {min}, max: {max})")]
    SampleLengthMismatch { status: usize, min: usize, max: usize },

    /// Throttle interval that cannot be used
    #[error("Invalid throttle interval: {0}ms")]
    InvalidInterval(u64),
}

/// Result type alias for trace-oxide operations
pub type Result<T> = std::result::Result<T, DisplayError>;

impl DisplayError {
    /// Get a user-friendly error message suitable for displaying in UI
    pub fn user_message(&self) -> String {
        match self {
            DisplayError::Io(e) => format!("File error: {}", e),
            DisplayError::Json(e) => format!("JSON error: {}", e),
            DisplayError::Config(msg) => format!("Config error: {}", msg),
            DisplayError::SampleLengthMismatch { status, min, max } => format!(
                "Sample data is inconsistent ({} / {} / {} values)",
                status, min, max
            ),
            DisplayError::InvalidInterval(ms) => {
                format!("Throttle interval of {}ms is not allowed", ms)
            }
        }
    }

    /// Get a short title for the error (for the status bar)
    pub fn title(&self) -> &'static str {
        match self {
            DisplayError::Io(_) => "File Error",
            DisplayError::Json(_) => "JSON Error",
            DisplayError::Config(_) => "Configuration Error",
            DisplayError::SampleLengthMismatch { .. } => "Sample Data Error",
            DisplayError::InvalidInterval(_) => "Invalid Interval",
        }
    }
}
