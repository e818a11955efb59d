//! Error types for chirp configuration, echo simulation and range processing.

use std::io;
use thiserror::Error;

/// Result type for radar operations
pub type Result<T> = std::result::Result<T, RadarError>;

/// Errors raised by the radar chain.
///
/// An empty peak set is not an error: `detect_peaks` returning nothing means
/// no target cleared the adaptive threshold.
#[derive(Error, Debug)]
pub enum RadarError {
    /// A chirp parameter was zero, negative or not finite
    #[error("invalid chirp configuration: {field} must be positive and finite, got {value}")]
    InvalidConfig { field: &'static str, value: f64 },

    /// The configured chirp holds fewer than two samples
    #[error("chirp must contain at least 2 samples, got {0}")]
    TooFewSamples(usize),

    /// Target range was negative or not finite
    #[error("target range must be a non-negative finite distance, got {0} m")]
    DegenerateRange(f64),

    /// Radar cross-section was negative or not finite
    #[error("target RCS must be non-negative and finite, got {0}")]
    InvalidRcs(f64),

    /// Two sequences that must line up sample-for-sample did not
    #[error("signal length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Receiver noise standard deviation was negative or not finite
    #[error("noise standard deviation must be non-negative and finite, got {0}")]
    InvalidNoise(f64),

    /// Detection parameters out of range
    #[error("invalid detection settings: {0}")]
    InvalidDetection(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("scenario parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("frame decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}
