//! # Interpolation Error Types
//!
//! All errors that can occur while building or feeding an interpolant.

use thiserror::Error;

use crate::blend::BlendMode;

/// Errors that can occur in the interpolation engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// A sample or blend produced a NaN or infinite component.
    #[error("non-finite component in {context}")]
    NumericCorruption {
        /// Where the bad value was detected.
        context: &'static str,
    },

    /// A rotation sample had (near) zero length and cannot be normalised.
    #[error("degenerate quaternion: length {length}")]
    DegenerateQuaternion {
        /// The offending length.
        length: f32,
    },

    /// No pair of buffered snapshots brackets the requested time.
    #[error("no snapshot pair brackets time {target_time}")]
    SeekMiss {
        /// The delayed read time that was requested.
        target_time: f64,
    },

    /// A write was given a NaN or infinite time step.
    #[error("non-finite time step: {time_diff}")]
    NonFiniteTime {
        /// The rejected time step.
        time_diff: f64,
    },

    /// Scalar bounds are inverted or not numbers.
    #[error("invalid bounds: min {min} > max {max}")]
    InvalidBounds {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// The ring buffer needs at least two slots to form a pair.
    #[error("ring buffer needs at least 2 frames, got {0}")]
    InsufficientFrames(usize),

    /// The read delay is negative or not finite.
    #[error("invalid time delay: {0}")]
    InvalidTimeDelay(f64),

    /// The value type has no meaningful blend for the requested mode.
    #[error("{mode:?} blending is not supported for {value_type}")]
    UnsupportedBlend {
        /// The requested mode.
        mode: BlendMode,
        /// Name of the value type.
        value_type: &'static str,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for interpolation operations.
pub type InterpolationResult<T> = Result<T, InterpolationError>;
