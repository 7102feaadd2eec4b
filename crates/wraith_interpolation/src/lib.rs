//! # WRAITH Interpolation
//!
//! Smooths remote-entity state for rendering despite irregular, delayed
//! network updates.
//!
//! ## Architecture
//!
//! - **Snapshot interpolants**: a fixed ring of timestamped snapshots read a
//!   constant `time_delay` behind the newest write, blended per value type
//!   (step for flags, lerp for positions, slerp for rotations)
//! - **Action interpolants**: scalars ramped by a boolean each tick, for
//!   animation blend weights and hold timers
//! - **Remote avatar**: one bundle per remote player wiring both together
//!
//! ## Guarantees
//!
//! - Zero heap allocations after construction
//! - A bad sample is rejected at the write, never blended
//! - A read never fails: the last good value is held and the anomaly is
//!   logged and counted
//!
//! ## Example
//!
//! ```rust
//! use wraith_interpolation::PositionInterpolant;
//!
//! let mut position = PositionInterpolant::position(100.0, 3).unwrap();
//!
//! // Network receive loop
//! position.snapshot(0.0, [0.0, 0.0, 0.0]).unwrap();
//! position.snapshot(50.0, [10.0, 0.0, 0.0]).unwrap();
//! position.snapshot(100.0, [20.0, 0.0, 0.0]).unwrap();
//!
//! // Render loop: 200ms of frames, read 100ms behind
//! position.update(200.0);
//! assert_eq!(position.get().x, 15.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod avatar;
pub mod blend;
pub mod config;
pub mod error;
pub mod scalar;
pub mod snapshot;
pub mod source;
pub mod typed;

// Re-exports for convenience
pub use avatar::{AvatarReadReport, AvatarSample, RemoteAvatar};
pub use blend::{BlendMode, Snapshottable};
pub use config::{ActionConfig, AvatarConfig, InterpolationConfig};
pub use error::{InterpolationError, InterpolationResult};
pub use scalar::{ActionInterpolant, ActionKind, ScalarInterpolant};
pub use snapshot::{InterpolantStats, ReadOutcome, Snapshot, SnapshotInterpolant, WindowFault};
pub use source::SampleSource;
pub use typed::{BinaryInterpolant, PositionInterpolant, QuaternionInterpolant};
pub use wraith_shared::{Quaternion, Vec3};
